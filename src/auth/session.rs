use axum::extract::FromRef;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::state::AppState;

/// Carries the session token in an HTTP-only cookie.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    pub name: String,
    pub path: String,
    pub secure: bool,
    pub max_age: Duration,
}

impl FromRef<AppState> for SessionCookies {
    fn from_ref(state: &AppState) -> Self {
        let cookie = &state.config.cookie;
        Self {
            name: cookie.name.clone(),
            path: cookie.path.clone(),
            secure: cookie.secure,
            max_age: Duration::minutes(state.config.jwt.ttl_minutes),
        }
    }
}

impl SessionCookies {
    pub fn set(&self, jar: CookieJar, token: String) -> CookieJar {
        let cookie = Cookie::build((self.name.clone(), token))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .path(self.path.clone())
            .max_age(self.max_age);
        jar.add(cookie)
    }

    pub fn get(&self, jar: &CookieJar) -> Option<String> {
        jar.get(&self.name)
            .map(|c| c.value().to_owned())
            .filter(|v| !v.is_empty())
    }

    /// Emits an expired cookie with the same name and path.
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build((self.name.clone(), "")).path(self.path.clone()))
    }
}
