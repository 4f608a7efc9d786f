use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;

use super::{claims::Claims, error::AuthError, jwt::JwtKeys, session::SessionCookies};

/// Verified identity read from the session cookie.
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
    SessionCookies: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = SessionCookies::from_ref(state)
            .get(&jar)
            .ok_or(AuthError::Unauthenticated)?;
        let claims = JwtKeys::from_ref(state).verify(&token)?;
        Ok(AuthUser(claims))
    }
}
