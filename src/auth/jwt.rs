use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::{
    auth::{
        claims::{Claims, TokenPayload},
        error::AuthError,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let jwt = &state.config.jwt;
        Self::new(jwt.secret.as_bytes(), Duration::from_secs((jwt.ttl_minutes as u64) * 60))
    }
}

impl JwtKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    fn sign_at(&self, claims: &Claims, issued_at: OffsetDateTime) -> Result<String, AuthError> {
        let exp = issued_at + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let payload = TokenPayload {
            claims: claims.clone(),
            iat: issued_at.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token =
            encode(&Header::default(), &payload, &self.encoding).map_err(AuthError::TokenSigning)?;
        debug!(user_id = %claims.id, "jwt signed");
        Ok(token)
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        self.sign_at(claims, OffsetDateTime::now_utc())
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::default();
        let data = decode::<TokenPayload>(token, &self.decoding, &validation)
            .map_err(AuthError::InvalidToken)?;
        debug!(user_id = %data.claims.claims.id, "jwt verified");
        Ok(data.claims.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::Role;
    use uuid::Uuid;

    fn make_keys(secret: &str) -> JwtKeys {
        JwtKeys::new(secret.as_bytes(), Duration::from_secs(60 * 60 * 24))
    }

    fn sample_claims() -> Claims {
        Claims {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            role: Role::Admin,
        }
    }

    #[test]
    fn sign_and_verify_recovers_claims() {
        let keys = make_keys("dev-secret");
        let claims = sample_claims();
        let token = keys.sign(&claims).expect("sign");
        let verified = keys.verify(&token).expect("verify token");
        assert_eq!(verified, claims);
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = make_keys("dev-secret");
        let two_days_ago = OffsetDateTime::now_utc() - TimeDuration::days(2);
        let token = keys.sign_at(&sample_claims(), two_days_ago).expect("sign");
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn verify_rejects_tampered_signature() {
        let keys = make_keys("dev-secret");
        let token = keys.sign(&sample_claims()).expect("sign");
        let sig_start = token.rfind('.').expect("three segments") + 1;
        let first = &token[sig_start..sig_start + 1];
        let swapped = if first == "A" { "B" } else { "A" };
        let token = format!("{}{}{}", &token[..sig_start], swapped, &token[sig_start + 1..]);
        assert!(matches!(
            keys.verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn verify_rejects_other_secret() {
        let token = make_keys("one-secret").sign(&sample_claims()).expect("sign");
        assert!(make_keys("another-secret").verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_garbage() {
        assert!(make_keys("dev-secret").verify("not.a.jwt").is_err());
    }
}
