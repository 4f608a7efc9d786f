use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::{auth::error::AuthError, config::PasswordConfig};

/// Argon2id hasher with a configurable cost.
#[derive(Debug, Clone)]
pub struct PasswordHashing {
    params: Params,
}

impl PasswordHashing {
    pub fn from_config(cfg: &PasswordConfig) -> anyhow::Result<Self> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| anyhow::anyhow!("invalid argon2 parameters: {e}"))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash_password(&self, plain: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                AuthError::Hashing(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    /// Checks `plain` against a stored PHC string. The cost parameters
    /// encoded in the hash win over the configured ones.
    pub fn verify_password(&self, plain: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            AuthError::Comparison(e.to_string())
        })?;
        match self.argon2().verify_password(plain.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => {
                error!(error = %e, "argon2 verify_password error");
                Err(AuthError::Comparison(e.to_string()))
            }
        }
    }

    /// Hashes on the blocking pool.
    pub async fn hash(&self, plain: String) -> Result<String, AuthError> {
        let hashing = self.clone();
        tokio::task::spawn_blocking(move || hashing.hash_password(&plain))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
    }

    /// Compares on the blocking pool.
    pub async fn compare(&self, plain: String, hash: String) -> Result<bool, AuthError> {
        let hashing = self.clone();
        tokio::task::spawn_blocking(move || hashing.verify_password(&plain, &hash))
            .await
            .map_err(|e| AuthError::Comparison(e.to_string()))?
    }
}

#[cfg(test)]
pub(crate) fn cheap() -> PasswordHashing {
    PasswordHashing::from_config(&PasswordConfig {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    })
    .expect("cheap argon2 params")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hashing = cheap();
        let password = "Secur3P@ssw0rd!";
        let hash = hashing.hash_password(password).expect("hashing should succeed");
        assert_ne!(hash, password);
        assert!(hashing
            .verify_password(password, &hash)
            .expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hashing = cheap();
        let hash = hashing
            .hash_password("correct-horse-battery-staple")
            .expect("hashing should succeed");
        assert!(!hashing
            .verify_password("wrong-password", &hash)
            .expect("verify should not error"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let hashing = cheap();
        let a = hashing.hash_password("repeat-me").unwrap();
        let b = hashing.hash_password("repeat-me").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = cheap()
            .verify_password("anything", "not-a-valid-hash")
            .unwrap_err();
        assert!(matches!(err, AuthError::Comparison(_)));
    }

    #[test]
    fn rejects_impossible_params() {
        let cfg = PasswordConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        assert!(PasswordHashing::from_config(&cfg).is_err());
    }

    #[tokio::test]
    async fn blocking_pool_helpers_agree() {
        let hashing = cheap();
        let hash = hashing.hash("pa55word".into()).await.unwrap();
        assert!(hashing.compare("pa55word".into(), hash.clone()).await.unwrap());
        assert!(!hashing.compare("other".into(), hash).await.unwrap());
    }
}
