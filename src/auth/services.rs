use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{Credentials, NewAccount},
        error::{AuthError, AuthResult},
        password::PasswordHashing,
        repo::UserStore,
        repo_types::{NewUser, PublicUser},
    },
    state::AppState,
};

/// Account creation and credential checks over a [`UserStore`].
#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn UserStore>,
    hashing: PasswordHashing,
}

impl FromRef<AppState> for CredentialService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.store.clone(), state.hashing.clone())
    }
}

impl CredentialService {
    pub fn new(store: Arc<dyn UserStore>, hashing: PasswordHashing) -> Self {
        Self { store, hashing }
    }

    #[instrument(skip(self, account), fields(email = %account.email))]
    pub async fn create_user(&self, account: NewAccount) -> AuthResult<PublicUser> {
        // The unique constraint decides; this lookup only skips a wasted hash.
        if self.store.find_by_email(&account.email).await?.is_some() {
            return Err(AuthError::DuplicateEmail {
                email: account.email,
            });
        }

        let password_hash = self.hashing.hash(account.password).await?;

        let user = self
            .store
            .insert(NewUser {
                name: &account.name,
                email: &account.email,
                password_hash: &password_hash,
                role: account.role,
            })
            .await?;

        info!(user_id = %user.id, "created new user");
        Ok(user.into())
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn authenticate_user(&self, credentials: Credentials) -> AuthResult<PublicUser> {
        let user = self
            .store
            .find_by_email(&credentials.email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let ok = self
            .hashing
            .compare(credentials.password, user.password_hash.clone())
            .await?;
        if !ok {
            warn!(user_id = %user.id, "password mismatch");
            return Err(AuthError::InvalidPassword);
        }

        Ok(user.into())
    }
}
