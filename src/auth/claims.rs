use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::{PublicUser, Role};

/// Identity carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<&PublicUser> for Claims {
    fn from(user: &PublicUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// JWT body: identity plus registered time claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TokenPayload {
    #[serde(flatten)]
    pub claims: Claims,
    pub iat: usize, // issued at (unix timestamp)
    pub exp: usize, // expires at (unix timestamp)
}
