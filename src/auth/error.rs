use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("No active session")]
    MissingSession,

    #[error("Email already exists")]
    DuplicateEmail { email: String },

    #[error("Authentication required")]
    Unauthenticated,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Invalid or expired token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("password comparison failed: {0}")]
    Comparison(String),

    #[error("token signing failed")]
    TokenSigning(#[source] jsonwebtoken::errors::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) | AuthError::MissingSession => StatusCode::BAD_REQUEST,
            AuthError::DuplicateEmail { .. } => StatusCode::CONFLICT,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Unauthenticated | AuthError::InvalidPassword | AuthError::InvalidToken(_) => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Hashing(_)
            | AuthError::Comparison(_)
            | AuthError::TokenSigning(_)
            | AuthError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn log(&self) {
        match self {
            AuthError::Hashing(_)
            | AuthError::Comparison(_)
            | AuthError::TokenSigning(_)
            | AuthError::Database(_) => {
                tracing::error!(error = %self, "unhandled auth failure");
            }
            AuthError::DuplicateEmail { email } => {
                tracing::info!(%email, "sign-up with registered email");
            }
            AuthError::InvalidPassword | AuthError::InvalidToken(_) => {
                tracing::warn!(error = %self, "credential rejected");
            }
            _ => {
                tracing::debug!(error = %self, "auth request rejected");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        let body = match &self {
            AuthError::Validation(details) => json!({
                "error": self.to_string(),
                "details": details,
            }),
            _ if status.is_server_error() => json!({ "error": "Internal server error" }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
