use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::auth::{
    claims::Claims,
    error::{AuthError, FieldError},
    repo_types::{PublicUser, Role},
};

const MAX_NAME_LEN: usize = 255;
const MAX_EMAIL_LEN: usize = 255;
const MIN_PASSWORD_LEN: usize = 6;
const MAX_PASSWORD_LEN: usize = 128;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Request body for sign-up. Missing fields deserialize as empty so that
/// they are reported per field by [`SignUpRequest::validate`].
#[derive(Debug, Default, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Normalized sign-up input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

fn check_email(raw: &str, errors: &mut Vec<FieldError>) -> String {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if email.len() > MAX_EMAIL_LEN {
        errors.push(FieldError::new("email", "Email is too long"));
    } else if !is_valid_email(&email) {
        errors.push(FieldError::new("email", "Invalid email"));
    }
    email
}

impl SignUpRequest {
    pub fn validate(self) -> Result<NewAccount, AuthError> {
        let mut errors = Vec::new();

        let name = self.name.trim().to_string();
        let name_len = name.chars().count();
        if name_len < 2 {
            errors.push(FieldError::new("name", "Name must be at least 2 characters"));
        } else if name_len > MAX_NAME_LEN {
            errors.push(FieldError::new("name", "Name is too long"));
        }

        let email = check_email(&self.email, &mut errors);

        let password_len = self.password.chars().count();
        if password_len < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        } else if password_len > MAX_PASSWORD_LEN {
            errors.push(FieldError::new("password", "Password is too long"));
        }

        let role = match self.role.as_deref().map(str::trim) {
            None | Some("") => Role::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                errors.push(FieldError::new("role", "Role must be one of: user, admin"));
                Role::default()
            }),
        };

        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }
        Ok(NewAccount {
            name,
            email,
            password: self.password,
            role,
        })
    }
}

impl SignInRequest {
    pub fn validate(self) -> Result<Credentials, AuthError> {
        let mut errors = Vec::new();
        let email = check_email(&self.email, &mut errors);
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }
        Ok(Credentials {
            email,
            password: self.password,
        })
    }
}

/// Response returned after sign-up or sign-in.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: Claims,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(err: AuthError) -> Vec<&'static str> {
        match err {
            AuthError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn sign_up_normalizes_and_defaults_role() {
        let account = SignUpRequest {
            name: "  Ada Lovelace ".into(),
            email: " Ada@Example.COM ".into(),
            password: "hunter22".into(),
            role: None,
        }
        .validate()
        .expect("valid");
        assert_eq!(account.name, "Ada Lovelace");
        assert_eq!(account.email, "ada@example.com");
        assert_eq!(account.role, Role::User);
    }

    #[test]
    fn sign_up_accepts_admin_role() {
        let account = SignUpRequest {
            name: "Root".into(),
            email: "root@example.com".into(),
            password: "hunter22".into(),
            role: Some("admin".into()),
        }
        .validate()
        .expect("valid");
        assert_eq!(account.role, Role::Admin);
    }

    #[test]
    fn sign_up_reports_every_bad_field() {
        let err = SignUpRequest {
            name: "A".into(),
            email: "not-an-email".into(),
            password: "123".into(),
            role: Some("superuser".into()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(fields(err), vec!["name", "email", "password", "role"]);
    }

    #[test]
    fn sign_up_rejects_empty_body() {
        let err = SignUpRequest::default().validate().unwrap_err();
        assert_eq!(fields(err), vec!["name", "email", "password"]);
    }

    #[test]
    fn sign_in_requires_password() {
        let err = SignInRequest {
            email: "ada@example.com".into(),
            password: String::new(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(fields(err), vec!["password"]);
    }

    #[test]
    fn email_regex() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.de"));
    }
}
