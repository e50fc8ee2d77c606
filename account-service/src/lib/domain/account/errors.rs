use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for DisplayName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisplayNameError {
    #[error("Name too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password cannot be blank")]
    Blank,

    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl ToString) -> Self {
        Self {
            field: field.into(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Top-level error for all account operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    // Input errors
    #[error("Invalid input: {}", join_violations(.0))]
    Validation(Vec<FieldViolation>),

    // Domain-level errors
    #[error("User already exists with this email")]
    DuplicateEmail(String),

    #[error("User not found")]
    UserNotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Infrastructure errors
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AccountError {
    /// Whether the failure is unexpected and must not be detailed to clients.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AccountError::Hashing(_)
                | AccountError::TokenIssuance(_)
                | AccountError::DatabaseError(_)
                | AccountError::Unknown(_)
        )
    }
}

impl From<auth::PasswordError> for AccountError {
    fn from(err: auth::PasswordError) -> Self {
        AccountError::Hashing(err.to_string())
    }
}

/// Rejections produced by the token gate in front of protected resources.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("Please authenticate using a valid token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken(String),

    #[error("Token has expired")]
    ExpiredToken,
}
