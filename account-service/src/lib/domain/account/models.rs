use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::account::errors::AccountError;
use crate::account::errors::DisplayNameError;
use crate::account::errors::EmailError;
use crate::account::errors::FieldViolation;
use crate::account::errors::PasswordPolicyError;
use crate::account::errors::UserIdError;

/// User aggregate entity.
///
/// `password_hash` is the stored Argon2 PHC string and never leaves the
/// service; response types copy the other fields explicitly.
#[derive(Clone)]
pub struct User {
    pub id: UserId,
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub followers: Vec<UserId>,
    pub followings: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("followers", &self.followers)
            .field("followings", &self.followings)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Fields handed to the store when creating a user. The store assigns the id.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password_hash: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type
///
/// Ensures the name has at least 5 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MIN_LENGTH: usize = 5;

    /// Create a new valid display name.
    ///
    /// Length is counted in characters, not bytes.
    ///
    /// # Errors
    /// * `TooShort` - Name shorter than 5 characters
    pub fn new(name: String) -> Result<Self, DisplayNameError> {
        let length = name.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(DisplayNameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. The address is
/// kept exactly as submitted; lookups are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password submitted by a client.
///
/// Lives only for the duration of a register or login call.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;

    /// Password for a new account: at least 6 characters.
    ///
    /// # Errors
    /// * `TooShort` - Fewer than 6 characters
    pub fn for_registration(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    /// Password presented at login: only needs to be present.
    ///
    /// # Errors
    /// * `Blank` - Empty password
    pub fn for_login(password: String) -> Result<Self, PasswordPolicyError> {
        if password.is_empty() {
            return Err(PasswordPolicyError::Blank);
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Identity resolved from a verified access token.
///
/// Carries exactly what was signed at issuance; it is not refreshed from the
/// store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
}

/// Access token handed back by register and login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub user_id: UserId,
    pub token: String,
}

fn collect<T, E: ToString>(
    field: &str,
    result: Result<T, E>,
    violations: &mut Vec<FieldViolation>,
) -> Option<T> {
    result
        .map_err(|e| violations.push(FieldViolation::new(field, e)))
        .ok()
}

/// Command to register a new account with validated fields
#[derive(Debug)]
pub struct RegisterCommand {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password: Password,
}

impl RegisterCommand {
    /// Validate raw registration input.
    ///
    /// Every field is checked; all violations are reported together.
    ///
    /// # Errors
    /// * `Validation` - One or more fields are invalid
    pub fn parse(name: String, email: String, password: String) -> Result<Self, AccountError> {
        let mut violations = Vec::new();

        let name = collect("name", DisplayName::new(name), &mut violations);
        let email = collect("email", EmailAddress::new(email), &mut violations);
        let password = collect("password", Password::for_registration(password), &mut violations);

        match (name, email, password) {
            (Some(name), Some(email), Some(password)) => Ok(Self {
                name,
                email,
                password,
            }),
            _ => Err(AccountError::Validation(violations)),
        }
    }
}

/// Command to log in with validated fields
#[derive(Debug)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: Password,
}

impl LoginCommand {
    /// Validate raw login input.
    ///
    /// # Errors
    /// * `Validation` - Email malformed or password blank
    pub fn parse(email: String, password: String) -> Result<Self, AccountError> {
        let mut violations = Vec::new();

        let email = collect("email", EmailAddress::new(email), &mut violations);
        let password = collect("password", Password::for_login(password), &mut violations);

        match (email, password) {
            (Some(email), Some(password)) => Ok(Self { email, password }),
            _ => Err(AccountError::Validation(violations)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_length() {
        assert!(DisplayName::new("Test User".to_string()).is_ok());
        assert!(DisplayName::new("Alice".to_string()).is_ok());
        assert_eq!(
            DisplayName::new("Bob".to_string()),
            Err(DisplayNameError::TooShort { min: 5, actual: 3 })
        );
    }

    #[test]
    fn test_display_name_counts_characters() {
        // 5 characters, 10 bytes
        assert!(DisplayName::new("ÉéÉéÉ".to_string()).is_ok());
    }

    #[test]
    fn test_email_validation() {
        assert!(EmailAddress::new("t@test.com".to_string()).is_ok());
        assert!(EmailAddress::new("invalid-email".to_string()).is_err());
        assert!(EmailAddress::new("' OR '1'='1".to_string()).is_err());
    }

    #[test]
    fn test_email_kept_as_submitted() {
        let email = EmailAddress::new("Mixed.Case@Example.com".to_string()).unwrap();
        assert_eq!(email.as_str(), "Mixed.Case@Example.com");
    }

    #[test]
    fn test_password_policies() {
        assert!(Password::for_registration("secret1".to_string()).is_ok());
        assert_eq!(
            Password::for_registration("abc".to_string()).unwrap_err(),
            PasswordPolicyError::TooShort { min: 6, actual: 3 }
        );
        assert!(Password::for_login("x".to_string()).is_ok());
        assert_eq!(
            Password::for_login(String::new()).unwrap_err(),
            PasswordPolicyError::Blank
        );
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::for_login("hunter22".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("hunter22"));
    }

    #[test]
    fn test_user_debug_hides_hash() {
        let user = User {
            id: UserId::new(),
            name: DisplayName::new("Test User".to_string()).unwrap(),
            email: EmailAddress::new("t@test.com".to_string()).unwrap(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            followers: vec![],
            followings: vec![],
            created_at: Utc::now(),
        };
        assert!(!format!("{:?}", user).contains("$argon2id"));
    }

    #[test]
    fn test_register_command_collects_all_violations() {
        let err = RegisterCommand::parse(
            "Bob".to_string(),
            "invalid-email".to_string(),
            "123".to_string(),
        )
        .unwrap_err();

        match err {
            AccountError::Validation(violations) => {
                let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(fields, vec!["name", "email", "password"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_register_command_success() {
        let command = RegisterCommand::parse(
            "Test User".to_string(),
            "t@test.com".to_string(),
            "secret1".to_string(),
        )
        .unwrap();

        assert_eq!(command.name.as_str(), "Test User");
        assert_eq!(command.email.as_str(), "t@test.com");
        assert_eq!(command.password.expose(), "secret1");
    }

    #[test]
    fn test_login_command_rejects_blank_password() {
        let err = LoginCommand::parse("t@test.com".to_string(), String::new()).unwrap_err();
        assert!(matches!(
            err,
            AccountError::Validation(ref v) if v.len() == 1 && v[0].field == "password"
        ));
    }
}
