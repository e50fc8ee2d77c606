use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::models::EmailAddress;
use crate::account::models::IssuedToken;
use crate::account::models::LoginCommand;
use crate::account::models::NewUser;
use crate::account::models::RegisterCommand;
use crate::account::models::User;
use crate::account::models::UserId;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account and issue its first access token.
    ///
    /// # Arguments
    /// * `command` - Validated command containing name, email, and password
    ///
    /// # Returns
    /// Access token for the created user
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Hashing` - Password hashing failed
    /// * `TokenIssuance` - Token signing failed
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<IssuedToken, AccountError>;

    /// Check credentials and issue an access token.
    ///
    /// # Arguments
    /// * `command` - Validated command containing email and password
    ///
    /// # Returns
    /// Access token for the authenticated user
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this email (unless concealed)
    /// * `InvalidCredentials` - Password does not match
    /// * `Hashing` - Stored hash is corrupt
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, command: LoginCommand) -> Result<IssuedToken, AccountError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `DatabaseError` - Store operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, AccountError>;
}

/// Credential store operations the account flows depend on.
///
/// The store owns email uniqueness: `create` must reject a duplicate even
/// when two registrations race past the caller's own lookup.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user; the store assigns id and creation time.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `DatabaseError` - Store operation failed
    async fn create(&self, user: NewUser) -> Result<User, AccountError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountError>;

    /// Retrieve user by email address, matched exactly as stored.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AccountError>;
}
