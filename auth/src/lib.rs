//! Credential and token utilities
//!
//! Provides the secret-handling core used by the account service:
//! - Password hashing (Argon2id, tunable work factor)
//! - JWT access token signing and verification (HS256)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{Claims, JwtHandler, TokenLifetime};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let lifetime = TokenLifetime::hours(1);
//! let claims = Claims::for_user("user123", "Alice Smith", "alice@example.com", lifetime).unwrap();
//! let token = handler.encode(&claims).unwrap();
//! let decoded = handler.decode(&token).unwrap();
//! assert_eq!(decoded, claims);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Claims};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let lifetime = auth.token_lifetime();
//! let claims = Claims::for_user("user123", "Alice Smith", "alice@example.com", lifetime).unwrap();
//! let result = auth.authenticate("password123", &hash, &claims).unwrap();
//!
//! // Validate token
//! let decoded = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(decoded.sub, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenLifetime;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
