use std::sync::Arc;

use auth::Authenticator;
use auth::JwtError;

use crate::account::errors::GateError;
use crate::account::models::Identity;
use crate::account::models::UserId;

/// Token check in front of protected resources.
///
/// Given the raw token taken from a request, yields the identity that was
/// signed into it or a typed rejection. Attaching the identity to the
/// request is left to the hosting layer.
#[derive(Clone)]
pub struct TokenGate {
    authenticator: Arc<Authenticator>,
}

impl TokenGate {
    pub fn new(authenticator: Arc<Authenticator>) -> Self {
        Self { authenticator }
    }

    /// Resolve the identity carried by `token`.
    ///
    /// # Arguments
    /// * `token` - Raw token, `None` when the request carried none
    ///
    /// # Errors
    /// * `MissingToken` - No token, or only whitespace
    /// * `ExpiredToken` - Signature valid but `exp` has passed
    /// * `InvalidToken` - Any other verification failure, or a subject that
    ///   is not a user id
    pub fn authorize(&self, token: Option<&str>) -> Result<Identity, GateError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(GateError::MissingToken)?;

        let claims = self
            .authenticator
            .validate_token(token)
            .map_err(|e| match e {
                JwtError::TokenExpired => GateError::ExpiredToken,
                other => GateError::InvalidToken(other.to_string()),
            })?;

        let user_id = UserId::from_string(&claims.sub)
            .map_err(|e| GateError::InvalidToken(format!("Bad subject claim: {}", e)))?;

        Ok(Identity {
            user_id,
            name: claims.name,
            email: claims.email,
        })
    }
}
