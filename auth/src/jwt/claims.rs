use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// How long an issued token stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLifetime {
    /// Token carries an `exp` claim this far after issuance.
    Bounded(Duration),
    /// Token carries no `exp` claim and never expires.
    ///
    /// Must be chosen explicitly; there is no revocation.
    Unbounded,
}

impl TokenLifetime {
    /// Bounded lifetime in whole hours.
    pub fn hours(hours: i64) -> Self {
        TokenLifetime::Bounded(Duration::hours(hours))
    }

    /// Bounded lifetime in whole hours, `None` if it does not fit a `Duration`.
    pub fn try_hours(hours: i64) -> Option<Self> {
        Duration::try_hours(hours).map(TokenLifetime::Bounded)
    }

    /// Whether tokens under this lifetime must carry `exp`.
    pub fn is_bounded(&self) -> bool {
        matches!(self, TokenLifetime::Bounded(_))
    }
}

impl Default for TokenLifetime {
    fn default() -> Self {
        TokenLifetime::hours(24)
    }
}

/// Identity claims carried by every access token.
///
/// One shape for every issuing flow: subject id, display name and email,
/// plus RFC 7519 `iat` and optional `exp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Display name at issuance time
    pub name: String,

    /// Email address at issuance time
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Create claims for a user, stamped with the current time.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `name` - Display name
    /// * `email` - Email address
    /// * `lifetime` - Controls whether and when the token expires
    ///
    /// # Returns
    /// Claims with sub, name, email, iat and (for bounded lifetimes) exp set
    ///
    /// # Errors
    /// * `EncodingFailed` - Expiry falls outside the representable time range
    pub fn for_user(
        user_id: impl ToString,
        name: impl Into<String>,
        email: impl Into<String>,
        lifetime: TokenLifetime,
    ) -> Result<Self, JwtError> {
        let now = Utc::now();

        let exp = match lifetime {
            TokenLifetime::Bounded(duration) => {
                let expires_at = now.checked_add_signed(duration).ok_or_else(|| {
                    JwtError::EncodingFailed(format!(
                        "Token lifetime of {}s overflows the expiry timestamp",
                        duration.num_seconds()
                    ))
                })?;
                Some(expires_at.timestamp())
            }
            TokenLifetime::Unbounded => None,
        };

        Ok(Self {
            sub: user_id.to_string(),
            name: name.into(),
            email: email.into(),
            iat: now.timestamp(),
            exp,
        })
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = iat;
        self
    }
}
