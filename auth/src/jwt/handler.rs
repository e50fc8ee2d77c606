use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::TokenLifetime;
use super::errors::JwtError;

/// JWT token handler for signing and verifying access tokens.
///
/// Uses HS256 (HMAC with SHA-256) with a secret injected at construction.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    lifetime: TokenLifetime,
}

impl JwtHandler {
    /// Create a new JWT handler with the default (bounded) token lifetime.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self::with_lifetime(secret, TokenLifetime::default())
    }

    /// Create a JWT handler with an explicit token lifetime.
    ///
    /// With a bounded lifetime, tokens lacking an `exp` claim are rejected on
    /// decode.
    pub fn with_lifetime(secret: &[u8], lifetime: TokenLifetime) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            lifetime,
        }
    }

    /// Lifetime applied to tokens issued through this handler.
    pub fn lifetime(&self) -> TokenLifetime {
        self.lifetime
    }

    /// Encode claims into a signed JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a JWT token and return its claims.
    ///
    /// Claims are only returned once the signature has been checked against
    /// this handler's secret.
    ///
    /// # Errors
    /// * `TokenExpired` - Token `exp` lies in the past
    /// * `InvalidToken` - Signature mismatch, malformed structure, wrong
    ///   algorithm, missing claims or undecodable payload
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // Past `exp` is expired, with no grace period.
        validation.leeway = 0;
        validation.required_spec_claims.clear();
        if self.lifetime.is_bounded() {
            validation.required_spec_claims.insert("exp".to_string());
        }

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                    _ => JwtError::InvalidToken(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}
