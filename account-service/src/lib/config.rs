use std::env;

use auth::HashingCost;
use auth::TokenLifetime;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::account::service::LoginPolicy;

/// Legacy single-variable form of `jwt.secret`.
const LEGACY_SECRET_VARIABLE: &str = "JWT_SECRET";

/// Longest bounded token lifetime accepted, ten years.
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365 * 10;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { http_port: 5000 }
    }
}

/// Store selection: Postgres when `url` is set, in-memory otherwise.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
    #[serde(default)]
    pub never_expire: bool,
}

fn default_expiration_hours() -> i64 {
    24
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .field("never_expire", &self.never_expire)
            .finish()
    }
}

impl JwtConfig {
    /// Token lifetime; unbounded only when `never_expire` is set.
    ///
    /// # Errors
    /// * `ConfigError::Message` - `expiration_hours` outside `1..=MAX_EXPIRATION_HOURS`
    pub fn lifetime(&self) -> Result<TokenLifetime, ConfigError> {
        if self.never_expire {
            return Ok(TokenLifetime::Unbounded);
        }
        if !(1..=MAX_EXPIRATION_HOURS).contains(&self.expiration_hours) {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be between 1 and {}; \
                 set jwt.never_expire for non-expiring tokens",
                MAX_EXPIRATION_HOURS
            )));
        }

        TokenLifetime::try_hours(self.expiration_hours).ok_or_else(|| {
            ConfigError::Message(format!(
                "jwt.expiration_hours out of range: {}",
                self.expiration_hours
            ))
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        let cost = HashingCost::default();
        Self {
            memory_kib: cost.memory_kib,
            iterations: cost.iterations,
            parallelism: cost.parallelism,
        }
    }
}

impl PasswordConfig {
    pub fn cost(&self) -> HashingCost {
        HashingCost {
            memory_kib: self.memory_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub conceal_unknown_accounts: bool,
}

impl AuthConfig {
    pub fn login_policy(&self) -> LoginPolicy {
        LoginPolicy {
            conceal_unknown_accounts: self.conceal_unknown_accounts,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. `JWT_SECRET` (legacy, secret only)
    /// 2. Environment variables (ACCOUNT__JWT__SECRET, ACCOUNT__SERVER__HTTP_PORT, etc.)
    /// 3. Environment-specific config file (config/{environment}.toml)
    /// 4. Default config file (config/default.toml)
    ///
    /// A missing or blank signing secret is an error: the service must not
    /// start without one.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: ACCOUNT__JWT__SECRET=... overrides jwt.secret
            .add_source(
                Environment::with_prefix("ACCOUNT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_override_option("jwt.secret", env::var(LEGACY_SECRET_VARIABLE).ok())?
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must be set (ACCOUNT__JWT__SECRET or JWT_SECRET)".to_string(),
            ));
        }
        self.jwt.lifetime()?;
        Ok(())
    }
}
