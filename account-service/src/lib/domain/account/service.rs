use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Claims;

use crate::account::errors::AccountError;
use crate::account::models::IssuedToken;
use crate::account::models::LoginCommand;
use crate::account::models::NewUser;
use crate::account::models::Password;
use crate::account::models::RegisterCommand;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::ports::AccountServicePort;
use crate::account::ports::UserRepository;

/// How login reports an email with no account behind it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoginPolicy {
    /// Report unknown accounts as `InvalidCredentials` instead of
    /// `UserNotFound`. The real cause is still logged.
    pub conceal_unknown_accounts: bool,
}

/// Domain service implementation for account operations.
///
/// Password hashing and verification run on the blocking thread pool so a
/// slow work factor never stalls unrelated requests.
pub struct AccountService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    login_policy: LoginPolicy,
}

impl<UR> AccountService<UR>
where
    UR: UserRepository,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `authenticator` - Password hasher and token signer
    /// * `login_policy` - Unknown-account reporting policy
    pub fn new(
        repository: Arc<UR>,
        authenticator: Arc<Authenticator>,
        login_policy: LoginPolicy,
    ) -> Self {
        Self {
            repository,
            authenticator,
            login_policy,
        }
    }

    fn claims_for(&self, user: &User) -> Result<Claims, AccountError> {
        Claims::for_user(
            user.id,
            user.name.as_str(),
            user.email.as_str(),
            self.authenticator.token_lifetime(),
        )
        .map_err(|e| AccountError::TokenIssuance(e.to_string()))
    }

    async fn hash_password(&self, password: Password) -> Result<String, AccountError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
            .await
            .map_err(|e| AccountError::Unknown(format!("Hashing task failed: {}", e)))?
            .map_err(AccountError::from)
    }

    async fn authenticate(&self, user: &User, password: Password) -> Result<String, AccountError> {
        let authenticator = Arc::clone(&self.authenticator);
        let stored_hash = user.password_hash.clone();
        let claims = self.claims_for(user)?;

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(password.expose(), &stored_hash, &claims)
        })
        .await
        .map_err(|e| AccountError::Unknown(format!("Verification task failed: {}", e)))?;

        match result {
            Ok(authenticated) => Ok(authenticated.access_token),
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::info!(user_id = %user.id, "Login rejected: password mismatch");
                Err(AccountError::InvalidCredentials)
            }
            Err(AuthenticationError::PasswordError(e)) => Err(AccountError::from(e)),
            Err(AuthenticationError::JwtError(e)) => {
                Err(AccountError::TokenIssuance(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl<UR> AccountServicePort for AccountService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<IssuedToken, AccountError> {
        // Reject before hashing so a duplicate never costs a hash.
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            tracing::info!("Registration rejected: email already registered");
            return Err(AccountError::DuplicateEmail(command.email.to_string()));
        }

        let password_hash = self.hash_password(command.password).await?;

        let user = self
            .repository
            .create(NewUser {
                name: command.name,
                email: command.email,
                password_hash,
            })
            .await?;

        let token = self
            .authenticator
            .issue_token(&self.claims_for(&user)?)
            .map_err(|e| AccountError::TokenIssuance(e.to_string()))?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(IssuedToken {
            user_id: user.id,
            token,
        })
    }

    async fn login(&self, command: LoginCommand) -> Result<IssuedToken, AccountError> {
        let user = match self.repository.find_by_email(&command.email).await? {
            Some(user) => user,
            None if self.login_policy.conceal_unknown_accounts => {
                tracing::info!("Login rejected: no account for email");
                return Err(AccountError::InvalidCredentials);
            }
            None => return Err(AccountError::UserNotFound(command.email.to_string())),
        };

        let token = self.authenticate(&user, command.password).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(IssuedToken {
            user_id: user.id,
            token,
        })
    }

    async fn get_user(&self, id: &UserId) -> Result<User, AccountError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AccountError::UserNotFound(id.to_string()))
    }
}
