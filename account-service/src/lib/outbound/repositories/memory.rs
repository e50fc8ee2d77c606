use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::account::errors::AccountError;
use crate::account::models::EmailAddress;
use crate::account::models::NewUser;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::ports::UserRepository;

/// Process-local user store.
///
/// The duplicate check and the insert share one write lock, so concurrent
/// registrations of the same email yield exactly one created user.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, AccountError> {
        let mut users = self.users.write().await;

        if users.values().any(|existing| existing.email == user.email) {
            return Err(AccountError::DuplicateEmail(user.email.to_string()));
        }

        let created = User {
            id: UserId::new(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            followers: Vec::new(),
            followings: Vec::new(),
            created_at: Utc::now(),
        };
        users.insert(created.id, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AccountError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| &user.email == email)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::account::models::DisplayName;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: DisplayName::new("Test User".to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repository = InMemoryUserRepository::new();

        let created = repository.create(new_user("t@test.com")).await.unwrap();

        let by_id = repository.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email.as_str(), "t@test.com");
        assert!(by_id.followers.is_empty());

        let by_email = repository
            .find_by_email(&created.email)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);
    }

    #[tokio::test]
    async fn test_find_missing() {
        let repository = InMemoryUserRepository::new();
        let email = EmailAddress::new("nobody@test.com".to_string()).unwrap();

        assert!(repository.find_by_id(&UserId::new()).await.unwrap().is_none());
        assert!(repository.find_by_email(&email).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_sensitive() {
        let repository = InMemoryUserRepository::new();
        repository.create(new_user("t@test.com")).await.unwrap();

        let upper = EmailAddress::new("T@TEST.COM".to_string()).unwrap();
        assert!(repository.find_by_email(&upper).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repository = InMemoryUserRepository::new();
        repository.create(new_user("t@test.com")).await.unwrap();

        let result = repository.create(new_user("t@test.com")).await;
        assert!(matches!(result, Err(AccountError::DuplicateEmail(_))));
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_yield_one_user() {
        let repository = Arc::new(InMemoryUserRepository::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repository = Arc::clone(&repository);
                tokio::spawn(async move { repository.create(new_user("race@test.com")).await })
            })
            .collect();

        let mut created = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AccountError::DuplicateEmail(_)) => duplicates += 1,
                Err(other) => panic!("unexpected error: {}", other),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(duplicates, 15);
        assert_eq!(repository.len().await, 1);
    }
}
