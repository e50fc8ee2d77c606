use std::sync::Arc;

use account_service::account::gate::TokenGate;
use account_service::account::service::AccountService;
use account_service::account::service::LoginPolicy;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryUserRepository;
use auth::Authenticator;
use auth::HashingCost;
use auth::JwtHandler;
use auth::PasswordHasher;
use auth::TokenLifetime;
use serde_json::json;
use serde_json::Value;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over an in-memory store
pub struct TestApp {
    pub address: String,
    pub repository: Arc<InMemoryUserRepository>,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_policy(LoginPolicy::default()).await
    }

    pub async fn spawn_with_policy(login_policy: LoginPolicy) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Minimal cost keeps argon2 fast under test
        let password_hasher = PasswordHasher::with_cost(HashingCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build password hasher");
        let authenticator = Arc::new(Authenticator::from_parts(
            password_hasher,
            JwtHandler::with_lifetime(TEST_SECRET, TokenLifetime::hours(24)),
        ));

        let repository = Arc::new(InMemoryUserRepository::new());
        let account_service = Arc::new(AccountService::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
            login_policy,
        ));

        let router = create_router(account_service, TokenGate::new(authenticator));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            repository,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::with_lifetime(TEST_SECRET, TokenLifetime::hours(24)),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// POST a registration body
    pub async fn register(&self, name: &str, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register an account and return its token
    pub async fn register_token(&self, name: &str, email: &str, password: &str) -> String {
        let body: Value = self
            .register(name, email, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");

        body["token"]
            .as_str()
            .expect("Registration returned no token")
            .to_string()
    }
}
