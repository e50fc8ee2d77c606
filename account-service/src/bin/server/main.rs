use std::sync::Arc;

use account_service::account::gate::TokenGate;
use account_service::account::ports::AccountServicePort;
use account_service::account::service::AccountService;
use account_service::config::Config;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryUserRepository;
use account_service::outbound::repositories::PostgresUserRepository;
use auth::Authenticator;
use auth::JwtHandler;
use auth::PasswordHasher;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const MAX_DB_CONNECTIONS: u32 = 5;
const MIN_SECRET_BYTES: usize = 32;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    let token_lifetime = config.jwt.lifetime()?;

    tracing::info!(
        http_port = config.server.http_port,
        store = if config.database.url.is_some() {
            "postgresql"
        } else {
            "memory"
        },
        token_lifetime = ?token_lifetime,
        conceal_unknown_accounts = config.auth.conceal_unknown_accounts,
        "Configuration loaded"
    );

    if config.jwt.secret.len() < MIN_SECRET_BYTES {
        tracing::warn!(
            min_bytes = MIN_SECRET_BYTES,
            "JWT secret is shorter than recommended"
        );
    }
    if config.jwt.never_expire {
        tracing::warn!("Issuing tokens without expiry");
    }

    let password_hasher = PasswordHasher::with_cost(config.password.cost())?;
    let jwt_handler =
        JwtHandler::with_lifetime(config.jwt.secret.as_bytes(), token_lifetime);
    let authenticator = Arc::new(Authenticator::from_parts(password_hasher, jwt_handler));
    let login_policy = config.auth.login_policy();

    let account_service: Arc<dyn AccountServicePort> = match &config.database.url {
        Some(url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(MAX_DB_CONNECTIONS)
                .connect(url)
                .await?;
            tracing::info!(
                max_connections = MAX_DB_CONNECTIONS,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            Arc::new(AccountService::new(
                Arc::new(PostgresUserRepository::new(pg_pool)),
                Arc::clone(&authenticator),
                login_policy,
            ))
        }
        None => {
            tracing::warn!("No database.url configured; accounts are kept in memory only");
            Arc::new(AccountService::new(
                Arc::new(InMemoryUserRepository::new()),
                Arc::clone(&authenticator),
                login_policy,
            ))
        }
    };

    let token_gate = TokenGate::new(authenticator);

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(account_service, token_gate)).await?;

    tracing::info!("Server exited");

    Ok(())
}
