use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::account::service::AuthService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::PostgresAccountRepository;
use account_service::outbound::repositories::PostgresSessionTokenRepository;
use account_service::outbound::repositories::PostgresVerificationTokenRepository;
use auth::CredentialVerifier;
use auth::JwtTokenService;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

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

    tracing::info!(
        database_url = %config.database.url,
        http_port = config.server.http_port,
        jwt_expiration_hours = config.jwt.expiration_hours,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let credential_verifier = Arc::new(CredentialVerifier::new());
    let token_service = Arc::new(JwtTokenService::new(
        config.jwt.secret.as_bytes(),
        config.jwt.expiration_hours,
    ));

    let account_repository = Arc::new(PostgresAccountRepository::new(pg_pool.clone()));
    let verification_token_repository =
        Arc::new(PostgresVerificationTokenRepository::new(pg_pool.clone()));
    let session_token_repository = Arc::new(PostgresSessionTokenRepository::new(pg_pool));

    let auth_service = Arc::new(AuthService::new(
        account_repository,
        verification_token_repository,
        session_token_repository,
        credential_verifier,
        Arc::clone(&token_service),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, token_service);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");

    Ok(())
}
