use std::sync::Arc;

use authkit::TokenSigner;
use gate_service::account::models::LockoutPolicy;
use gate_service::account::service::IdentityService;
use gate_service::config::Config;
use gate_service::flow::service::AuthFlow;
use gate_service::inbound::http::antiforgery::AntiForgery;
use gate_service::inbound::http::cookies::CookieTtls;
use gate_service::inbound::http::router::create_router;
use gate_service::outbound::repositories::PostgresCredentialStore;
use gate_service::outbound::second_factor::FixedCodeVerifier;
use gate_service::session::service::SignedSessionIssuer;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gate_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "gate-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        lockout_max_failures = config.auth.lockout_max_failures,
        lockout_duration_minutes = config.auth.lockout_duration_minutes,
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

    let signer = Arc::new(TokenSigner::new(config.auth.secret.as_bytes()));

    let store = Arc::new(PostgresCredentialStore::new(pg_pool));
    let lockout = LockoutPolicy::new(
        config.auth.lockout_max_failures,
        config.auth.lockout_duration_minutes,
    );
    let identity = Arc::new(IdentityService::new(store, lockout));

    let sessions = Arc::new(SignedSessionIssuer::new(
        Arc::clone(&signer),
        config.auth.session_ttl_hours,
        config.auth.remembered_ttl_hours,
        config.auth.challenge_ttl_minutes,
    ));

    let second_factor = Arc::new(FixedCodeVerifier::new(
        config.auth.second_factor_code.clone(),
    ));

    let flow = Arc::new(AuthFlow::new(
        identity,
        Arc::clone(&sessions),
        second_factor,
    ));

    let antiforgery = Arc::new(AntiForgery::new(Arc::clone(&signer)));
    let cookie_ttls = CookieTtls::new(
        config.auth.remembered_ttl_hours,
        config.auth.challenge_ttl_minutes,
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let application = create_router(flow, sessions, antiforgery, cookie_ttls);
    axum::serve(http_listener, application).await?;

    Ok(())
}
