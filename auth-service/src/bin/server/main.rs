use std::sync::Arc;

use auth::Authenticator;
use auth::AuthorizationGate;
use auth::SigningKeys;
use auth_service::config::Config;
use auth_service::domain::authority::service::AuthorityService;
use auth_service::domain::recovery::service::RecoveryService;
use auth_service::domain::registration::ports::RegistrationServicePort;
use auth_service::domain::registration::service::RegistrationService;
use auth_service::domain::session::ports::SessionServicePort;
use auth_service::domain::session::service::SessionService;
use auth_service::inbound::http::router::create_router;
use auth_service::inbound::http::router::AppState;
use auth_service::inbound::sweeper::ProvisioningSweeper;
use auth_service::outbound::clients::HttpHospitalClient;
use auth_service::outbound::notifiers::ConfiguredNotifier;
use auth_service::outbound::notifiers::LogRecoveryNotifier;
use auth_service::outbound::notifiers::WebhookRecoveryNotifier;
use auth_service::outbound::repositories::PostgresAuthorityRepository;
use auth_service::outbound::repositories::PostgresProvisioningLedger;
use auth_service::outbound::stores::ConfiguredStore;
use auth_service::outbound::stores::InMemoryStore;
use auth_service::outbound::stores::RedisStore;
use auth_service::outbound::stores::UntrackedRefreshTokens;
use auth_service::outbound::stores::VolatileRefreshTokenRegistry;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        hospital_service = %config.hospital_service.base_url,
        track_refresh_tokens = config.jwt.track_refresh_tokens,
        redis = config.redis.url.is_some(),
        "Configuration loaded"
    );

    let keys = Arc::new(SigningKeys::from_pem(
        &config.jwt.private_key_pem(),
        &config.jwt.public_key_pem(),
    )?);
    let authenticator = Arc::new(Authenticator::new(keys, config.jwt.token_policy()));
    let gate = Arc::new(AuthorizationGate::new(authenticator.verifier()));
    tracing::info!(issuer = %config.jwt.issuer, algorithm = "RS256", "Signing keys loaded");

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let volatile_store = Arc::new(match &config.redis.url {
        Some(url) => {
            let store = RedisStore::connect(url).await?;
            tracing::info!(store = "redis", "Volatile store connected");
            ConfiguredStore::Redis(store)
        }
        None => {
            tracing::warn!("No Redis URL configured, volatile state is kept in process memory");
            ConfiguredStore::Memory(InMemoryStore::new())
        }
    });

    let http_client = reqwest::Client::new();
    let notifier = Arc::new(match &config.recovery.webhook_url {
        Some(url) => ConfiguredNotifier::Webhook(WebhookRecoveryNotifier::new(
            url.clone(),
            config.recovery.webhook_timeout(),
            http_client.clone(),
        )),
        None => {
            tracing::warn!("No recovery webhook configured, reset codes are written to the log");
            ConfiguredNotifier::Log(LogRecoveryNotifier)
        }
    });

    let authority_repository = Arc::new(PostgresAuthorityRepository::new(pg_pool.clone()));
    let ledger = Arc::new(PostgresProvisioningLedger::new(pg_pool));
    let hospital_client = Arc::new(HttpHospitalClient::new(
        config.hospital_service.base_url.clone(),
        config.hospital_service.timeout(),
        http_client,
    ));

    let registration_service: Arc<dyn RegistrationServicePort> = Arc::new(RegistrationService::new(
        Arc::clone(&authority_repository),
        hospital_client,
        ledger,
        Arc::clone(&authenticator),
    ));

    let session_service: Arc<dyn SessionServicePort> = if config.jwt.track_refresh_tokens {
        Arc::new(SessionService::new(
            Arc::clone(&authority_repository),
            Arc::new(VolatileRefreshTokenRegistry::new(Arc::clone(&volatile_store))),
            Arc::clone(&authenticator),
        ))
    } else {
        Arc::new(SessionService::new(
            Arc::clone(&authority_repository),
            Arc::new(UntrackedRefreshTokens),
            Arc::clone(&authenticator),
        ))
    };

    let recovery_service = Arc::new(
        RecoveryService::new(
            Arc::clone(&authority_repository),
            volatile_store,
            notifier,
            Arc::clone(&authenticator),
        )
        .with_code_ttl(config.recovery.code_ttl()),
    );

    let authority_service = Arc::new(AuthorityService::new(
        authority_repository,
        Arc::clone(&authenticator),
    ));

    match config.provisioning.sweep_interval() {
        Some(interval) => {
            let sweeper = ProvisioningSweeper::new(
                Arc::clone(&registration_service),
                interval,
                config.provisioning.stale_after(),
            );
            tokio::spawn(sweeper.run());
        }
        None => tracing::info!("Provisioning sweeper disabled"),
    }

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(AppState {
        registration_service,
        session_service,
        recovery_service,
        authority_service,
        gate,
    });

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
