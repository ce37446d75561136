//! Salonkit server entry point.

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, extract::DefaultBodyLimit, middleware};
use salonkit_api::{
    middleware::AppState, rate_limit::RateLimiterState, router as api_router,
};
use salonkit_common::{Config, PhotoStorage, SettingsStore};
use salonkit_core::{
    ContactService, DomainService, EmailService, OrderService, PaymentService, PhotoService,
    StatsService, StripeClient, TemplateService, UserService,
};
use salonkit_db::repositories::{
    ContactMessageRepository, DomainPricingRepository, OrderRepository, PhotoRepository,
    TemplateRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Uploads can be 10 MiB; leave room for multipart framing.
const MAX_BODY_BYTES: usize = 12 * 1024 * 1024;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "salonkit=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting salonkit server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = salonkit_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    salonkit_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let order_repo = OrderRepository::new(Arc::clone(&db));
    let photo_repo = PhotoRepository::new(Arc::clone(&db));
    let template_repo = TemplateRepository::new(Arc::clone(&db));
    let contact_repo = ContactMessageRepository::new(Arc::clone(&db));
    let pricing_repo = DomainPricingRepository::new(Arc::clone(&db));

    // Photo storage on the local filesystem
    let storage = PhotoStorage::new(
        config.uploads.root.clone(),
        config.uploads.base_url.clone(),
    );

    // Outbound email is optional; without SMTP the contact reply flow is off
    let email_service = match &config.smtp {
        Some(smtp) => Some(EmailService::from_config(smtp, &config.server.site_name)?),
        None => {
            warn!("No SMTP configuration; outbound email is disabled");
            None
        }
    };

    // Initialize services
    let stripe = StripeClient::new(&config.stripe.secret_key, &config.stripe.currency);

    let user_service = UserService::new(user_repo.clone());
    let order_service = OrderService::new(order_repo.clone());
    let photo_service = PhotoService::new(photo_repo.clone(), order_repo.clone(), storage);
    let payment_service = PaymentService::new(stripe, user_repo.clone(), order_repo.clone());
    let stats_service = StatsService::new(
        order_repo.clone(),
        user_repo.clone(),
        photo_repo.clone(),
        contact_repo.clone(),
    );
    let contact_service = ContactService::new(contact_repo, email_service);
    let domain_service = DomainService::new(pricing_repo);
    let template_service = TemplateService::new(template_repo, order_repo);

    let settings_store = SettingsStore::new(config.uploads.settings_path.clone());

    // In-process rate limiter; resets on restart
    let rate_limiter = RateLimiterState::new();

    // Expire idle rate-limit keys so the maps stay bounded
    let cleanup_limiter = rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            cleanup_limiter.cleanup().await;
        }
    });

    // Create app state
    let state = AppState {
        user_service,
        order_service,
        photo_service,
        payment_service,
        stats_service,
        contact_service,
        domain_service,
        template_service,
        settings_store,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router(rate_limiter.clone()))
        .nest_service("/uploads", ServeDir::new(&config.uploads.root))
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            salonkit_api::rate_limit::rate_limit_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            salonkit_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
