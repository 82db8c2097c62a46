use rust_live_leads::config::Config;
use rust_live_leads::handlers::{refresh_session, AppState};
use rust_live_leads::routes;
use rust_live_leads::sheets_client::SheetsClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration (a missing lead store URL stops
/// startup), builds the lead store client and the session, performs the
/// initial load and serves the controller routes.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_live_leads=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store = SheetsClient::from_config(&config)?;
    tracing::info!(
        "✓ Lead store client initialized: {} (read fallback: {:?})",
        config.leads_api_base_url,
        config.read_fallback
    );

    let port = config.port;
    let app_state = Arc::new(AppState::new(config, store));

    // Initial load; the views can still trigger /sync if this fails.
    match refresh_session(&app_state).await {
        Ok(_) => tracing::info!("Initial lead load complete"),
        Err(e) => tracing::error!("Initial lead load failed: {}", e),
    }

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    let api = routes::api_routes().layer(ServiceBuilder::new().layer(GovernorLayer {
        config: governor_conf,
    }));
    let app = routes::build_router(api, app_state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
