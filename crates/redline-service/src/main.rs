//! Redline Service - HTTP API for the pay-per-use document-review core.
//!
//! This is the main entry point for the redline service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redline_service::{create_router, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,redline=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Redline Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        payments_configured = %config.stripe_api_key.is_some(),
        generation_configured = %config.anthropic_api_key.is_some(),
        mail_configured = %config.mailersend_api_key.is_some(),
        "Service configuration loaded"
    );

    // Build app state: the session core plus collaborator clients.
    //
    // All three shared structures (quota windows, content cache,
    // fulfillment ledger) live in this process only. A restart resets the
    // ledger to zero known-consumed tokens, so any deployment with more
    // than one instance, or with restarts during active payment windows,
    // needs a durable store behind the same contracts.
    let state = AppState::new(config.clone());

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
