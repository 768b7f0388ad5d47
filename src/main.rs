use car_listing_backend::{
    config::AppConfig, logging::init_telemetry, routes::create_router, state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables first
    dotenvy::dotenv().ok();

    init_telemetry(None)?;

    tracing::info!("Starting Car Listing Backend");

    let config = AppConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Refusing to start with invalid configuration");
    })?;
    let port = config.port;

    // Database failures are logged inside and never abort startup
    let state = AppState::initialize(config).await;

    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        address = %addr,
        port = %port,
        "The server is running and ready to accept connections"
    );

    tracing::info!(
        endpoints = ?vec![
            "GET / - liveness",
            "POST /jwt - issue session cookie",
            "POST /signOut - clear session cookie",
            "GET /products - paginated listing",
            "GET /count - product count",
        ],
        "Available API endpoints"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    car_listing_backend::logging::shutdown_telemetry();

    Ok(())
}

/// Handle graceful shutdown signals
async fn shutdown_signal() {
    use tokio::signal;

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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::warn!("Shutdown signal received, cleaning up...");
}
