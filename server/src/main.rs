//! Flag Service Server Entry Point

use flag_service::{api, config, db, logging, AppState};
use tracing::info;

#[tokio::main]
async fn main() {
    logging::init().expect("failed to initialize logging");

    let config = match config::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    run_server(config).await;
}

async fn run_server(config: flag_service_common::config::ServerConfig) {
    info!("Flag Service v{}", env!("CARGO_PKG_VERSION"));
    info!(
        bcrypt_cost = config.auth.bcrypt_cost,
        token_ttl_secs = config.auth.token_ttl_secs,
        "Authentication configured"
    );

    let stores = db::connect(&config.storage)
        .await
        .expect("Failed to initialize storage");
    info!("Storage initialized successfully");

    let state = AppState::new(stores, &config.auth).expect("Failed to initialize auth gateway");

    let router = api::create_router(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind to address");

    info!("Flag service listening on {}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    info!("Flag service stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
