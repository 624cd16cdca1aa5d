use std::net::SocketAddr;

use anyhow::Result;
use img2prompt::common::init_logger_exe;
use img2prompt::ClientSettings;
use tokio::net::TcpListener;

mod service;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {}", e);
        return;
    }
    log::warn!("Ctrl-C received, stopping...");
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger_exe();

    log::info!("Starting server...");

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    log::info!("Attempting to bind to port {}", port);

    let listener = TcpListener::bind(addr).await?;
    log::info!("Successfully bound to http://{}", addr);

    // TLS verification can only be relaxed by whoever runs the server
    let verify_tls = std::env::var("VERIFY_TLS")
        .map(|v| !matches!(v.as_str(), "0" | "false" | "no"))
        .unwrap_or(true);
    let settings = if verify_tls {
        ClientSettings::default()
    } else {
        ClientSettings::insecure()
    };

    let app = service::app(settings);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Exiting...");
    Ok(())
}
