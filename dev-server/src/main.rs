//! Development server for dashboard UI development
//!
//! This binary keeps the mock dashboard API running with the demo dataset,
//! signed in as the demo user. Signing out through the UI works, and the
//! login redirect signs the demo user straight back in.
//!
//! Usage: cargo run -p dev-server

use anyhow::Result;
use test_helpers::{
    mock::{Dataset, MockBackend},
    telemetry,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = telemetry::get_subscriber("info".into());
    telemetry::init_subscriber(subscriber)?;

    if let Err(e) = run().await {
        telemetry::log_error(e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let ip = std::env::var("IP_ADDRESS").unwrap_or_else(|_| "127.0.0.1".into());
    let port = match std::env::var("PORT") {
        Ok(port) => port.parse()?,
        Err(_) => 8000,
    };

    info!("🚀 Starting dashboard development server");

    let dataset = Dataset::sample();
    let backend = MockBackend::new(dataset.clone());
    let (server, port) = test_helpers::build(&ip, port, backend)?;
    let handle = server.handle();
    tokio::spawn(server);

    info!("🎯 Development server ready!");
    info!("   API: http://{ip}:{port}");
    info!("   Shell: cargo run -p prerender -- --bot-from http://{ip}:{port}");
    info!("   UI:    cd ui && BACKEND_URL=http://{ip}:{port} trunk serve");
    info!("");
    dataset.print_summary();
    info!("");
    info!("👋 Press Ctrl+C to shutdown");

    // Keep server running until Ctrl+C
    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down development server");
    handle.stop(true).await;
    Ok(())
}
