//! # Event Manager
//!
//! Multi-user event management service.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Database connection pool and migrations
//! - Redis session store
//! - HTTP server

use anyhow::Result;
use tracing::info;

use event_manager::config::Settings;
use event_manager::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    event_manager::telemetry::init_tracing();

    info!("Starting Event Manager...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!(addr = %application.local_addr()?, "Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
