//! Application Startup
//!
//! Service wiring and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::application::services::{
    AssetUploader, AuthService, EventService, PasswordHasher, SessionManager,
};
use crate::config::Settings;
use crate::domain::{EventRepository, SessionStore, UserRepository};
use crate::infrastructure::cache::{self, RedisSessionStore};
use crate::infrastructure::database;
use crate::infrastructure::repositories::{PgEventRepository, PgUserRepository};
use crate::infrastructure::uploader::HttpAssetUploader;
use crate::presentation::http::routes;
use crate::presentation::middleware::{create_cors_layer, create_trace_layer};
use crate::shared::snowflake::SnowflakeGenerator;

/// Storage and upstream implementations the services are built on.
pub struct Backends {
    pub users: Arc<dyn UserRepository>,
    pub events: Arc<dyn EventRepository>,
    pub sessions: Arc<dyn SessionStore>,
    pub uploader: Arc<dyn AssetUploader>,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub sessions: Arc<SessionManager>,
    pub events: Arc<EventService>,
    pub users: Arc<dyn UserRepository>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Build every service from settings and the given backends.
    pub fn new(settings: Settings, backends: Backends) -> Result<Self> {
        let hasher = Arc::new(
            PasswordHasher::new(&settings.password).context("Invalid password hashing parameters")?,
        );
        let ids = Arc::new(SnowflakeGenerator::new(
            settings.snowflake.machine_id,
            settings.snowflake.epoch,
        ));

        let auth = AuthService::new(backends.users.clone(), hasher, ids.clone())
            .context("Failed to initialise authentication")?;

        let idle_timeout = chrono::Duration::try_minutes(settings.session.idle_timeout_minutes)
            .context("session.idle_timeout_minutes is out of range")?;
        let sessions = SessionManager::new(
            backends.sessions,
            backends.users.clone(),
            settings.session.secret.clone(),
            idle_timeout,
        );

        let events = EventService::new(
            backends.events,
            backends.uploader,
            ids,
            std::time::Duration::from_secs(settings.upload.timeout_secs),
        );

        Ok(Self {
            auth: Arc::new(auth),
            sessions: Arc::new(sessions),
            events: Arc::new(events),
            users: backends.users,
            settings: Arc::new(settings),
        })
    }
}

/// Router with the full middleware stack.
pub fn build_router(state: AppState) -> Router {
    let cors = create_cors_layer(&state.settings.cors);

    routes::create_router(state)
        .layer(CompressionLayer::new())
        .layer(create_trace_layer())
        .layer(cors)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        let db = database::connect(&settings.database)
            .await
            .context("Failed to connect to PostgreSQL")?;
        database::migrate(&db)
            .await
            .context("Failed to run database migrations")?;

        let redis = cache::create_redis_client(&settings.redis)
            .await
            .context("Failed to connect to Redis")?;

        let uploader = HttpAssetUploader::new(&settings.upload)?;

        let backends = Backends {
            users: Arc::new(PgUserRepository::new(db.clone())),
            events: Arc::new(PgEventRepository::new(db)),
            sessions: Arc::new(RedisSessionStore::new(redis)),
            uploader: Arc::new(uploader),
        };

        let addr = settings.server_addr();
        let state = AppState::new(settings, backends)?;
        let router = build_router(state);

        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
