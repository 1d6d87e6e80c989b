//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Database configuration (PostgreSQL)
    pub database: DatabaseSettings,

    /// Redis configuration (session store)
    pub redis: RedisSettings,

    /// Session cookie and lifetime settings
    pub session: SessionSettings,

    /// Password hashing work factor
    pub password: PasswordSettings,

    /// External asset uploader
    pub upload: UploadSettings,

    /// Snowflake ID generator settings
    pub snowflake: SnowflakeSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,
}

/// Redis configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    /// Redis connection URL
    pub url: String,
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    /// Secret mixed into the digest that keys server-side session records
    pub secret: String,

    /// Sliding idle timeout in minutes
    pub idle_timeout_minutes: i64,

    /// Name of the cookie carrying the session token
    pub cookie_name: String,

    /// Mark the cookie `Secure` (HTTPS deployments)
    pub cookie_secure: bool,
}

/// Argon2id parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordSettings {
    /// Memory cost in KiB
    pub memory_kib: u32,

    /// Number of passes
    pub iterations: u32,

    /// Degree of parallelism
    pub parallelism: u32,
}

/// External asset uploader configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    /// Endpoint accepting multipart uploads and answering with `{"secure_url": ...}`
    pub endpoint: String,

    /// Optional bearer credential for the upload service
    pub api_key: Option<String>,

    /// Upper bound on a single upload, in seconds
    pub timeout_secs: u64,

    /// Maximum accepted request body, in bytes
    pub max_bytes: usize,
}

/// Snowflake ID generator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeSettings {
    /// Machine/worker ID (0-1023)
    pub machine_id: u16,

    /// Custom epoch timestamp in milliseconds
    pub epoch: u64,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

/// Minimum required length for the session secret (256 bits = 32 bytes)
pub const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Longest accepted session idle timeout (one year).
pub const MAX_IDLE_TIMEOUT_MINUTES: i64 = 525_600;

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if a required value is missing or empty.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 4000)?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("redis.url", "redis://127.0.0.1:6379")?
            .set_default("session.secret", "")?
            .set_default("session.idle_timeout_minutes", 60)?
            .set_default("session.cookie_name", "event_session")?
            .set_default("session.cookie_secure", false)?
            .set_default("password.memory_kib", 19456)?
            .set_default("password.iterations", 2)?
            .set_default("password.parallelism", 1)?
            .set_default("upload.endpoint", "")?
            .set_default("upload.timeout_secs", 30)?
            .set_default("upload.max_bytes", 5 * 1024 * 1024)?
            .set_default("snowflake.machine_id", 1)?
            .set_default("snowflake.epoch", crate::shared::snowflake::DEFAULT_EPOCH)?
            .set_default("cors.allowed_origins", vec!["http://localhost:4000"])?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__SERVER__PORT=4000 -> server.port = 4000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option("session.secret", std::env::var("SESSION_SECRET").ok())?
            .set_override_option("upload.endpoint", std::env::var("UPLOAD_ENDPOINT").ok())?
            .set_override_option("upload.api_key", std::env::var("UPLOAD_API_KEY").ok())?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| {
                settings.validate()?;
                Ok(settings)
            })
    }

    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Message(
                "DATABASE_URL must be set to a non-empty connection string".into(),
            ));
        }
        if self.session.secret.trim().is_empty() {
            return Err(ConfigError::Message("SESSION_SECRET must be set".into()));
        }
        if self.session.secret.len() < MIN_SESSION_SECRET_LENGTH {
            return Err(ConfigError::Message(format!(
                "Session secret must be at least {} characters. Current length: {}",
                MIN_SESSION_SECRET_LENGTH,
                self.session.secret.len()
            )));
        }
        if self.session.cookie_name.is_empty()
            || !self
                .session
                .cookie_name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            return Err(ConfigError::Message(
                "session.cookie_name must be non-empty and contain only [A-Za-z0-9_-]".into(),
            ));
        }
        if !(1..=MAX_IDLE_TIMEOUT_MINUTES).contains(&self.session.idle_timeout_minutes) {
            return Err(ConfigError::Message(format!(
                "session.idle_timeout_minutes must be between 1 and {}",
                MAX_IDLE_TIMEOUT_MINUTES
            )));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Message("PORT must be a non-zero port number".into()));
        }
        if self.upload.endpoint.trim().is_empty() {
            return Err(ConfigError::Message("UPLOAD_ENDPOINT must be set".into()));
        }
        if self.upload.timeout_secs == 0 {
            return Err(ConfigError::Message("upload.timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
