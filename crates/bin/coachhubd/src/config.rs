//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `coachhub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use coachhub_adapter_email_lettre::SmtpConfig;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// SMTP dispatcher settings.
    pub smtp: SmtpConfig,
    /// Scheduler timing settings.
    pub scheduler: SchedulerSection,
    /// Client portal settings.
    pub portal: PortalConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Scheduler timing configuration. The interval is a deployment constant;
/// it is not tunable at runtime through the administrative API.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SchedulerSection {
    /// Whether the recurring scheduler runs at all (the forced-tick
    /// endpoint works either way).
    pub enabled: bool,
    /// Seconds between scheduled ticks.
    pub interval_secs: u64,
    /// Seconds to wait after startup before the first tick.
    pub initial_delay_secs: u64,
    /// Ceiling on one tick's wall-clock seconds.
    pub tick_timeout_secs: u64,
}

/// Client portal configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Default call-to-action link embedded in notification emails.
    pub url: String,
}

impl Config {
    /// Load configuration from `coachhub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if
    /// validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("coachhub.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("COACHHUB_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("COACHHUB_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("COACHHUB_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("COACHHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("COACHHUB_SMTP_HOST") {
            self.smtp.host = val;
        }
        if let Ok(val) = std::env::var("COACHHUB_SMTP_USERNAME") {
            self.smtp.username = val;
        }
        if let Ok(val) = std::env::var("COACHHUB_SMTP_PASSWORD") {
            self.smtp.password = val;
        }
        if let Ok(val) = std::env::var("COACHHUB_PORTAL_URL") {
            self.portal.url = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.scheduler.enabled && self.scheduler.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "scheduler interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Scheduler timings as the app-layer config type.
    #[must_use]
    pub fn scheduler_config(&self) -> coachhub_app::scheduler::SchedulerConfig {
        coachhub_app::scheduler::SchedulerConfig {
            initial_delay: std::time::Duration::from_secs(self.scheduler.initial_delay_secs),
            interval: std::time::Duration::from_secs(self.scheduler.interval_secs),
            tick_timeout: std::time::Duration::from_secs(self.scheduler.tick_timeout_secs),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:coachhub.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "coachhubd=info,coachhub=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 60 * 60,
            initial_delay_secs: 5,
            tick_timeout_secs: 5 * 60,
        }
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            url: "https://portal.example.com/client-portal".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
