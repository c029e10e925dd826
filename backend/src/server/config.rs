//! Server settings loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use user_service::logging::{LogControlError, LogSettings};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 10;
const DEFAULT_KEEP_ALIVE_SECS: u64 = 120;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

/// Listener, timeout and logging settings, read from CLI flags and
/// `USER_SERVICE_*` environment variables.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_SERVICE")]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// TCP port to bind.
    pub port: Option<u16>,
    /// Seconds allowed for a client to send request headers.
    pub read_timeout_secs: Option<u64>,
    /// Seconds an idle keep-alive connection stays open.
    pub keep_alive_secs: Option<u64>,
    /// Seconds in-flight requests get to finish after a shutdown signal.
    pub shutdown_timeout_secs: Option<u64>,
    /// Initial log level.
    pub log_level: Option<String>,
    /// Initial log format.
    pub log_format: Option<String>,
}

impl ServerSettings {
    /// Interface to bind, defaulting to all interfaces.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Port to bind, defaulting to 8080.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs.unwrap_or(DEFAULT_READ_TIMEOUT_SECS))
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs.unwrap_or(DEFAULT_KEEP_ALIVE_SECS))
    }

    pub fn shutdown_timeout_secs(&self) -> u64 {
        self.shutdown_timeout_secs
            .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS)
    }

    /// Initial logging settings plus any configured values that were
    /// rejected in favour of the defaults.
    pub fn log_settings(&self) -> (LogSettings, Vec<LogControlError>) {
        LogSettings::from_raw_lossy(self.log_level.as_deref(), self.log_format.as_deref())
    }
}
