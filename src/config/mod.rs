// Configuration module entry point
// Loads config.toml (optional), DAILY_APP_* environment overrides, and
// code defaults, in that order of precedence

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

impl Config {
    /// Load configuration from the given file path (without extension).
    ///
    /// The file is optional; environment variables prefixed `DAILY_APP`
    /// override it (nested keys use `__`, e.g. `DAILY_APP_SERVER__PORT`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("DAILY_APP").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("http.default_content_type", "text/plain; charset=utf-8")?
            .set_default("http.server_name", "DailyApp/0.1")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
