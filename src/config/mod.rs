// Configuration module entry point
// Loads configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LogFormat, LoggingConfig, PerformanceConfig, RoutesConfig, ServerConfig,
};

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "COURSES_CONFIG";

/// Config file used when `COURSES_CONFIG` is not set
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

impl Config {
    /// Load configuration from the path in `COURSES_CONFIG`, or `config.toml`
    pub fn load() -> Result<Self, config::ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path
    ///
    /// A missing file is not an error; environment variables prefixed with
    /// `COURSES` (e.g. `COURSES_SERVER__PORT`) and built-in defaults fill the gaps.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("COURSES")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "text")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "course-registry/0.1")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("routes.health_enabled", true)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
