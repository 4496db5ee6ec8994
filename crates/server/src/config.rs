use index::{AnnConfig, ArtifactPaths};
use recommender::RecommendConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Metrics endpoint enabled
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Where the model artifacts live
    #[serde(default)]
    pub artifacts: ArtifactPaths,

    /// Result counts
    #[serde(default)]
    pub recommender: RecommendConfig,

    /// Neighbour index build parameters, used when the artifact manifest
    /// does not carry its own
    #[serde(default)]
    pub ann: AnnConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            metrics_enabled: default_true(),
            artifacts: ArtifactPaths::default(),
            recommender: RecommendConfig::default(),
            ann: AnnConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and config files
    ///
    /// Sources, later ones winning: an optional `server.{toml,yaml,json}` in
    /// the working directory, then `TRACKREC_SERVER__*` environment
    /// variables (`TRACKREC_SERVER__ARTIFACTS__DIR=/srv/model`).
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("server").required(false))
            .add_source(
                config::Environment::with_prefix("TRACKREC_SERVER")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: ServerConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.recommender.validate()?;
        self.ann.validate().map_err(anyhow::Error::msg)?;
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        if self.max_body_size_mb == 0 {
            anyhow::bail!("max_body_size_mb must be greater than zero");
        }
        Ok(())
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    10
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
