use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::fixtures::Fixtures;

const CONFIG_PATH_ENV: &str = "WALLET_API_CONFIG";
const CONFIG_ENV_ENV: &str = "WALLET_API_ENV";
const ENV_PREFIX: &str = "WALLET_API";

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Reference data loaded into the store at startup. Omitting the section
    /// seeds the built-in testnets.
    #[serde(default)]
    pub fixtures: Fixtures,
}

impl ApiConfig {
    pub fn load() -> Result<Self> {
        let configured_path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config/api.toml".to_string());
        assert!(
            !configured_path.is_empty(),
            "Configuration path must be non-empty"
        );
        assert!(
            configured_path.len() < 4096,
            "Configuration path length exceeds hard limit"
        );

        let mut builder = Config::builder()
            .add_source(File::new(&configured_path, FileFormat::Toml).required(true));

        if let Ok(env_override) = std::env::var(CONFIG_ENV_ENV) {
            if !env_override.is_empty() {
                let env_file = format!("config/api.{}.toml", env_override);
                if Path::new(&env_file).exists() {
                    builder = builder.add_source(File::new(&env_file, FileFormat::Toml));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        Self::from_builder(builder, &configured_path)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>, path: &str) -> Result<Self> {
        let settings = builder
            .build()
            .map_err(|err| map_config_error(err, path))?;
        let mut config: Self = settings
            .try_deserialize()
            .context("Failed to deserialize API configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&mut self) -> Result<()> {
        assert!(
            self.server.port > 0,
            "Server port must be greater than zero"
        );
        assert!(
            !self.logging.level.trim().is_empty(),
            "Logging level must be specified"
        );
        self.fixtures
            .validate()
            .context("Invalid fixture configuration")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Option<IpAddr>,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> SocketAddr {
        let host = self.host.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert!(self.port != 0, "HTTP port cannot be zero");
        SocketAddr::new(host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Fallback filter when `RUST_LOG` is unset.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

fn map_config_error(err: ConfigError, path: &str) -> ConfigError {
    match err {
        ConfigError::NotFound(_) => ConfigError::NotFound(path.to_string()),
        other => other,
    }
}
