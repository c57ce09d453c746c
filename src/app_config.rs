use anyhow::{Context, Result, anyhow};
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Question store settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// HTTP server configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    // @field: Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    // @field: TCP port
    #[serde(default = "default_port")]
    pub port: u16,

    // @field: Prefix for every API route, empty for none
    #[serde(default = "default_base_path")]
    pub base_path: String,

    // @field: Allowed CORS origins, "*" allows any
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    // @field: Directory served under /images
    #[serde(default = "default_images_dir")]
    pub images_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_path: default_base_path(),
            cors_origins: default_cors_origins(),
            images_dir: default_images_dir(),
        }
    }
}

impl ServerConfig {
    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL used in startup messages
    pub fn server_url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, self.base_path)
    }

    /// Whether any origin may call the API
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

/// Question store configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// Path to the SQLite file written by the question loader
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_base_path() -> String {
    "/enem".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_images_dir() -> String {
    "images".to_string()
}

fn default_database_path() -> String {
    crate::database::connection::DEFAULT_DB_FILENAME.to_string()
}

impl Config {
    /// Load configuration from `path`, writing the defaults there if the file is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;

            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

            Ok(config)
        } else {
            warn!(
                "Config file not found at '{}', creating default config.",
                path.display()
            );

            let config = Config::default();
            let config_json = serde_json::to_string_pretty(&config)
                .context("Failed to serialize default config to JSON")?;

            std::fs::write(path, config_json).with_context(|| {
                format!("Failed to write default config to file: {}", path.display())
            })?;

            Ok(config)
        }
    }

    /// Apply `PORT`, `ENEM_HOST` and `ENEM_DATABASE_PATH` from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port_str) = lookup("PORT") {
            match port_str.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!(
                    "Invalid PORT value '{}', using {}",
                    port_str, self.server.port
                ),
            }
        }

        if let Some(host) = lookup("ENEM_HOST") {
            self.server.host = host;
        }

        if let Some(path) = lookup("ENEM_DATABASE_PATH") {
            self.database.path = path;
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(anyhow!("Server host must not be empty"));
        }

        if self.server.port == 0 {
            return Err(anyhow!("Server port must not be 0"));
        }

        let base_path = &self.server.base_path;
        if !base_path.is_empty() && (!base_path.starts_with('/') || base_path.ends_with('/')) {
            return Err(anyhow!(
                "Base path '{}' must start with '/' and must not end with '/'",
                base_path
            ));
        }

        if self.database.path.trim().is_empty() {
            return Err(anyhow!("Database path must not be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
