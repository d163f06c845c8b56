// src/config.rs
use crate::domain::errors::{ClientError, ClientResult};
use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// State client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// State service endpoint
    pub service: ServiceConfig,

    /// Monitor loop configuration
    pub monitor: MonitorConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// State service endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the state service; the snapshot lives at its root path
    pub base_url: String,

    /// Optional bearer token injected as an Authorization header
    pub auth_token: Option<String>,

    /// Extra headers injected on every request
    pub headers: Vec<(String, String)>,
}

/// Monitor loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between snapshot fetches
    pub poll_interval_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "warn", "error")
    pub level: String,

    /// Log to file
    pub to_file: bool,

    /// Log file path
    pub file_path: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> ClientResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let service_config = ServiceConfig {
            base_url: env::var("AGENT_STATE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
            auth_token: env::var("AGENT_STATE_TOKEN").ok(),
            headers: env::var("AGENT_STATE_HEADERS")
                .map(|raw| parse_header_pairs(&raw))
                .unwrap_or_default(),
        };

        let monitor_config = MonitorConfig {
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
        };

        let logging_config = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            to_file: env::var("LOG_TO_FILE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            file_path: env::var("LOG_FILE_PATH").ok(),
        };

        Ok(Config {
            service: service_config,
            monitor: monitor_config,
            logging: logging_config,
        })
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ClientResult<Self> {
        let mut file = File::open(path)
            .map_err(|e| ClientError::Config(format!("Failed to open config file: {}", e)))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ClientError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| ClientError::Config(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> ClientResult<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ClientError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)
            .map_err(|e| ClientError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self) -> ClientResult<()> {
        let mut builder = env_logger::Builder::new();

        // Set log level
        let log_level = match self.logging.level.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        };

        builder.filter_level(log_level);

        // Configure output
        if self.logging.to_file {
            if let Some(file_path) = &self.logging.file_path {
                let file = File::create(file_path)
                    .map_err(|e| ClientError::Config(format!("Failed to create log file: {}", e)))?;

                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
        }

        // Initialize the logger
        builder.init();

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                base_url: "http://127.0.0.1:8000".to_string(),
                auth_token: None,
                headers: Vec::new(),
            },
            monitor: MonitorConfig {
                poll_interval_secs: 5,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                to_file: false,
                file_path: None,
            },
        }
    }
}

/// Parse "name=value,name=value" header pairs; malformed entries are dropped.
fn parse_header_pairs(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|pair| {
            let mut kv = pair.splitn(2, '=');
            match (kv.next(), kv.next()) {
                (Some(name), Some(value)) if !name.trim().is_empty() => {
                    Some((name.trim().to_string(), value.trim().to_string()))
                }
                _ => None,
            }
        })
        .collect()
}

/// Credential material the desktop shell mounts into an agent container.
/// Wire names are camelCase for compatibility with that shell; the query
/// path never reads these files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfiguration {
    /// Path to the agent's private key file
    pub private_key_path: String,

    /// Path to the agent's environment file
    pub environment_path: String,
}

impl UserConfiguration {
    /// Load the shell-facing credential paths from environment variables
    pub fn from_env() -> ClientResult<Self> {
        dotenv().ok();

        Ok(Self {
            private_key_path: env::var("PRIVATE_KEY_PATH").map_err(|_| {
                ClientError::Config("Missing PRIVATE_KEY_PATH environment variable".to_string())
            })?,
            environment_path: env::var("ENVIRONMENT_PATH").map_err(|_| {
                ClientError::Config("Missing ENVIRONMENT_PATH environment variable".to_string())
            })?,
        })
    }
}
