use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::pipeline::questions::DEFAULT_MAX_QUESTIONS;
use crate::pipeline::PipelineSettings;

const DEFAULT_STORE_TIMEOUT_MS: u64 = 2000;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub pipeline: PipelineConfig,
}

fn optional_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn positive<T>(key: &str, default: T, error: ConfigError) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + From<u8>,
{
    let Ok(raw) = env::var(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value >= T::from(1) => Ok(value),
        _ => Err(error),
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let pipeline = PipelineConfig {
            lexicon_path: optional_path("RTI_LEXICON_PATH"),
            departments_path: optional_path("RTI_DEPARTMENTS_PATH"),
            rules_path: optional_path("RTI_RULES_PATH"),
            templates_path: optional_path("RTI_TEMPLATES_PATH"),
            max_questions: positive(
                "RTI_MAX_QUESTIONS",
                DEFAULT_MAX_QUESTIONS,
                ConfigError::InvalidMaxQuestions,
            )?,
            store_timeout_ms: positive(
                "RTI_STORE_TIMEOUT_MS",
                DEFAULT_STORE_TIMEOUT_MS,
                ConfigError::InvalidStoreTimeout,
            )?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            pipeline,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Data sources and limits for the intelligence pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Unset means the built-in lexicon.
    pub lexicon_path: Option<PathBuf>,
    pub departments_path: Option<PathBuf>,
    pub rules_path: Option<PathBuf>,
    pub templates_path: Option<PathBuf>,
    pub max_questions: usize,
    pub store_timeout_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lexicon_path: None,
            departments_path: None,
            rules_path: None,
            templates_path: None,
            max_questions: DEFAULT_MAX_QUESTIONS,
            store_timeout_ms: DEFAULT_STORE_TIMEOUT_MS,
        }
    }
}

impl PipelineConfig {
    pub fn settings(&self) -> PipelineSettings {
        PipelineSettings {
            max_questions: self.max_questions,
            store_timeout: Duration::from_millis(self.store_timeout_ms),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidMaxQuestions,
    InvalidStoreTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidMaxQuestions => {
                write!(f, "RTI_MAX_QUESTIONS must be an integer of at least 1")
            }
            ConfigError::InvalidStoreTimeout => {
                write!(f, "RTI_STORE_TIMEOUT_MS must be a positive number of milliseconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidMaxQuestions
            | ConfigError::InvalidStoreTimeout => None,
        }
    }
}
