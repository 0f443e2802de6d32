//! Configuration management for auth-gate
//!
//! This module handles loading, parsing, and validating application
//! configuration from YAML files and environment variables.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Built-in development signing secret
///
/// Only suitable for local development; `main` warns loudly when it is still
/// in use at startup.
pub const DEFAULT_JWT_SECRET: &str = "auth-gate-dev-secret-do-not-use-in-production";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileRead(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    ///
    /// `${VAR_NAME}` references are expanded from the environment before
    /// parsing, so secrets can live outside the file.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(yaml);
        serde_yaml::from_str(&expanded)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse YAML: {}", e)))
    }

    /// Load configuration from environment variables with prefix AUTH_GATE_
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Ok(host) = std::env::var("AUTH_GATE_SERVER_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("AUTH_GATE_SERVER_PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid port number".to_string()))?;
        }

        if let Ok(secret) = std::env::var("AUTH_GATE_JWT_SECRET") {
            config.auth.jwt_secret = secret;
        }
        if let Ok(ttl) = std::env::var("AUTH_GATE_TOKEN_TTL_MS") {
            config.auth.token_ttl_ms = ttl
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid token TTL".to_string()))?;
        }

        if let Ok(users) = std::env::var("AUTH_GATE_USERS") {
            config.auth.users = parse_user_list(&users)?;
        }

        if let Ok(level) = std::env::var("AUTH_GATE_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("AUTH_GATE_LOG_FORMAT") {
            config.logging.format = format;
        }

        Ok(config)
    }
}

/// Parse a seed-account list of the form `user1:pass1,user2:pass2`
///
/// Entries are trimmed; empty entries are skipped so trailing commas are
/// harmless.
fn parse_user_list(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut users = HashMap::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (username, password) = entry.split_once(':').ok_or_else(|| {
            ConfigError::Parse(format!("Invalid user entry {:?}, expected user:password", entry))
        })?;
        users.insert(username.trim().to_string(), password.trim().to_string());
    }

    Ok(users)
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthConfig {
    /// Process-wide token signing secret, loaded once at startup
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Token time-to-live in milliseconds
    #[serde(default = "default_token_ttl_ms")]
    pub token_ttl_ms: i64,

    /// Accounts registered into the credential store at startup
    /// (username -> plaintext password, hashed on insertion)
    #[serde(default)]
    pub users: HashMap<String, String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_ms: default_token_ttl_ms(),
            users: HashMap::new(),
        }
    }
}

fn default_jwt_secret() -> String {
    DEFAULT_JWT_SECRET.to_string()
}

fn default_token_ttl_ms() -> i64 {
    86_400_000 // 24 hours
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// Configuration error types
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Error reading configuration file
    #[error("Failed to read configuration file: {0}")]
    FileRead(String),

    /// Error parsing configuration
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Expand environment variables in a string
///
/// Supports `${VAR_NAME}` syntax; unknown variables are left as-is.
fn expand_env_vars(input: &str) -> String {
    let re = regex_lite::Regex::new(r"\$\{([^}]+)\}")
        .expect("Invalid regex pattern for environment variable expansion");

    re.replace_all(input, |caps: &regex_lite::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
    })
    .into_owned()
}
