// Database Configuration
// Handles PostgreSQL and SQLite configuration plus capture settings

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Database type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    Postgres,
    Sqlite,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(rename = "type")]
    pub db_type: DatabaseType,

    // PostgreSQL settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,

    // SQLite settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Capture and query settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Persist the (port-stripped) source address of each observation
    #[serde(default)]
    pub log_ips: bool,

    /// Entries kept per frequency map in lookup results
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    crate::correlation::DEFAULT_TOP_K
}

/// Full configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,

    #[serde(default)]
    pub capture: CaptureConfig,
}

impl DatabaseConfig {
    /// Create PostgreSQL configuration
    pub fn postgres(
        host: String,
        port: u16,
        database: String,
        username: String,
        password: String,
    ) -> Self {
        Self {
            db_type: DatabaseType::Postgres,
            host: Some(host),
            port: Some(port),
            database: Some(database),
            username: Some(username),
            password: Some(password),
            max_connections: Some(10),
            path: None,
        }
    }

    /// Create SQLite configuration
    pub fn sqlite(path: PathBuf) -> Self {
        Self {
            db_type: DatabaseType::Sqlite,
            host: None,
            port: None,
            database: None,
            username: None,
            password: None,
            max_connections: None,
            path: Some(path),
        }
    }

    /// Generate database URL for sqlx
    pub fn connection_string(&self) -> crate::Result<String> {
        match self.db_type {
            DatabaseType::Postgres => {
                let host = self.host.as_ref().ok_or_else(|| missing("PostgreSQL host"))?;
                let port = self.port.ok_or_else(|| missing("PostgreSQL port"))?;
                let database = self.database.as_ref().ok_or_else(|| missing("database name"))?;
                let username = self.username.as_ref().ok_or_else(|| missing("username"))?;
                let password = self.password.as_ref().ok_or_else(|| missing("password"))?;

                Ok(format!(
                    "postgres://{}:{}@{}:{}/{}",
                    username, password, host, port, database
                ))
            }
            DatabaseType::Sqlite => {
                let path = self.path.as_ref().ok_or_else(|| missing("SQLite path"))?;

                let path_str = path.to_string_lossy();
                if path_str == ":memory:" {
                    Ok(format!("sqlite:{}", path_str))
                } else if path_str.starts_with('/') {
                    Ok(format!("sqlite://{}", path.display()))
                } else if cfg!(windows) && path_str.len() > 1 && path_str.as_bytes()[1] == b':' {
                    Ok(format!("sqlite:///{}", path.display()))
                } else {
                    Ok(format!("sqlite:{}", path.display()))
                }
            }
        }
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> crate::Result<Config> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            crate::CorrelationError::ConfigError {
                message: format!("Failed to read config {}: {}", path, e),
            }
        })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Create example configuration file
    pub fn create_example_config(path: &str) -> crate::Result<()> {
        let example = r#"[database]
# Database type: "postgres" or "sqlite"
type = "sqlite"
path = "./fpscope.db"

# PostgreSQL configuration (uncomment to use)
# type = "postgres"
# host = "localhost"
# port = 5432
# database = "fpscope"
# username = "fpscope"
# password = "secure_password"
# max_connections = 10

[capture]
# Store the source address (without port) of every observation
log_ips = false

# Entries kept per frequency map in lookup results
top_k = 10
"#;

        std::fs::write(path, example)?;
        Ok(())
    }
}

fn missing(what: &str) -> crate::CorrelationError {
    crate::CorrelationError::ConfigError {
        message: format!("Missing {}", what),
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::sqlite(PathBuf::from("fpscope.db"))
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            log_ips: false,
            top_k: default_top_k(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            capture: CaptureConfig::default(),
        }
    }
}
