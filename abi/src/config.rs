// db config
// server config
// log config

use crate::errors::{Error, ErrorKind};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    // db config
    pub db: DbConfig,
    // server config
    pub server: ServerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DbConfig {
    #[serde(default)]
    pub kind: StoreKind,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    #[serde(default = "default_conn")]
    pub max_connections: u32,
    /// run the embedded migrations at startup
    #[serde(default = "default_migrate")]
    pub migrate: bool,
}

fn default_conn() -> u32 {
    5
}

fn default_migrate() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// token lifetime in seconds
    #[serde(default = "default_token_expires")]
    pub token_expires: i64,
}

fn default_token_expires() -> i64 {
    24 * 60 * 60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// write a daily rolling file into this directory instead of stdout
    pub dir: Option<String>,
}

fn default_level() -> String {
    String::from("debug")
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: None,
        }
    }
}

impl Config {
    pub fn load(filename: impl AsRef<Path>) -> Result<Self, Error> {
        let content = fs::read_to_string(filename.as_ref()).map_err(|e| {
            Error::new(
                ErrorKind::ConfigReadError,
                format!("read {}", filename.as_ref().display()),
                e,
            )
        })?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

impl DbConfig {
    pub fn server_url(&self) -> String {
        if self.password.is_empty() {
            return format!("postgres://{}@{}:{}", self.user, self.host, self.port);
        }
        format!(
            "postgres://{}:{}@{}:{}",
            self.user, self.password, self.host, self.port
        )
    }
    pub fn url(&self) -> String {
        format!("{}/{}", self.server_url(), self.database)
    }
}

impl ServerConfig {
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load() {
        let config = Config::load("./fixtures/social.yml").unwrap();
        assert_eq!(config.db.kind, StoreKind::Postgres);
        assert_eq!(config.db.host, "localhost");
        assert_eq!(config.db.port, 5432);
        assert_eq!(config.db.user, "postgres");
        assert_eq!(config.db.password, "postgres");
        assert_eq!(config.db.max_connections, 5);
        assert_eq!(config.server.server_url(), "127.0.0.1:5000");
        assert_eq!(config.server.token_expires, 86400);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn missing_file_should_be_config_read_error() {
        let err = Config::load("./fixtures/not_exists.yml").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigReadError);
    }

    #[test]
    fn db_url_should_omit_empty_password() {
        let config: DbConfig = serde_yaml::from_str(
            "host: db\nport: 5433\nuser: social\npassword: ''\ndatabase: social\nkind: memory",
        )
        .unwrap();
        assert_eq!(config.kind, StoreKind::Memory);
        assert!(config.migrate);
        assert_eq!(config.url(), "postgres://social@db:5433/social");
    }
}
