//! Environment configuration
//!
//! Reads:
//!   ROOT_DIRECTORY  directory served by the listing/fetch API (required)
//!   PORT            listen port (default: 3000)
//!   BIND_ADDR       listen host (default: 0.0.0.0)
//!   STATIC_DIR      UI asset directory (default: static)

use std::path::PathBuf;

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_STATIC_DIR: &str = "static";
/// Server the CLI talks to when `VIZ_SERVER` is unset
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub root_directory: PathBuf,
    pub bind_addr: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// Load from the process environment, after applying any `.env` file
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let root_directory = lookup("ROOT_DIRECTORY")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| ConfigError::Missing {
                var: "ROOT_DIRECTORY".to_string(),
            })?;

        let port = match lookup("PORT") {
            Some(value) => value.parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT".to_string(),
                value: value.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            root_directory,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            port,
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[("ROOT_DIRECTORY", "/data")])).unwrap();
        assert_eq!(config.root_directory, PathBuf::from("/data"));
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
        assert_eq!(config.static_dir, PathBuf::from("static"));
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("ROOT_DIRECTORY", "/data"),
            ("PORT", "8080"),
            ("BIND_ADDR", "127.0.0.1"),
            ("STATIC_DIR", "ui/dist"),
        ]))
        .unwrap();
        assert_eq!(config.listen_addr(), "127.0.0.1:8080");
        assert_eq!(config.static_dir, PathBuf::from("ui/dist"));
    }

    #[test]
    fn test_root_directory_required() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("ROOT_DIRECTORY", "")])),
            Err(ConfigError::Missing { .. })
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing { .. })
        ));
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup(&[("ROOT_DIRECTORY", "/d"), ("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "PORT"));
    }
}
