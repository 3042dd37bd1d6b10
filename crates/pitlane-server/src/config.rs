//! Server settings from the environment.

use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DATA_DIR_ENV: &str = "PITLANE_DATA_DIR";
pub const PORT_ENV: &str = "PITLANE_PORT";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env::var(DATA_DIR_ENV).ok(), env::var(PORT_ENV).ok())
    }

    fn from_vars(data_dir: Option<String>, port: Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(dir) = data_dir.filter(|d| !d.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(port) = port {
            config.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {:?}", PORT_ENV, port))?;
        }
        Ok(config)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_vars(None, None).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.addr().port(), 3000);
    }

    #[test]
    fn test_overrides() {
        let config =
            ServerConfig::from_vars(Some("/srv/f1".to_string()), Some(" 8080 ".to_string())).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/f1"));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_vars(None, Some("pit".to_string())).unwrap_err();
        assert!(err.to_string().contains(PORT_ENV));
    }
}
