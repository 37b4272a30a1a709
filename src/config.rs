use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::error::ConfigError;

pub const MODEL_PATH_VAR: &str = "GREENROUTE_MODEL_PATH";
pub const HOST_VAR: &str = "GREENROUTE_HOST";
pub const PORT_VAR: &str = "GREENROUTE_PORT";

const DEFAULT_MODEL_PATH: &str = "assets/greenroute_model.json";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key/value source; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(path) = lookup(MODEL_PATH_VAR) {
            config.model_path = PathBuf::from(path);
        }
        if let Some(host) = lookup(HOST_VAR) {
            config.host = host.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidValue {
                    key: HOST_VAR,
                    value: host.clone(),
                    msg: e.to_string(),
                }
            })?;
        }
        if let Some(port) = lookup(PORT_VAR) {
            config.port = port.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    key: PORT_VAR,
                    value: port.clone(),
                    msg: e.to_string(),
                }
            })?;
        }
        Ok(config)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn overrides_from_source() {
        let config = AppConfig::from_lookup(lookup(&[
            (MODEL_PATH_VAR, "/srv/model.json"),
            (HOST_VAR, "127.0.0.1"),
            (PORT_VAR, "9090"),
        ]))
        .unwrap();
        assert_eq!(config.model_path, PathBuf::from("/srv/model.json"));
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:9090");
    }

    #[test]
    fn bad_port_is_reported() {
        let err = AppConfig::from_lookup(lookup(&[(PORT_VAR, "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: PORT_VAR, .. }));
    }
}
