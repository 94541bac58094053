//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::cache::GeocodeCacheConfig;
use crate::geocoding::{DEFAULT_CITY, NominatimConfig, SerpApiConfig};
use crate::planner::PlannerConfig;

const DEFAULT_DATABASE: &str = "mo_bus_complete_database.json";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Errors reading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid MOBUS_ADDR {value:?}: {source}")]
    InvalidAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path to the network database (`MOBUS_DATABASE`)
    pub database_path: PathBuf,
    /// Listen address (`MOBUS_ADDR`)
    pub addr: SocketAddr,
    /// City assumed for place names (`MOBUS_DEFAULT_CITY`)
    pub default_city: String,
    pub serpapi: SerpApiConfig,
    pub nominatim: NominatimConfig,
    pub geocode_cache: GeocodeCacheConfig,
    pub planner: PlannerConfig,
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which returns a variable's
    /// value if it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let addr_value = var("MOBUS_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_value
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidAddr {
                value: addr_value.clone(),
                source,
            })?;

        let serpapi = match var("SERPAPI_KEY").or_else(|| var("SERP_API_KEY")) {
            Some(key) => SerpApiConfig::new(key),
            None => SerpApiConfig::default(),
        };

        Ok(Self {
            database_path: var("MOBUS_DATABASE")
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string())
                .into(),
            addr,
            default_city: var("MOBUS_DEFAULT_CITY").unwrap_or_else(|| DEFAULT_CITY.to_string()),
            serpapi,
            nominatim: NominatimConfig::default(),
            geocode_cache: GeocodeCacheConfig::default(),
            planner: PlannerConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|name| env.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.database_path, PathBuf::from("mo_bus_complete_database.json"));
        assert_eq!(config.addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.default_city, "Bhubaneswar");
        assert!(config.serpapi.api_key.is_none());
        assert_eq!(config.planner, PlannerConfig::default());
    }

    #[test]
    fn overrides() {
        let config = from_pairs(&[
            ("MOBUS_DATABASE", "/data/mobus.json"),
            ("MOBUS_ADDR", "0.0.0.0:8080"),
            ("MOBUS_DEFAULT_CITY", "Cuttack"),
        ])
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/data/mobus.json"));
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.default_city, "Cuttack");
    }

    #[test]
    fn serpapi_key_either_name() {
        let config = from_pairs(&[("SERP_API_KEY", "alt")]).unwrap();
        assert_eq!(config.serpapi.api_key.as_deref(), Some("alt"));

        let config = from_pairs(&[("SERPAPI_KEY", "main"), ("SERP_API_KEY", "alt")]).unwrap();
        assert_eq!(config.serpapi.api_key.as_deref(), Some("main"));
    }

    #[test]
    fn blank_values_are_unset() {
        let config = from_pairs(&[("SERPAPI_KEY", "  "), ("MOBUS_DEFAULT_CITY", "")]).unwrap();
        assert!(config.serpapi.api_key.is_none());
        assert_eq!(config.default_city, "Bhubaneswar");
    }

    #[test]
    fn bad_address() {
        let err = from_pairs(&[("MOBUS_ADDR", "not an address")]).unwrap_err();
        assert!(err.to_string().contains("not an address"));
    }
}
