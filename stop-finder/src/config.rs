//! Application configuration from environment variables.
//!
//! Every setting has a default, so an empty environment gives a working
//! server pointed at the public KMB API. A variable that is set but does
//! not parse is an error rather than being silently ignored.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::directory::{DEFAULT_BASE_URL, DirectoryClientConfig, SessionConfig};
use crate::eta::EtaClientConfig;
use crate::finder::FinderConfig;

/// Listen address.
pub const ENV_ADDR: &str = "STOP_FINDER_ADDR";
/// Base URL of the transit API.
pub const ENV_API_BASE: &str = "STOP_FINDER_API_BASE";
/// Per-request HTTP timeout.
pub const ENV_HTTP_TIMEOUT_SECS: &str = "STOP_FINDER_HTTP_TIMEOUT_SECS";
/// Bound on waiting for the stop directory during a search.
pub const ENV_DIRECTORY_TIMEOUT_SECS: &str = "STOP_FINDER_DIRECTORY_TIMEOUT_SECS";
/// Bound on waiting for a position fix.
pub const ENV_POSITION_TIMEOUT_SECS: &str = "STOP_FINDER_POSITION_TIMEOUT_SECS";
/// Drop the cached directory after this long unused. Unset keeps it forever.
pub const ENV_SESSION_IDLE_SECS: &str = "STOP_FINDER_SESSION_IDLE_SECS";
/// Cap on stops returned per search. Unset returns all.
pub const ENV_MAX_RESULTS: &str = "STOP_FINDER_MAX_RESULTS";

/// A configuration variable held a value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {var}: {value:?}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub api_base: String,
    pub http_timeout_secs: u64,
    pub directory_timeout: Duration,
    pub position_timeout: Duration,
    pub session_idle: Option<Duration>,
    pub max_results: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let finder = FinderConfig::default();
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            api_base: DEFAULT_BASE_URL.to_string(),
            http_timeout_secs: 30,
            directory_timeout: finder.directory_timeout,
            position_timeout: finder.position_timeout,
            session_idle: None,
            max_results: finder.max_results,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value
    /// if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let secs = |var| parse::<u64>(&lookup, var).map(|v| v.map(Duration::from_secs));

        Ok(Self {
            addr: parse(&lookup, ENV_ADDR)?.unwrap_or(defaults.addr),
            api_base: lookup(ENV_API_BASE)
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.api_base),
            http_timeout_secs: parse(&lookup, ENV_HTTP_TIMEOUT_SECS)?
                .unwrap_or(defaults.http_timeout_secs),
            directory_timeout: secs(ENV_DIRECTORY_TIMEOUT_SECS)?
                .unwrap_or(defaults.directory_timeout),
            position_timeout: secs(ENV_POSITION_TIMEOUT_SECS)?
                .unwrap_or(defaults.position_timeout),
            session_idle: secs(ENV_SESSION_IDLE_SECS)?.or(defaults.session_idle),
            max_results: parse(&lookup, ENV_MAX_RESULTS)?.or(defaults.max_results),
        })
    }

    pub fn directory_client(&self) -> DirectoryClientConfig {
        DirectoryClientConfig::new()
            .with_base_url(&self.api_base)
            .with_timeout(self.http_timeout_secs)
    }

    pub fn eta_client(&self) -> EtaClientConfig {
        EtaClientConfig::new()
            .with_base_url(&self.api_base)
            .with_timeout(self.http_timeout_secs)
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            idle_timeout: self.session_idle,
            ..SessionConfig::default()
        }
    }

    pub fn finder(&self) -> FinderConfig {
        FinderConfig::default()
            .with_directory_timeout(self.directory_timeout)
            .with_position_timeout(self.position_timeout)
            .with_max_results(self.max_results)
    }
}

fn parse<V: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<V>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = from_pairs(&[]).unwrap();

        assert_eq!(config.addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(config.api_base, DEFAULT_BASE_URL);
        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(config.directory_timeout, Duration::from_secs(30));
        assert_eq!(config.position_timeout, Duration::from_secs(10));
        assert_eq!(config.session_idle, None);
        assert_eq!(config.max_results, None);
    }

    #[test]
    fn reads_all_variables() {
        let config = from_pairs(&[
            (ENV_ADDR, "0.0.0.0:8080"),
            (ENV_API_BASE, "http://localhost:9000"),
            (ENV_HTTP_TIMEOUT_SECS, "5"),
            (ENV_DIRECTORY_TIMEOUT_SECS, "7"),
            (ENV_POSITION_TIMEOUT_SECS, "3"),
            (ENV_SESSION_IDLE_SECS, "3600"),
            (ENV_MAX_RESULTS, "25"),
        ])
        .unwrap();

        assert_eq!(config.addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(config.api_base, "http://localhost:9000");
        assert_eq!(config.http_timeout_secs, 5);
        assert_eq!(config.directory_timeout, Duration::from_secs(7));
        assert_eq!(config.position_timeout, Duration::from_secs(3));
        assert_eq!(config.session_idle, Some(Duration::from_secs(3600)));
        assert_eq!(config.max_results, Some(25));
    }

    #[test]
    fn invalid_value_is_error() {
        let err = from_pairs(&[(ENV_MAX_RESULTS, "lots")]).unwrap_err();
        assert_eq!(err.var, ENV_MAX_RESULTS);
        assert_eq!(err.to_string(), "invalid value for STOP_FINDER_MAX_RESULTS: \"lots\"");

        assert!(from_pairs(&[(ENV_ADDR, "not an address")]).is_err());
    }

    #[test]
    fn blank_value_uses_default() {
        let config = from_pairs(&[(ENV_HTTP_TIMEOUT_SECS, "  "), (ENV_API_BASE, "")]).unwrap();
        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(config.api_base, DEFAULT_BASE_URL);
    }

    #[test]
    fn derived_component_configs() {
        let config = from_pairs(&[
            (ENV_API_BASE, "http://localhost:9000"),
            (ENV_MAX_RESULTS, "10"),
            (ENV_SESSION_IDLE_SECS, "60"),
        ])
        .unwrap();

        assert_eq!(config.directory_client().base_url, "http://localhost:9000");
        assert_eq!(config.eta_client().base_url, "http://localhost:9000");
        assert_eq!(config.finder().max_results, Some(10));
        assert_eq!(config.session().idle_timeout, Some(Duration::from_secs(60)));
    }
}
