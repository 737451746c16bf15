//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;

/// Default cap on concurrently running sessions
const DEFAULT_MAX_SESSIONS: usize = 256;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Allowed client origins for CORS (comma-separated, `*` for any)
    pub client_origin: String,

    /// Fixed base seed; session n is seeded with `seed + n`. Random when unset.
    pub sim_seed: Option<u64>,
    /// Maximum number of concurrently running sessions
    pub max_sessions: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Hosting platforms provide PORT, fall back to SERVER_ADDR or default
        let server_addr = match lookup("PORT") {
            Some(port) => format!("0.0.0.0:{}", port),
            None => lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
        };

        let sim_seed = lookup("SIM_SEED")
            .map(|raw| raw.trim().parse::<u64>())
            .transpose()
            .map_err(|_| ConfigError::Invalid("SIM_SEED"))?;

        let max_sessions = match lookup("MAX_SESSIONS") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::Invalid("MAX_SESSIONS")),
            },
            None => DEFAULT_MAX_SESSIONS,
        };

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,

            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),

            client_origin: lookup("CLIENT_ORIGIN").unwrap_or_else(|| "*".to_string()),

            sim_seed,
            max_sessions,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid server address format")]
    InvalidAddress,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_addr.port(), 8080);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.client_origin, "*");
        assert_eq!(config.sim_seed, None);
        assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
    }

    #[test]
    fn test_port_overrides_server_addr() {
        let config = config_from(&[("PORT", "9000"), ("SERVER_ADDR", "127.0.0.1:1234")]).unwrap();
        assert_eq!(config.server_addr.port(), 9000);
    }

    #[test]
    fn test_seed_and_session_cap() {
        let config = config_from(&[("SIM_SEED", "77"), ("MAX_SESSIONS", "4")]).unwrap();
        assert_eq!(config.sim_seed, Some(77));
        assert_eq!(config.max_sessions, 4);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(matches!(
            config_from(&[("SIM_SEED", "abc")]),
            Err(ConfigError::Invalid("SIM_SEED"))
        ));
        assert!(matches!(
            config_from(&[("MAX_SESSIONS", "0")]),
            Err(ConfigError::Invalid("MAX_SESSIONS"))
        ));
        assert!(matches!(
            config_from(&[("SERVER_ADDR", "not an address")]),
            Err(ConfigError::InvalidAddress)
        ));
    }
}
