//! Application configuration
//!
//! Everything is read from `BANDBOOKER_*` environment variables with
//! sensible defaults; unparseable values fall back to the default rather
//! than failing startup.

use std::time::Duration;

/// Runtime configuration for the app and demo binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Tracing filter directive (`BANDBOOKER_LOG`)
    pub log_filter: String,
    /// Graceful shutdown timeout (`BANDBOOKER_SHUTDOWN_TIMEOUT_SECS`)
    pub shutdown_timeout: Duration,
    /// Toast broadcast channel capacity (`BANDBOOKER_TOAST_CAPACITY`)
    pub toast_capacity: usize,
    /// Simulated network latency for the in-memory box office
    /// (`BANDBOOKER_SIMULATED_LATENCY_MS`)
    pub simulated_latency: Duration,
}

impl Config {
    /// Load configuration from the environment
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_filter: std::env::var("BANDBOOKER_LOG").unwrap_or(defaults.log_filter),
            shutdown_timeout: env_parse("BANDBOOKER_SHUTDOWN_TIMEOUT_SECS")
                .map_or(defaults.shutdown_timeout, Duration::from_secs),
            toast_capacity: env_parse("BANDBOOKER_TOAST_CAPACITY")
                .unwrap_or(defaults.toast_capacity),
            simulated_latency: env_parse("BANDBOOKER_SIMULATED_LATENCY_MS")
                .map_or(defaults.simulated_latency, Duration::from_millis),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            shutdown_timeout: Duration::from_secs(5),
            toast_capacity: 32,
            simulated_latency: Duration::from_millis(150),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.shutdown_timeout, Duration::from_secs(5));
        assert_eq!(config.toast_capacity, 32);
        assert_eq!(config.simulated_latency, Duration::from_millis(150));
    }
}
