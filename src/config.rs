//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::server::ConnectionSettings;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP port for the wire protocol listener
    pub resp_port: u16,
    /// HTTP port for the codec facade
    pub http_port: u16,
    /// Whether the HTTP facade is started at all
    pub http_enabled: bool,
    /// Maximum number of entries the cache can hold
    pub cache_capacity: usize,
    /// Maximum number of connections served concurrently
    pub max_connections: usize,
    /// Read deadline per connection in milliseconds
    pub read_timeout_ms: u64,
    /// Write deadline per connection in milliseconds
    pub write_timeout_ms: u64,
    /// Size of the single read buffer per request
    pub read_buffer_size: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `RESP_PORT` - Wire protocol port (default: 6380)
    /// - `HTTP_PORT` - HTTP facade port (default: 8080)
    /// - `HTTP_ENABLED` - Start the HTTP facade (default: true)
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `MAX_CONNECTIONS` - Concurrent connection limit (default: 1024)
    /// - `READ_TIMEOUT_MS` - Read deadline (default: 5000)
    /// - `WRITE_TIMEOUT_MS` - Write deadline (default: 5000)
    /// - `READ_BUFFER_SIZE` - Request buffer size in bytes (default: 1024)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            resp_port: env_or("RESP_PORT", defaults.resp_port),
            http_port: env_or("HTTP_PORT", defaults.http_port),
            http_enabled: env_or("HTTP_ENABLED", defaults.http_enabled),
            cache_capacity: env_or("CACHE_CAPACITY", defaults.cache_capacity),
            max_connections: env_or("MAX_CONNECTIONS", defaults.max_connections),
            read_timeout_ms: env_or("READ_TIMEOUT_MS", defaults.read_timeout_ms),
            write_timeout_ms: env_or("WRITE_TIMEOUT_MS", defaults.write_timeout_ms),
            read_buffer_size: env_or("READ_BUFFER_SIZE", defaults.read_buffer_size),
        }
    }

    /// Per-connection limits derived from this configuration.
    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            write_timeout: Duration::from_millis(self.write_timeout_ms),
            read_buffer_size: self.read_buffer_size.max(1),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resp_port: 6380,
            http_port: 8080,
            http_enabled: true,
            cache_capacity: 1000,
            max_connections: 1024,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            read_buffer_size: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.resp_port, 6380);
        assert_eq!(config.http_port, 8080);
        assert!(config.http_enabled);
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.max_connections, 1024);
        assert_eq!(config.read_buffer_size, 1024);
    }

    #[test]
    fn test_config_from_env_overrides_and_fallbacks() {
        env::set_var("CACHE_CAPACITY", "42");
        env::set_var("READ_TIMEOUT_MS", "not-a-number");
        env::remove_var("RESP_PORT");

        let config = Config::from_env();
        assert_eq!(config.cache_capacity, 42);
        assert_eq!(config.read_timeout_ms, 5000);
        assert_eq!(config.resp_port, 6380);

        env::remove_var("CACHE_CAPACITY");
        env::remove_var("READ_TIMEOUT_MS");
    }

    #[test]
    fn test_connection_settings() {
        let config = Config {
            read_timeout_ms: 250,
            write_timeout_ms: 750,
            read_buffer_size: 0,
            ..Config::default()
        };

        let settings = config.connection_settings();
        assert_eq!(settings.read_timeout, Duration::from_millis(250));
        assert_eq!(settings.write_timeout, Duration::from_millis(750));
        assert_eq!(settings.read_buffer_size, 1);
    }
}
