//! Service configuration types for Agora.
//!
//! `ServiceConfig` represents the `config.toml` in the data directory that
//! controls the HTTP bind address and storage timeouts.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Agora service.
///
/// Loaded from `~/.agora/config.toml`. All fields have sensible defaults;
/// `agora serve` flags override the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Bind host for the HTTP server.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port for the HTTP server.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on any single engagement-store operation, in milliseconds.
    /// Operations exceeding it surface as storage errors.
    #[serde(default = "default_op_timeout_ms")]
    pub op_timeout_ms: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_op_timeout_ms() -> u64 {
    5_000
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            op_timeout_ms: default_op_timeout_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_config_default_values() {
        let config = ServiceConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3001);
        assert_eq!(config.op_timeout_ms, 5_000);
    }

    #[test]
    fn test_service_config_deserialize_with_defaults() {
        let toml_str = "";
        let config: ServiceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.op_timeout_ms, 5_000);
    }

    #[test]
    fn test_service_config_deserialize_with_values() {
        let toml_str = r#"
host = "0.0.0.0"
port = 8080
op_timeout_ms = 1500
"#;
        let config: ServiceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.op_timeout_ms, 1_500);
    }

    #[test]
    fn test_service_config_partial_file_keeps_defaults() {
        let toml_str = "port = 9090";
        let config: ServiceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.op_timeout_ms, 5_000);
    }

    #[test]
    fn test_service_config_serde_roundtrip() {
        let config = ServiceConfig {
            host: "0.0.0.0".to_string(),
            port: 4000,
            op_timeout_ms: 2_000,
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ServiceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.host, "0.0.0.0");
        assert_eq!(parsed.port, 4000);
        assert_eq!(parsed.op_timeout_ms, 2_000);
    }
}
