//! Application configuration loaded from environment variables.

use domain::TransitionPolicy;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `50054`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `text` or `json` (default: `text`)
/// - `DATABASE_URL` or `DB_CONN_STRING`: PostgreSQL connection string; the
///   in-memory store is used when neither is set
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: `10`)
/// - `USER_SERVICE_URL` or `USER_SERVICE_ADDR`: base URL of the user
///   service; an empty in-memory directory is used when neither is set
/// - `USER_SERVICE_TIMEOUT_MS`: user lookup timeout (default: `5000`)
/// - `ORDER_STATUS_POLICY`: `unrestricted` or `lifecycle` (default:
///   `unrestricted`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub user_service_url: Option<String>,
    pub user_service_timeout_ms: u64,
    pub status_policy: TransitionPolicy,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset. Unparseable values fall back to the
    /// default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: get("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: get("LOG_FORMAT")
                .and_then(|f| LogFormat::parse(&f))
                .unwrap_or(defaults.log_format),
            database_url: get("DATABASE_URL").or_else(|| get("DB_CONN_STRING")),
            database_max_connections: get("DATABASE_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.database_max_connections),
            user_service_url: get("USER_SERVICE_URL")
                .or_else(|| get("USER_SERVICE_ADDR"))
                .map(|url| with_scheme(&url)),
            user_service_timeout_ms: get("USER_SERVICE_TIMEOUT_MS")
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.user_service_timeout_ms),
            status_policy: get("ORDER_STATUS_POLICY")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.status_policy),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 50054,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            database_url: None,
            database_max_connections: 10,
            user_service_url: None,
            user_service_timeout_ms: 5000,
            status_policy: TransitionPolicy::Unrestricted,
        }
    }
}

/// `USER_SERVICE_ADDR` is usually a bare `host:port`.
fn with_scheme(addr: &str) -> String {
    let addr = addr.trim();
    if addr.starts_with("http://") || addr.starts_with("https://") {
        addr.to_string()
    } else {
        format!("http://{addr}")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 50054);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.database_url.is_none());
        assert_eq!(config.database_max_connections, 10);
        assert!(config.user_service_url.is_none());
        assert_eq!(config.user_service_timeout_ms, 5000);
        assert_eq!(config.status_policy, TransitionPolicy::Unrestricted);
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.addr(), "0.0.0.0:50054");
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_reads_every_variable() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("RUST_LOG", "debug"),
            ("LOG_FORMAT", "JSON"),
            ("DATABASE_URL", "postgres://orders@db/orders"),
            ("DATABASE_MAX_CONNECTIONS", "25"),
            ("USER_SERVICE_URL", "https://users.internal"),
            ("USER_SERVICE_TIMEOUT_MS", "750"),
            ("ORDER_STATUS_POLICY", "lifecycle"),
        ]);

        assert_eq!(config.addr(), "127.0.0.1:9000");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://orders@db/orders")
        );
        assert_eq!(config.database_max_connections, 25);
        assert_eq!(
            config.user_service_url.as_deref(),
            Some("https://users.internal")
        );
        assert_eq!(config.user_service_timeout_ms, 750);
        assert_eq!(config.status_policy, TransitionPolicy::Lifecycle);
    }

    #[test]
    fn test_legacy_variable_names() {
        let config = config_from(&[
            ("DB_CONN_STRING", "postgres://legacy/orders"),
            ("USER_SERVICE_ADDR", "user-service:50053"),
        ]);

        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://legacy/orders")
        );
        assert_eq!(
            config.user_service_url.as_deref(),
            Some("http://user-service:50053")
        );
    }

    #[test]
    fn test_database_url_wins_over_legacy_name() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://new/orders"),
            ("DB_CONN_STRING", "postgres://legacy/orders"),
        ]);
        assert_eq!(config.database_url.as_deref(), Some("postgres://new/orders"));
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = config_from(&[
            ("PORT", "not-a-port"),
            ("LOG_FORMAT", "xml"),
            ("DATABASE_MAX_CONNECTIONS", "0"),
            ("ORDER_STATUS_POLICY", "strict"),
            ("DATABASE_URL", "   "),
        ]);

        assert_eq!(config.port, 50054);
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.status_policy, TransitionPolicy::Unrestricted);
        assert!(config.database_url.is_none());
    }
}
