//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Profitability scoring configuration.
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration as read from config sources.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    3600 // 1 hour
}

/// Hourly cost rates used by the profitability scorer.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Advisor hourly cost.
    #[serde(default = "default_advisor_rate")]
    pub advisor_hourly_rate: Decimal,
    /// Operations staff hourly cost.
    #[serde(default = "default_operations_rate")]
    pub operations_hourly_rate: Decimal,
    /// Compliance staff hourly cost.
    #[serde(default = "default_compliance_rate")]
    pub compliance_hourly_rate: Decimal,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            advisor_hourly_rate: default_advisor_rate(),
            operations_hourly_rate: default_operations_rate(),
            compliance_hourly_rate: default_compliance_rate(),
        }
    }
}

fn default_advisor_rate() -> Decimal {
    Decimal::from(250)
}

fn default_operations_rate() -> Decimal {
    Decimal::from(75)
}

fn default_compliance_rate() -> Decimal {
    Decimal::from(125)
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `HEARTH__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("HEARTH").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_scoring_defaults() {
        let scoring = ScoringConfig::default();
        assert_eq!(scoring.advisor_hourly_rate, dec!(250));
        assert_eq!(scoring.operations_hourly_rate, dec!(75));
        assert_eq!(scoring.compliance_hourly_rate, dec!(125));
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("HEARTH__DATABASE__URL", Some("postgres://localhost/hearth_test")),
                ("HEARTH__JWT__SECRET", Some("test-secret")),
                ("HEARTH__SERVER__PORT", Some("9090")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/hearth_test");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.jwt.secret, "test-secret");
                assert_eq!(config.jwt.access_token_expiry_secs, 3600);
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.scoring.advisor_hourly_rate, dec!(250));
            },
        );
    }

    #[test]
    fn test_load_fails_without_database_url() {
        temp_env::with_vars(
            [
                ("HEARTH__DATABASE__URL", None::<&str>),
                ("HEARTH__JWT__SECRET", Some("test-secret")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
