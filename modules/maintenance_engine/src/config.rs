//! Configuration for the maintenance engine module and its binary

use crate::domain::onboarding::ReadinessConfig;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Maintenance engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Run the preventive due scan in the background
    #[serde(default = "default_true")]
    pub scan_enabled: bool,

    /// Time between due scans
    #[serde(default = "default_scan_interval", with = "humantime_serde")]
    pub scan_interval: Duration,

    /// Maximum answers accepted in one inspection sync
    #[serde(default = "default_max_answers")]
    pub max_answers_per_report: usize,

    /// Step labels and role-group equivalences for the onboarding chain
    #[serde(default)]
    pub readiness: ReadinessConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan_enabled: true,
            scan_interval: default_scan_interval(),
            max_answers_per_report: default_max_answers(),
            readiness: ReadinessConfig::default(),
        }
    }
}

impl Config {
    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), String> {
        if self.scan_interval.is_zero() {
            return Err("scan_interval must be greater than zero".to_string());
        }
        self.readiness.validate()
    }
}

fn default_true() -> bool {
    true
}

fn default_scan_interval() -> Duration {
    Duration::from_secs(5 * 60)
}

fn default_max_answers() -> usize {
    500
}

/// Logging options for the binary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Process-level configuration: database, listener, logging and the module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub maintenance: Config,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            bind_addr: default_bind_addr(),
            log: LogConfig::default(),
            maintenance: Config::default(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://maintenance.db?mode=rwc".to_string()
}

fn default_bind_addr() -> String {
    "127.0.0.1:8087".to_string()
}

impl AppConfig {
    /// Merge order (later overrides earlier): compiled defaults, the YAML
    /// file if given, then `MAINTENANCE_*` variables (`__` separates levels)
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed("MAINTENANCE_").split("__"))
            .extract()
    }
}
