use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::models::{ScoringWeights, SelfMatchPolicy};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringBackendKind {
    #[default]
    Weighted,
    Remote,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub backend: ScoringBackendKind,
    pub endpoint: Option<String>,
    #[serde(default = "default_scoring_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub weights: WeightsConfig,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            backend: ScoringBackendKind::default(),
            endpoint: None,
            timeout_secs: default_scoring_timeout(),
            weights: WeightsConfig::default(),
        }
    }
}

fn default_scoring_timeout() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_zodiac_weight")]
    pub zodiac: f64,
    #[serde(default = "default_sex_weight")]
    pub sex: f64,
    #[serde(default = "default_orientation_weight")]
    pub orientation: f64,
    #[serde(default = "default_degree_weight")]
    pub degree: f64,
    #[serde(default = "default_sociability_weight")]
    pub sociability: f64,
    #[serde(default = "default_acquaintance_weight")]
    pub acquaintance: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            zodiac: default_zodiac_weight(),
            sex: default_sex_weight(),
            orientation: default_orientation_weight(),
            degree: default_degree_weight(),
            sociability: default_sociability_weight(),
            acquaintance: default_acquaintance_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(w: &WeightsConfig) -> Self {
        Self {
            zodiac: w.zodiac,
            sex: w.sex,
            orientation: w.orientation,
            degree: w.degree,
            sociability: w.sociability,
            acquaintance: w.acquaintance,
        }
    }
}

fn default_zodiac_weight() -> f64 { 0.15 }
fn default_sex_weight() -> f64 { 0.10 }
fn default_orientation_weight() -> f64 { 0.15 }
fn default_degree_weight() -> f64 { 0.25 }
fn default_sociability_weight() -> f64 { 0.25 }
fn default_acquaintance_weight() -> f64 { 0.10 }

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_session_entries")]
    pub max_entries: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_session_ttl(),
            max_entries: default_session_entries(),
        }
    }
}

fn default_session_ttl() -> u64 { 3600 }
fn default_session_entries() -> u64 { 10_000 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    #[serde(default)]
    pub self_match: SelfMatchPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl LoggingSettings {
    pub fn is_pretty(&self) -> bool {
        self.format.eq_ignore_ascii_case("pretty")
    }
}

// e.g., ZODIAC__SERVER__PORT -> server.port
fn environment() -> Environment {
    Environment::with_prefix("ZODIAC")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ZODIAC__)
    /// 5. DATABASE_URL, if set
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(environment(), std::env::var("DATABASE_URL").ok())
    }

    fn load_with(env: Environment, database_url: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(env);

        if let Some(url) = database_url {
            builder = builder.set_override("database.url", url)?;
        }

        builder.build()?.try_deserialize()
    }
}
