use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::engine::{
    ScoringWeights, DEFAULT_AVERAGE_PRICE, DEFAULT_SEPARATOR, DEFAULT_TOP_K, DEFAULT_WEIGHTS,
    RECOMMENDATION_TTL_DAYS,
};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub recommendation: RecommendationConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

/// Tunables for the recommendation pipeline. Everything here has a sensible
/// default; callers and tests override through `LoadOptions` or a TOML file.
#[derive(Clone, Debug)]
pub struct RecommendationConfig {
    /// Assumed average spend (minor units) for customers with no history.
    pub default_average_price: i64,
    /// Days before a stored recommendation set goes stale.
    pub ttl_days: i64,
    /// Rows persisted per customer per computation run.
    pub top_k: usize,
    pub reasoning_separator: String,
    pub weights: ScoringWeights,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub ttl_days: Option<i64>,
    pub top_k: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://pomade.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            recommendation: RecommendationConfig::default(),
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            default_average_price: DEFAULT_AVERAGE_PRICE,
            ttl_days: RECOMMENDATION_TTL_DAYS,
            top_k: DEFAULT_TOP_K,
            reasoning_separator: DEFAULT_SEPARATOR.to_string(),
            weights: DEFAULT_WEIGHTS,
        }
    }
}

impl AppConfig {
    /// Defaults, then the optional TOML file, then environment variables,
    /// then explicit overrides; validated last.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("pomade.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(recommendation) = patch.recommendation {
            if let Some(price) = recommendation.default_average_price {
                self.recommendation.default_average_price = price;
            }
            if let Some(ttl_days) = recommendation.ttl_days {
                self.recommendation.ttl_days = ttl_days;
            }
            if let Some(top_k) = recommendation.top_k {
                self.recommendation.top_k = top_k;
            }
            if let Some(separator) = recommendation.reasoning_separator {
                self.recommendation.reasoning_separator = separator;
            }
            if let Some(weights) = recommendation.weights {
                self.recommendation.weights = weights;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("POMADE_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("POMADE_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_u32("POMADE_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("POMADE_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("POMADE_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("POMADE_DEFAULT_AVERAGE_PRICE") {
            self.recommendation.default_average_price =
                parse_i64("POMADE_DEFAULT_AVERAGE_PRICE", &value)?;
        }
        if let Some(value) = read_env("POMADE_RECOMMENDATION_TTL_DAYS") {
            self.recommendation.ttl_days = parse_i64("POMADE_RECOMMENDATION_TTL_DAYS", &value)?;
        }
        if let Some(value) = read_env("POMADE_RECOMMENDATION_TOP_K") {
            self.recommendation.top_k =
                parse_u32("POMADE_RECOMMENDATION_TOP_K", &value)? as usize;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(ttl_days) = overrides.ttl_days {
            self.recommendation.ttl_days = ttl_days;
        }
        if let Some(top_k) = overrides.top_k {
            self.recommendation.top_k = top_k;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        self.recommendation.validate()
    }
}

impl RecommendationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_average_price <= 0 {
            return Err(ConfigError::Validation(
                "recommendation.default_average_price must be positive".to_string(),
            ));
        }

        if !(1..=365).contains(&self.ttl_days) {
            return Err(ConfigError::Validation(
                "recommendation.ttl_days must be in range 1..=365".to_string(),
            ));
        }

        if !(1..=50).contains(&self.top_k) {
            return Err(ConfigError::Validation(
                "recommendation.top_k must be in range 1..=50".to_string(),
            ));
        }

        self.weights
            .validate()
            .map_err(|err| ConfigError::Validation(err.to_string()))
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("pomade.toml"), PathBuf::from("config/pomade.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_i64(key: &str, value: &str) -> Result<i64, ConfigError> {
    value.parse::<i64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    recommendation: Option<RecommendationPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RecommendationPatch {
    default_average_price: Option<i64>,
    ttl_days: Option<i64>,
    top_k: Option<usize>,
    reasoning_separator: Option<String>,
    weights: Option<ScoringWeights>,
}
