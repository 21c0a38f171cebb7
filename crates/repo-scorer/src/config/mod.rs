use std::env;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Engine and CLI at info, everything else (rayon, dependencies) at warn.
pub const DEFAULT_LOG_FILTER: &str = "warn,repo_scorer=info,repo_scorer_cli=info";

/// Top-level configuration for the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub strategy: StrategyConfig,
    pub rules: RulesConfig,
    /// Worker threads for the shared pool; `None` uses every available core.
    pub workers: Option<usize>,
    pub telemetry: TelemetryConfig,
}

impl ScoringConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let version = env::var("SCORING_STRATEGY_VERSION").unwrap_or_else(|_| "v1".to_string());

        let stars = CapRuleConfig {
            cap: parse_var("SCORING_STARS_CAP", 10_000)?,
            weight: parse_var("SCORING_STARS_WEIGHT", Decimal::new(45, 2))?,
        };
        let forks = CapRuleConfig {
            cap: parse_var("SCORING_FORKS_CAP", 10_000)?,
            weight: parse_var("SCORING_FORKS_WEIGHT", Decimal::new(2, 1))?,
        };
        let freshness = FreshnessRuleConfig {
            half_life_days: parse_var("SCORING_FRESHNESS_HALF_LIFE_DAYS", 90)?,
            weight: parse_var("SCORING_FRESHNESS_WEIGHT", Decimal::new(35, 2))?,
        };

        let workers = match env::var("SCORING_WORKERS") {
            Ok(raw) => Some(parse_value("SCORING_WORKERS", &raw)?),
            Err(_) => None,
        };

        let log_level =
            env::var("APP_LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            strategy: StrategyConfig { version },
            rules: RulesConfig {
                stars,
                forks,
                freshness,
            },
            workers,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyConfig {
                version: "v1".to_string(),
            },
            rules: RulesConfig::default(),
            workers: None,
            telemetry: TelemetryConfig {
                log_level: DEFAULT_LOG_FILTER.to_string(),
            },
        }
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

/// Default strategy selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub version: String,
}

/// Per-rule weights and parameters for the built-in rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    pub stars: CapRuleConfig,
    pub forks: CapRuleConfig,
    pub freshness: FreshnessRuleConfig,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            stars: CapRuleConfig {
                cap: 10_000,
                weight: Decimal::new(45, 2),
            },
            forks: CapRuleConfig {
                cap: 10_000,
                weight: Decimal::new(2, 1),
            },
            freshness: FreshnessRuleConfig {
                half_life_days: 90,
                weight: Decimal::new(35, 2),
            },
        }
    }
}

/// Log-normalised count rule: the count that maps to a score of one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapRuleConfig {
    pub cap: i64,
    pub weight: Decimal,
}

/// Exponential decay rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessRuleConfig {
    pub half_life_days: i64,
    pub weight: Decimal,
}

/// Tracing controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { key, value } => {
                write!(f, "{key} has an invalid value '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
