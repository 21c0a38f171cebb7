use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::pool::ScoringPool;
use super::strategy::{ScoringStrategy, WeightedRuleStrategy};
use super::ScoringError;
use crate::config::ScoringConfig;

/// Case-insensitive strategy version token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct StrategyVersion(String);

impl StrategyVersion {
    pub fn new(token: impl AsRef<str>) -> Self {
        Self(token.as_ref().trim().to_ascii_lowercase())
    }

    pub fn v1() -> Self {
        Self::new("v1")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StrategyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for StrategyVersion {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for StrategyVersion {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<StrategyVersion> for String {
    fn from(value: StrategyVersion) -> Self {
        value.0
    }
}

/// Built strategies keyed by version, with a default used whenever the
/// requested version is absent or unknown.
pub struct StrategyRegistry {
    default_version: StrategyVersion,
    default_strategy: Arc<dyn ScoringStrategy>,
    strategies: BTreeMap<StrategyVersion, Arc<dyn ScoringStrategy>>,
}

impl StrategyRegistry {
    /// Register the given strategies. Fails when two strategies share a
    /// version token or when `default_version` is not among them.
    pub fn new(
        default_version: StrategyVersion,
        strategies: Vec<Arc<dyn ScoringStrategy>>,
    ) -> Result<Self, ScoringError> {
        let mut registered = BTreeMap::new();
        for strategy in strategies {
            let version = strategy.version().clone();
            if registered.contains_key(&version) {
                return Err(ScoringError::DuplicateStrategy {
                    version: version.to_string(),
                });
            }
            registered.insert(version, strategy);
        }
        let strategies = registered;

        let default_strategy = strategies.get(&default_version).cloned().ok_or_else(|| {
            ScoringError::UnknownDefaultStrategy {
                version: default_version.to_string(),
            }
        })?;

        info!(
            default = %default_version,
            registered = strategies.len(),
            "scoring strategies registered"
        );

        Ok(Self {
            default_version,
            default_strategy,
            strategies,
        })
    }

    /// Initialize every built-in strategy from configuration.
    pub fn from_config(config: &ScoringConfig, pool: ScoringPool) -> Result<Self, ScoringError> {
        let v1: Arc<dyn ScoringStrategy> = Arc::new(WeightedRuleStrategy::v1(&config.rules, pool)?);
        Self::new(StrategyVersion::new(&config.strategy.version), vec![v1])
    }

    pub fn default_version(&self) -> &StrategyVersion {
        &self.default_version
    }

    pub fn versions(&self) -> Vec<StrategyVersion> {
        self.strategies.keys().cloned().collect()
    }

    /// Resolve `requested` if registered, otherwise the default.
    pub fn create_strategy(&self, requested: Option<&str>) -> Arc<dyn ScoringStrategy> {
        let requested = requested.map(StrategyVersion::new);

        if let Some(strategy) = requested
            .as_ref()
            .and_then(|version| self.strategies.get(version))
        {
            return Arc::clone(strategy);
        }

        if let Some(version) = &requested {
            debug!(
                requested = %version,
                default = %self.default_version,
                "unknown strategy version; using default"
            );
        }

        Arc::clone(&self.default_strategy)
    }
}
