use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::error;

use super::composite::panic_message;
use super::pool::ScoringPool;
use super::registry::{StrategyRegistry, StrategyVersion};
use super::snapshot::MetricSnapshot;
use super::ScoringError;
use crate::config::ScoringConfig;

/// Decimal places of a caller-facing score.
pub const SCORE_DECIMAL_PLACES: u32 = 2;

/// Caller-facing facade: resolves a strategy, scores, and rounds once.
#[derive(Clone)]
pub struct ScoringService {
    registry: Arc<StrategyRegistry>,
}

impl ScoringService {
    pub fn new(registry: Arc<StrategyRegistry>) -> Self {
        Self { registry }
    }

    /// Build the pool and every strategy from configuration. Any invalid
    /// weight or unknown default version is returned here, before the
    /// service can score anything.
    pub fn from_config(config: &ScoringConfig) -> Result<Self, ScoringError> {
        let pool = ScoringPool::new(config.workers)?;
        let registry = StrategyRegistry::from_config(config, pool)?;
        Ok(Self::new(Arc::new(registry)))
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn default_version(&self) -> &StrategyVersion {
        self.registry.default_version()
    }

    /// Score with the default strategy, rounded to two decimal places.
    pub fn calculate_score(&self, snapshot: &MetricSnapshot) -> Decimal {
        self.calculate_score_with(snapshot, None)
    }

    /// Score with `version` when registered, falling back to the default.
    /// Never fails: an unexpected panic yields zero.
    pub fn calculate_score_with(
        &self,
        snapshot: &MetricSnapshot,
        version: Option<&str>,
    ) -> Decimal {
        let result = catch_unwind(AssertUnwindSafe(|| {
            self.registry
                .create_strategy(version)
                .calculate_score(snapshot)
        }));

        match result {
            Ok(score) => round_score(score),
            Err(payload) => {
                error!(
                    repository = snapshot.name().unwrap_or("<unnamed>"),
                    error = %panic_message(payload.as_ref()),
                    "score calculation failed"
                );
                Decimal::ZERO
            }
        }
    }
}

/// Round half-up to [`SCORE_DECIMAL_PLACES`].
pub fn round_score(score: Decimal) -> Decimal {
    score.round_dp_with_strategy(SCORE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}
