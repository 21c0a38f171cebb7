use rust_decimal::Decimal;
use tracing::warn;

use super::numeric::{decay_from_half_life, normalized_log, KernelError};
use super::snapshot::{MetricSnapshot, RuleOutcome};
use crate::config::{CapRuleConfig, FreshnessRuleConfig};

pub const STARS_RULE: &str = "StarsScoringRule";
pub const FORKS_RULE: &str = "ForksScoringRule";
pub const FRESHNESS_RULE: &str = "FreshnessScoringRule";

/// Reason a rule could not produce a score for a snapshot.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleError {
    #[error("{metric} must be non-negative, got {value}")]
    NegativeMetric { metric: &'static str, value: i64 },
    #[error(transparent)]
    Kernel(#[from] KernelError),
}

/// A named, weighted scoring capability evaluated against one snapshot.
///
/// Implementations only provide [`ScoringRule::measure`]; the provided
/// [`ScoringRule::evaluate`] turns any error into a failed outcome and
/// records the outcome on the snapshot.
pub trait ScoringRule: Send + Sync {
    fn name(&self) -> &str;

    fn weight(&self) -> Decimal;

    /// Rule-specific parameters, used by the evaluation report.
    fn describe(&self) -> String;

    fn measure(&self, snapshot: &MetricSnapshot) -> Result<Decimal, RuleError>;

    fn evaluate(&self, snapshot: &MetricSnapshot) -> RuleOutcome {
        let outcome = match self.measure(snapshot) {
            Ok(score) => RuleOutcome::success(self.name(), score, self.weight()),
            Err(err) => {
                warn!(rule = self.name(), error = %err, "scoring rule failed");
                RuleOutcome::failure(self.name(), err.to_string())
            }
        };
        snapshot.record(outcome.clone());
        outcome
    }
}

fn non_negative(metric: &'static str, value: i64) -> Result<i64, RuleError> {
    if value < 0 {
        return Err(RuleError::NegativeMetric { metric, value });
    }
    Ok(value)
}

/// Popularity: log-normalised star count.
#[derive(Debug, Clone)]
pub struct StarsScoringRule {
    config: CapRuleConfig,
}

impl StarsScoringRule {
    pub fn new(config: CapRuleConfig) -> Self {
        Self { config }
    }
}

impl ScoringRule for StarsScoringRule {
    fn name(&self) -> &str {
        STARS_RULE
    }

    fn weight(&self) -> Decimal {
        self.config.weight
    }

    fn describe(&self) -> String {
        format!("cap={}, weight={}", self.config.cap, self.config.weight)
    }

    fn measure(&self, snapshot: &MetricSnapshot) -> Result<Decimal, RuleError> {
        let stars = non_negative("stars", snapshot.stars())?;
        Ok(normalized_log(stars, self.config.cap)?)
    }
}

/// Collaboration: log-normalised fork count.
#[derive(Debug, Clone)]
pub struct ForksScoringRule {
    config: CapRuleConfig,
}

impl ForksScoringRule {
    pub fn new(config: CapRuleConfig) -> Self {
        Self { config }
    }
}

impl ScoringRule for ForksScoringRule {
    fn name(&self) -> &str {
        FORKS_RULE
    }

    fn weight(&self) -> Decimal {
        self.config.weight
    }

    fn describe(&self) -> String {
        format!("cap={}, weight={}", self.config.cap, self.config.weight)
    }

    fn measure(&self, snapshot: &MetricSnapshot) -> Result<Decimal, RuleError> {
        let forks = non_negative("forks", snapshot.forks())?;
        Ok(normalized_log(forks, self.config.cap)?)
    }
}

/// Recency: exponential decay over days since the last update. Future-dated
/// updates count as maximally fresh.
#[derive(Debug, Clone)]
pub struct FreshnessScoringRule {
    config: FreshnessRuleConfig,
}

impl FreshnessScoringRule {
    pub fn new(config: FreshnessRuleConfig) -> Self {
        Self { config }
    }
}

impl ScoringRule for FreshnessScoringRule {
    fn name(&self) -> &str {
        FRESHNESS_RULE
    }

    fn weight(&self) -> Decimal {
        self.config.weight
    }

    fn describe(&self) -> String {
        format!(
            "half_life_days={}, weight={}",
            self.config.half_life_days, self.config.weight
        )
    }

    fn measure(&self, snapshot: &MetricSnapshot) -> Result<Decimal, RuleError> {
        Ok(decay_from_half_life(
            snapshot.days_since_update().max(0),
            self.config.half_life_days,
        )?)
    }
}
