use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, enabled, warn, Level};

use super::composite::CompositeScoringRule;
use super::numeric::MATH_CONTEXT;
use super::pool::ScoringPool;
use super::registry::StrategyVersion;
use super::rules::{ForksScoringRule, FreshnessScoringRule, ScoringRule, StarsScoringRule};
use super::snapshot::{MetricSnapshot, RuleOutcome};
use super::ScoringError;
use crate::config::RulesConfig;

/// A versioned way of turning a snapshot into an unrounded score.
pub trait ScoringStrategy: Send + Sync {
    fn version(&self) -> &StrategyVersion;

    /// Weighted sum of the successful rule outcomes. Never fails; rule
    /// failures only lower the score.
    fn calculate_score(&self, snapshot: &MetricSnapshot) -> Decimal;
}

/// Configuration problems found while validating rule weights.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightError {
    #[error("weights must sum to 1.0, but sum is: {sum}")]
    Sum { sum: Decimal },
    #[error("no individual weight can exceed 1.0 ({rule} has {weight})")]
    Excessive { rule: String, weight: Decimal },
    #[error("weights must not be negative ({rule} has {weight})")]
    Negative { rule: String, weight: Decimal },
}

pub(crate) fn validate_weights(rules: &[Arc<dyn ScoringRule>]) -> Result<(), WeightError> {
    let mut sum = Decimal::ZERO;
    for rule in rules {
        sum = sum.checked_add(rule.weight()).ok_or(WeightError::Sum { sum })?;
    }

    if sum != Decimal::ONE {
        return Err(WeightError::Sum { sum });
    }

    if let Some(rule) = rules.iter().find(|rule| rule.weight() > Decimal::ONE) {
        return Err(WeightError::Excessive {
            rule: rule.name().to_string(),
            weight: rule.weight(),
        });
    }

    if let Some(rule) = rules.iter().find(|rule| rule.weight() < Decimal::ZERO) {
        return Err(WeightError::Negative {
            rule: rule.name().to_string(),
            weight: rule.weight(),
        });
    }

    Ok(())
}

/// Strategy that runs a validated rule set through a composite rule and
/// sums the weighted outcomes.
pub struct WeightedRuleStrategy {
    version: StrategyVersion,
    composite: CompositeScoringRule,
}

impl WeightedRuleStrategy {
    /// Validate the rule weights and freeze the rule set. A strategy that
    /// fails here never becomes usable.
    pub fn initialize(
        version: StrategyVersion,
        rules: Vec<Arc<dyn ScoringRule>>,
        pool: ScoringPool,
    ) -> Result<Self, ScoringError> {
        validate_weights(&rules).map_err(|source| ScoringError::InvalidWeights {
            version: version.to_string(),
            source,
        })?;

        debug!(%version, rules = rules.len(), "scoring strategy initialized");

        Ok(Self {
            version,
            composite: CompositeScoringRule::new(rules, pool),
        })
    }

    /// The built-in `v1` rubric: stars, forks and freshness.
    pub fn v1(config: &RulesConfig, pool: ScoringPool) -> Result<Self, ScoringError> {
        let rules: Vec<Arc<dyn ScoringRule>> = vec![
            Arc::new(StarsScoringRule::new(config.stars.clone())),
            Arc::new(ForksScoringRule::new(config.forks.clone())),
            Arc::new(FreshnessScoringRule::new(config.freshness.clone())),
        ];
        Self::initialize(StrategyVersion::v1(), rules, pool)
    }

    fn report(&self, snapshot: &MetricSnapshot, outcomes: &[RuleOutcome], total: Decimal) {
        debug!(
            version = %self.version,
            repository = snapshot.name().unwrap_or("<unnamed>"),
            stars = snapshot.stars(),
            forks = snapshot.forks(),
            days_since_update = snapshot.days_since_update(),
            "rules evaluation report"
        );

        for rule in self.composite.rules() {
            debug!(rule = rule.name(), config = %rule.describe(), "rule configuration");
        }

        for outcome in outcomes {
            if outcome.success {
                debug!(
                    rule = %outcome.rule_name,
                    raw_score = %outcome.raw_score,
                    weight = %outcome.weight,
                    weighted = %outcome
                        .raw_score
                        .checked_mul(outcome.weight)
                        .unwrap_or_default(),
                    "rule succeeded"
                );
            } else {
                debug!(
                    rule = %outcome.rule_name,
                    error = outcome.error.as_deref().unwrap_or(""),
                    "rule failed"
                );
            }
        }

        debug!(total = %total, "total weighted score");
    }
}

impl ScoringStrategy for WeightedRuleStrategy {
    fn version(&self) -> &StrategyVersion {
        &self.version
    }

    fn calculate_score(&self, snapshot: &MetricSnapshot) -> Decimal {
        self.composite.evaluate(snapshot);

        let outcomes = snapshot.outcomes();
        let total = weighted_sum(&outcomes);

        if enabled!(Level::DEBUG) {
            self.report(snapshot, &outcomes, total);
        }

        total
    }
}

/// `Σ raw_score × weight` over successful outcomes, in the shared context.
/// Outcomes are expected in a stable order so the result is reproducible.
pub fn weighted_sum(outcomes: &[RuleOutcome]) -> Decimal {
    outcomes
        .iter()
        .filter(|outcome| outcome.success)
        .fold(Decimal::ZERO, |total, outcome| {
            let contribution = outcome
                .raw_score
                .checked_mul(outcome.weight)
                .and_then(|weighted| MATH_CONTEXT.add(total, weighted));

            match contribution {
                Some(next) => next,
                None => {
                    warn!(rule = %outcome.rule_name, "weighted contribution overflowed; skipped");
                    total
                }
            }
        })
}
