use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::config::{CapRuleConfig, FreshnessRuleConfig, RulesConfig};
use crate::scoring::rules::{RuleError, ScoringRule};
use crate::scoring::{MetricSnapshot, ScoringPool, WeightedRuleStrategy};

pub(super) fn dec(raw: &str) -> Decimal {
    Decimal::from_str(raw).expect("valid decimal literal")
}

pub(super) fn pool() -> ScoringPool {
    ScoringPool::new(Some(4)).expect("pool builds")
}

pub(super) fn rules_config(stars: &str, forks: &str, freshness: &str) -> RulesConfig {
    RulesConfig {
        stars: CapRuleConfig {
            cap: 10_000,
            weight: dec(stars),
        },
        forks: CapRuleConfig {
            cap: 10_000,
            weight: dec(forks),
        },
        freshness: FreshnessRuleConfig {
            half_life_days: 90,
            weight: dec(freshness),
        },
    }
}

pub(super) fn v1_strategy() -> WeightedRuleStrategy {
    WeightedRuleStrategy::v1(&rules_config("0.45", "0.2", "0.35"), pool()).expect("weights valid")
}

pub(super) fn snapshot(stars: i64, forks: i64, days: i64) -> MetricSnapshot {
    MetricSnapshot::new(stars, forks, days)
}

/// Fixed-score rule for exercising aggregation without the kernel.
pub(super) struct FixedRule {
    pub name: &'static str,
    pub weight: Decimal,
    pub score: Decimal,
}

impl ScoringRule for FixedRule {
    fn name(&self) -> &str {
        self.name
    }

    fn weight(&self) -> Decimal {
        self.weight
    }

    fn describe(&self) -> String {
        format!("score={}", self.score)
    }

    fn measure(&self, _snapshot: &MetricSnapshot) -> Result<Decimal, RuleError> {
        Ok(self.score)
    }
}

/// Rule that always reports an invalid metric.
pub(super) struct FailingRule {
    pub weight: Decimal,
}

impl ScoringRule for FailingRule {
    fn name(&self) -> &str {
        "FailingRule"
    }

    fn weight(&self) -> Decimal {
        self.weight
    }

    fn describe(&self) -> String {
        "always fails".to_string()
    }

    fn measure(&self, _snapshot: &MetricSnapshot) -> Result<Decimal, RuleError> {
        Err(RuleError::NegativeMetric {
            metric: "synthetic",
            value: -1,
        })
    }
}

/// Rule that panics mid-evaluation, counting how often it ran.
#[derive(Default)]
pub(super) struct PanickingRule {
    pub weight: Decimal,
    pub calls: AtomicUsize,
}

impl ScoringRule for PanickingRule {
    fn name(&self) -> &str {
        "PanickingRule"
    }

    fn weight(&self) -> Decimal {
        self.weight
    }

    fn describe(&self) -> String {
        "always panics".to_string()
    }

    fn measure(&self, _snapshot: &MetricSnapshot) -> Result<Decimal, RuleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        panic!("rule exploded");
    }
}

pub(super) fn fixed(name: &'static str, weight: &str, score: &str) -> Arc<dyn ScoringRule> {
    Arc::new(FixedRule {
        name,
        weight: dec(weight),
        score: dec(score),
    })
}
