use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of evaluating one rule against one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule_name: String,
    pub raw_score: Decimal,
    pub weight: Decimal,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RuleOutcome {
    pub fn success(rule_name: impl Into<String>, raw_score: Decimal, weight: Decimal) -> Self {
        Self {
            rule_name: rule_name.into(),
            raw_score,
            weight,
            success: true,
            error: None,
        }
    }

    /// Failed outcomes carry zero score and zero weight.
    pub fn failure(rule_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            rule_name: rule_name.into(),
            raw_score: Decimal::ZERO,
            weight: Decimal::ZERO,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Raw repository metrics for a single scoring call, plus the outcomes the
/// rules record while evaluating it.
///
/// Metric fields are signed so that invalid collaborator input reaches the
/// rules and is reported there as a failed outcome.
#[derive(Debug, Default)]
pub struct MetricSnapshot {
    name: Option<String>,
    stars: i64,
    forks: i64,
    days_since_update: i64,
    outcomes: DashMap<String, RuleOutcome>,
}

impl MetricSnapshot {
    pub fn new(stars: i64, forks: i64, days_since_update: i64) -> Self {
        Self {
            name: None,
            stars,
            forks,
            days_since_update,
            outcomes: DashMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whole days elapsed between `last_update` and `now`; a missing
    /// timestamp counts as updated today.
    pub fn days_since(last_update: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
        last_update
            .map(|updated| now.signed_duration_since(updated).num_days())
            .unwrap_or(0)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn stars(&self) -> i64 {
        self.stars
    }

    pub fn forks(&self) -> i64 {
        self.forks
    }

    /// Day count as supplied. Rules clamp negatives to zero before use.
    pub fn days_since_update(&self) -> i64 {
        self.days_since_update
    }

    /// Record an outcome under its rule name, replacing any previous one.
    pub fn record(&self, outcome: RuleOutcome) {
        self.outcomes.insert(outcome.rule_name.clone(), outcome);
    }

    pub fn outcome(&self, rule_name: &str) -> Option<RuleOutcome> {
        self.outcomes.get(rule_name).map(|entry| entry.value().clone())
    }

    /// Recorded outcomes ordered by rule name.
    pub fn outcomes(&self) -> Vec<RuleOutcome> {
        let mut outcomes: Vec<RuleOutcome> = self
            .outcomes
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        outcomes.sort_by(|a, b| a.rule_name.cmp(&b.rule_name));
        outcomes
    }
}
