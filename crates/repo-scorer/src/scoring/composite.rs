use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, error};

use super::pool::ScoringPool;
use super::rules::ScoringRule;
use super::snapshot::{MetricSnapshot, RuleOutcome};

pub const COMPOSITE_RULE: &str = "CompositeScoringRule";

/// Fans a fixed rule set out over the shared pool and waits for all of it.
///
/// Every rule ends up with exactly one outcome on the snapshot, even when
/// the rule panics. The composite never contributes weight of its own.
pub struct CompositeScoringRule {
    rules: Vec<Arc<dyn ScoringRule>>,
    pool: ScoringPool,
}

impl CompositeScoringRule {
    pub fn new(rules: Vec<Arc<dyn ScoringRule>>, pool: ScoringPool) -> Self {
        Self { rules, pool }
    }

    pub fn name(&self) -> &str {
        COMPOSITE_RULE
    }

    pub fn weight(&self) -> Decimal {
        Decimal::ZERO
    }

    pub fn rules(&self) -> &[Arc<dyn ScoringRule>] {
        &self.rules
    }

    /// Evaluate every rule and block until all of them have finished.
    pub fn evaluate(&self, snapshot: &MetricSnapshot) {
        debug!(rules = self.rules.len(), "fanning out scoring rules");

        let fan_out = catch_unwind(AssertUnwindSafe(|| {
            self.pool.thread_pool().scope(|scope| {
                for rule in &self.rules {
                    scope.spawn(move |_| run_isolated(rule.as_ref(), snapshot));
                }
            });
        }));

        // Reached when a panic escapes run_isolated itself, e.g. a rule whose
        // name() panics while its failure is being recorded. The scope still
        // joins every sibling task before rethrowing.
        if let Err(payload) = fan_out {
            let message = panic_message(payload.as_ref());
            error!(rule = COMPOSITE_RULE, error = %message, "rule fan-out failed");
            snapshot.record(RuleOutcome::failure(COMPOSITE_RULE, message));
        }
    }
}

fn run_isolated(rule: &dyn ScoringRule, snapshot: &MetricSnapshot) {
    let result = catch_unwind(AssertUnwindSafe(|| rule.evaluate(snapshot)));

    if let Err(payload) = result {
        let message = panic_message(payload.as_ref());
        error!(rule = rule.name(), error = %message, "scoring rule panicked");
        snapshot.record(RuleOutcome::failure(
            rule.name(),
            format!("panic: {message}"),
        ));
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
