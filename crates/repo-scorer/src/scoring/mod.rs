//! Weighted, rule-based repository scoring.
//!
//! A [`ScoringService`] resolves a versioned [`ScoringStrategy`] from the
//! [`StrategyRegistry`]; the strategy fans its rules out over the shared
//! [`ScoringPool`] through a [`CompositeScoringRule`], waits for every
//! outcome, and sums the successful ones with their weights.

pub mod composite;
pub mod numeric;
pub mod pool;
pub mod registry;
pub mod rules;
pub mod service;
pub mod snapshot;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use composite::{CompositeScoringRule, COMPOSITE_RULE};
pub use numeric::{decay_from_half_life, normalized_log, KernelError, MathContext, MATH_CONTEXT};
pub use pool::ScoringPool;
pub use registry::{StrategyRegistry, StrategyVersion};
pub use rules::{
    ForksScoringRule, FreshnessScoringRule, RuleError, ScoringRule, StarsScoringRule, FORKS_RULE,
    FRESHNESS_RULE, STARS_RULE,
};
pub use service::{round_score, ScoringService, SCORE_DECIMAL_PLACES};
pub use snapshot::{MetricSnapshot, RuleOutcome};
pub use strategy::{weighted_sum, ScoringStrategy, WeightError, WeightedRuleStrategy};

/// Configuration errors raised while building the scoring engine.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("invalid rule weights for strategy {version}: {source}")]
    InvalidWeights {
        version: String,
        #[source]
        source: WeightError,
    },
    #[error("no scoring strategy registered for default version '{version}'")]
    UnknownDefaultStrategy { version: String },
    #[error("more than one scoring strategy registered for version '{version}'")]
    DuplicateStrategy { version: String },
    #[error("failed to build scoring pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
