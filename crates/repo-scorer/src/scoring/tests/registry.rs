use std::sync::Arc;

use rust_decimal::Decimal;

use super::common::*;
use crate::config::ScoringConfig;
use crate::scoring::{
    MetricSnapshot, ScoringError, ScoringStrategy, StrategyRegistry, StrategyVersion,
};

/// Strategy returning a constant, to tell registry entries apart.
struct ConstantStrategy {
    version: StrategyVersion,
    score: Decimal,
}

impl ScoringStrategy for ConstantStrategy {
    fn version(&self) -> &StrategyVersion {
        &self.version
    }

    fn calculate_score(&self, _snapshot: &MetricSnapshot) -> Decimal {
        self.score
    }
}

fn constant(version: &str, score: &str) -> Arc<dyn ScoringStrategy> {
    Arc::new(ConstantStrategy {
        version: StrategyVersion::new(version),
        score: dec(score),
    })
}

fn registry() -> StrategyRegistry {
    StrategyRegistry::new(
        StrategyVersion::new("v1"),
        vec![constant("v1", "0.1"), constant("V2", "0.2")],
    )
    .expect("default registered")
}

#[test]
fn version_tokens_are_case_insensitive() {
    assert_eq!(StrategyVersion::new(" V1 "), StrategyVersion::v1());
    assert_eq!(StrategyVersion::from("v2").as_str(), "v2");
    assert_eq!(StrategyVersion::new("V2").to_string(), "v2");
}

#[test]
fn resolves_requested_version_ignoring_case() {
    let registry = registry();
    let snapshot = snapshot(0, 0, 0);

    assert_eq!(
        registry.create_strategy(Some("V2")).calculate_score(&snapshot),
        dec("0.2")
    );
    assert_eq!(
        registry.create_strategy(Some("v2")).version(),
        &StrategyVersion::new("v2")
    );
}

#[test]
fn falls_back_to_default_for_unknown_or_missing_version() {
    let registry = registry();
    let snapshot = snapshot(0, 0, 0);

    assert_eq!(
        registry.create_strategy(None).calculate_score(&snapshot),
        dec("0.1")
    );
    assert_eq!(
        registry.create_strategy(Some("v9")).calculate_score(&snapshot),
        dec("0.1")
    );
}

#[test]
fn unknown_default_fails_construction() {
    let result = StrategyRegistry::new(StrategyVersion::new("v3"), vec![constant("v1", "0.1")]);

    match result {
        Err(ScoringError::UnknownDefaultStrategy { version }) => assert_eq!(version, "v3"),
        Err(other) => panic!("expected unknown default, got {other:?}"),
        Ok(_) => panic!("registry built without its default"),
    }
}

#[test]
fn duplicate_versions_fail_construction() {
    let result = StrategyRegistry::new(
        StrategyVersion::v1(),
        vec![constant("v1", "0.1"), constant("V1", "0.9")],
    );

    match result {
        Err(ScoringError::DuplicateStrategy { version }) => assert_eq!(version, "v1"),
        Err(other) => panic!("expected duplicate strategy, got {other:?}"),
        Ok(_) => panic!("registry accepted two strategies for one version"),
    }
}

#[test]
fn lists_registered_versions() {
    let registry = registry();
    assert_eq!(
        registry.versions(),
        vec![StrategyVersion::new("v1"), StrategyVersion::new("v2")]
    );
    assert_eq!(registry.default_version(), &StrategyVersion::v1());
}

#[test]
fn builds_v1_from_configuration() {
    let config = ScoringConfig {
        rules: rules_config("0.45", "0.2", "0.35"),
        ..ScoringConfig::default()
    };

    let registry = StrategyRegistry::from_config(&config, pool()).expect("valid config");

    assert_eq!(registry.versions(), vec![StrategyVersion::v1()]);
}

#[test]
fn invalid_weights_fail_registry_construction() {
    let mut config = ScoringConfig::default();
    config.rules = rules_config("0.5", "0.5", "0.5");

    let result = StrategyRegistry::from_config(&config, pool());

    assert!(matches!(result, Err(ScoringError::InvalidWeights { .. })));
}

#[test]
fn unknown_configured_default_fails_registry_construction() {
    let mut config = ScoringConfig::default();
    config.strategy.version = "v7".to_string();

    let result = StrategyRegistry::from_config(&config, pool());

    assert!(matches!(result, Err(ScoringError::UnknownDefaultStrategy { .. })));
}
