use rust_decimal::Decimal;

use super::common::*;
use crate::config::{CapRuleConfig, FreshnessRuleConfig};
use crate::scoring::rules::{
    ForksScoringRule, FreshnessScoringRule, ScoringRule, StarsScoringRule, FORKS_RULE,
    FRESHNESS_RULE, STARS_RULE,
};

fn stars_rule(cap: i64) -> StarsScoringRule {
    StarsScoringRule::new(CapRuleConfig {
        cap,
        weight: dec("0.45"),
    })
}

#[test]
fn stars_rule_records_weighted_success() {
    let rule = stars_rule(10_000);
    let snapshot = snapshot(10_000, 0, 0);

    let outcome = rule.evaluate(&snapshot);

    assert!(outcome.success);
    assert_eq!(outcome.rule_name, STARS_RULE);
    assert_eq!(outcome.raw_score, Decimal::ONE);
    assert_eq!(outcome.weight, dec("0.45"));
    assert_eq!(snapshot.outcomes(), vec![outcome]);
}

#[test]
fn stars_rule_exceeds_one_above_the_cap() {
    let outcome = stars_rule(1_000).evaluate(&snapshot(50_000, 0, 0));
    assert!(outcome.success);
    assert!(outcome.raw_score > Decimal::ONE);
}

#[test]
fn stars_rule_scores_zero_with_zero_cap() {
    let outcome = stars_rule(0).evaluate(&snapshot(1_000, 0, 0));
    assert!(outcome.success);
    assert_eq!(outcome.raw_score, Decimal::ZERO);
    assert_eq!(outcome.weight, dec("0.45"));
}

#[test]
fn negative_stars_fail_without_weight() {
    let snapshot = snapshot(-3, 10, 0);

    let outcome = stars_rule(10_000).evaluate(&snapshot);

    assert!(!outcome.success);
    assert_eq!(outcome.weight, Decimal::ZERO);
    assert_eq!(outcome.raw_score, Decimal::ZERO);
    let error = outcome.error.expect("failure carries a description");
    assert!(error.contains("stars"), "{error}");
    assert_eq!(snapshot.outcome(STARS_RULE).map(|o| o.success), Some(false));
}

#[test]
fn negative_forks_fail_without_touching_other_outcomes() {
    let snapshot = snapshot(100, -1, 0);
    let forks = ForksScoringRule::new(CapRuleConfig {
        cap: 10_000,
        weight: dec("0.2"),
    });

    let stars_outcome = stars_rule(10_000).evaluate(&snapshot);
    let forks_outcome = forks.evaluate(&snapshot);

    assert!(stars_outcome.success);
    assert!(!forks_outcome.success);
    assert_eq!(snapshot.outcome(STARS_RULE), Some(stars_outcome));
    assert_eq!(snapshot.outcome(FORKS_RULE), Some(forks_outcome));
}

#[test]
fn freshness_rule_decays_with_age() {
    let rule = FreshnessScoringRule::new(FreshnessRuleConfig {
        half_life_days: 90,
        weight: dec("0.35"),
    });

    let fresh = rule.evaluate(&snapshot(0, 0, 0));
    let stale = rule.evaluate(&snapshot(0, 0, 90));
    let future = rule.evaluate(&snapshot(0, 0, -12));

    assert_eq!(fresh.rule_name, FRESHNESS_RULE);
    assert_eq!(fresh.raw_score, Decimal::ONE);
    assert!((stale.raw_score - dec("0.5")).abs() < dec("0.01"));
    assert_eq!(future.raw_score, Decimal::ONE);
    assert_eq!(stale.weight, dec("0.35"));
}

#[test]
fn evaluating_twice_replaces_the_outcome() {
    let snapshot = snapshot(10, 0, 0);
    let rule = stars_rule(10_000);

    rule.evaluate(&snapshot);
    rule.evaluate(&snapshot);

    assert_eq!(snapshot.outcomes().len(), 1);
}
