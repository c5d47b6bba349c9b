//! Property-based tests for the risk classifier
//!
//! Invariants that should hold for ALL symptom lists:
//! - Totality: a tier and a non-negative score for any input
//! - Idempotence: same input, same output
//! - Monotonicity: proportional score never drops as symptoms are added
//! - Precedence and positional sensitivity of the rule table

use diabscreen_core::classifier::rules::SYMPTOM_VOCABULARY;
use diabscreen_core::{RiskClassifier, RiskTier, ScoringStrategy, SymptomObservation};
use proptest::prelude::*;

fn strategies() -> [RiskClassifier; 2] {
    [
        RiskClassifier::new(ScoringStrategy::Proportional),
        RiskClassifier::new(ScoringStrategy::RuleBased),
    ]
}

/// Mix of vocabulary codes and arbitrary strings
fn symptom_code() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prop::sample::select(SYMPTOM_VOCABULARY.to_vec()).prop_map(str::to_string),
        1 => "[A-Z][0-9]{1,3}",
    ]
}

fn symptom_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(symptom_code(), 0..12)
}

proptest! {
    #[test]
    fn prop_classify_is_total(codes in symptom_list()) {
        for classifier in strategies() {
            let result = classifier.classify(&SymptomObservation::new(codes.clone()));
            prop_assert!(RiskTier::ALL.contains(&result.risk_tier));
            prop_assert!(result.score >= 0.0);
            prop_assert!(result.score.is_finite());
        }
    }

    #[test]
    fn prop_classify_is_idempotent(codes in symptom_list()) {
        for classifier in strategies() {
            let obs = SymptomObservation::new(codes.clone());
            prop_assert_eq!(classifier.classify(&obs), classifier.classify(&obs));
        }
    }

    #[test]
    fn prop_proportional_is_monotonic(codes in symptom_list(), extra in symptom_code()) {
        let classifier = RiskClassifier::new(ScoringStrategy::Proportional);
        let before = classifier.classify(&SymptomObservation::new(codes.clone()));

        let mut grown = codes;
        grown.push(extra);
        let after = classifier.classify(&SymptomObservation::new(grown));

        prop_assert!(after.score >= before.score);
        prop_assert!(after.risk_tier >= before.risk_tier);
    }

    #[test]
    fn prop_rule_based_score_at_least_base(codes in symptom_list()) {
        let result = RiskClassifier::new(ScoringStrategy::RuleBased)
            .classify(&SymptomObservation::new(codes));
        prop_assert!(result.score >= ScoringStrategy::RuleBased.minimum_score());
    }

    #[test]
    fn prop_rule_based_tier_ignores_order(mut codes in symptom_list()) {
        let classifier = RiskClassifier::new(ScoringStrategy::RuleBased);
        let forward = classifier.classify(&SymptomObservation::new(codes.clone()));
        codes.reverse();
        let backward = classifier.classify(&SymptomObservation::new(codes));

        prop_assert_eq!(forward.risk_tier, backward.risk_tier);
        prop_assert_eq!(forward.matched_rule, backward.matched_rule);
    }
}

#[test]
fn test_empty_input_minimum_scores() {
    let proportional = RiskClassifier::new(ScoringStrategy::Proportional)
        .classify(&SymptomObservation::empty());
    assert_eq!(proportional.risk_tier, RiskTier::Low);
    assert_eq!(proportional.score, 0.0);

    let rule_based =
        RiskClassifier::new(ScoringStrategy::RuleBased).classify(&SymptomObservation::empty());
    assert_eq!(rule_based.risk_tier, RiskTier::Low);
    assert_eq!(rule_based.score, 40.0);
}

#[test]
fn test_most_specific_rule_takes_precedence() {
    let result = RiskClassifier::new(ScoringStrategy::RuleBased).classify_codes(["G01", "G02", "G06"]);

    assert_eq!(result.risk_tier, RiskTier::High);
    assert_eq!(result.matched_rule.as_deref(), Some("R1"));
    // base 85 + positional bonus 5 + 10 + 15
    assert_eq!(result.score, 115.0);
}

#[test]
fn test_positional_sensitivity() {
    let classifier = RiskClassifier::new(ScoringStrategy::RuleBased);
    let known_first = classifier.classify_codes(["G01", "G99"]);
    let known_last = classifier.classify_codes(["G99", "G01"]);

    assert_eq!((known_last.score - known_first.score).abs(), 5.0);
    assert_eq!(known_first.risk_tier, known_last.risk_tier);
    assert_eq!(known_first.risk_tier, RiskTier::Medium);
}

#[test]
fn test_declared_count_drives_proportional_score() {
    let classifier = RiskClassifier::new(ScoringStrategy::Proportional);
    let obs = SymptomObservation::from_codes(["G01"]).with_declared_count(4);
    let result = classifier.classify(&obs);

    assert_eq!(result.score, 80.0);
    assert_eq!(result.risk_tier, RiskTier::High);
}

#[test]
fn test_declared_count_without_codes_is_empty() {
    let classifier = RiskClassifier::new(ScoringStrategy::Proportional);
    let result = classifier.classify(&SymptomObservation::empty().with_declared_count(5));

    assert_eq!(result.risk_tier, RiskTier::Low);
    assert_eq!(result.score, 0.0);
}

#[test]
fn test_unknown_only_input_is_low() {
    for classifier in strategies() {
        let result = classifier.classify_codes(["X01"]);
        assert_eq!(result.risk_tier, RiskTier::Low);
        assert!(result.matched_rule.is_none());
    }
}
