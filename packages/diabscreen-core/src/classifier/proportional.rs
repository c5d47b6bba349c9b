//! Proportional scoring
//!
//! `score = (n / 5) * 100`. The score is not capped: six symptoms give 120.

use crate::domain::RiskTier;

/// Number of symptoms that maps to a score of 100
pub const FULL_SCALE_SYMPTOMS: f64 = 5.0;

pub const HIGH_THRESHOLD: f64 = 70.0;
pub const MEDIUM_THRESHOLD: f64 = 40.0;

/// Score a symptom count and pick the tier by strict threshold comparison
pub fn score(cardinality: usize) -> (RiskTier, f64) {
    let score = (cardinality as f64 / FULL_SCALE_SYMPTOMS) * 100.0;
    (tier_for(score), score)
}

pub fn tier_for(score: f64) -> RiskTier {
    if score > HIGH_THRESHOLD {
        RiskTier::High
    } else if score > MEDIUM_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}
