//! Forward-chaining rule table
//!
//! Rules are checked in order; the first whose antecedent is a subset of the
//! observed codes fires. When none fires the observation falls back to
//! `(Low, 40)`.
//!
//! The positional bonus adds `(i + 1) * 5` for the i-th supplied code when that
//! code is part of `SYMPTOM_VOCABULARY`. Unknown codes earn nothing but still
//! take up a position, so `["G01", "G99"]` and `["G99", "G01"]` differ by 5.

use crate::domain::RiskTier;

/// Codes the rule table knows about
pub const SYMPTOM_VOCABULARY: [&str; 6] = ["G01", "G02", "G03", "G04", "G05", "G06"];

pub const FALLBACK_TIER: RiskTier = RiskTier::Low;
pub const FALLBACK_SCORE: f64 = 40.0;

/// Points per position for the additive bonus
pub const POSITION_STEP: f64 = 5.0;

/// One symptom-combination rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub id: &'static str,
    pub antecedent: &'static [&'static str],
    pub tier: RiskTier,
    pub base_score: f64,
}

impl Rule {
    pub fn matches(&self, codes: &[String]) -> bool {
        self.antecedent
            .iter()
            .all(|required| codes.iter().any(|c| c == required))
    }
}

/// Ordered rule table (first match wins)
pub static RULES: [Rule; 5] = [
    Rule {
        id: "R1",
        antecedent: &["G01", "G02", "G06"],
        tier: RiskTier::High,
        base_score: 85.0,
    },
    Rule {
        id: "R2",
        antecedent: &["G01", "G06"],
        tier: RiskTier::High,
        base_score: 80.0,
    },
    Rule {
        id: "R3",
        antecedent: &["G02", "G03"],
        tier: RiskTier::Medium,
        base_score: 65.0,
    },
    Rule {
        id: "R4",
        antecedent: &["G02", "G06"],
        tier: RiskTier::Medium,
        base_score: 60.0,
    },
    Rule {
        id: "R5",
        antecedent: &["G01"],
        tier: RiskTier::Medium,
        base_score: 55.0,
    },
];

/// Result of running the rule table over one observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleOutcome {
    pub rule: Option<&'static Rule>,
    pub tier: RiskTier,
    pub base_score: f64,
    pub bonus: f64,
}

pub fn is_known_code(code: &str) -> bool {
    SYMPTOM_VOCABULARY.contains(&code)
}

/// First rule whose antecedent is satisfied
pub fn first_match(codes: &[String]) -> Option<&'static Rule> {
    RULES.iter().find(|rule| rule.matches(codes))
}

pub fn positional_bonus(codes: &[String]) -> f64 {
    codes
        .iter()
        .enumerate()
        .filter(|(_, code)| is_known_code(code))
        .map(|(i, _)| (i + 1) as f64 * POSITION_STEP)
        .sum()
}

pub fn evaluate(codes: &[String]) -> RuleOutcome {
    let rule = first_match(codes);
    let (tier, base_score) = rule
        .map(|r| (r.tier, r.base_score))
        .unwrap_or((FALLBACK_TIER, FALLBACK_SCORE));

    RuleOutcome {
        rule,
        tier,
        base_score,
        bonus: positional_bonus(codes),
    }
}
