//! Seed data loaded into empty stores

use diabscreen_core::{RiskTier, Symptom};

use super::NewRecommendation;

pub fn default_symptoms() -> Vec<Symptom> {
    Symptom::default_vocabulary()
}

pub fn default_recommendations() -> Vec<NewRecommendation> {
    vec![
        NewRecommendation::new(
            "See a doctor",
            "Contact a doctor promptly for a blood sugar test (HbA1c).",
        ),
        NewRecommendation::new(
            "Diet",
            "Cut down on refined carbohydrates and foods high in sugar.",
        ),
        NewRecommendation::new(
            "Stay active",
            "Aim for at least 150 minutes of moderate exercise per week.",
        )
        .for_tier(RiskTier::Low),
        NewRecommendation::new(
            "Check regularly",
            "Repeat a fasting glucose test within the next three months.",
        )
        .for_tier(RiskTier::Medium),
        NewRecommendation::new(
            "Monitor blood glucose",
            "Measure blood glucose daily until a doctor has reviewed the results.",
        )
        .for_tier(RiskTier::High),
    ]
}
