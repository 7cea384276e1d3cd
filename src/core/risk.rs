use crate::domain::model::{FactorScores, MonthlyScores, ScoreWeights};

/// Weighted sum of the four factor scores and the twelve monthly
/// precipitation scores. The result is not clamped.
pub fn calculate_risk_score(
    elevation_score: u8,
    rivers_score: u8,
    water_bodies_score: u8,
    forest_score: u8,
    precipitation_score: &MonthlyScores,
    score_weights: &ScoreWeights,
) -> f64 {
    let monthly: f64 = precipitation_score
        .iter()
        .zip(score_weights.month_weights.iter())
        .map(|(score, weight)| f64::from(*score) * weight)
        .sum();

    f64::from(elevation_score) * score_weights.elevation
        + f64::from(rivers_score) * score_weights.rivers
        + f64::from(water_bodies_score) * score_weights.water_bodies
        + f64::from(forest_score) * score_weights.forest
        + monthly
}

pub fn risk_score_for(
    scores: &FactorScores,
    precipitation_score: &MonthlyScores,
    score_weights: &ScoreWeights,
) -> f64 {
    calculate_risk_score(
        scores.elevation,
        scores.rivers,
        scores.water_bodies,
        scores.forest,
        precipitation_score,
        score_weights,
    )
}
