//! Score, stars and category from a final confidence.

use crate::types::Category;

/// Star rating for a composite score.
pub fn stars_for_score(score: u8) -> u8 {
    match score {
        s if s >= 90 => 5,
        s if s >= 75 => 4,
        s if s >= 60 => 3,
        s if s >= 40 => 2,
        _ => 1,
    }
}

/// Round the confidence to a 0-100 score and grade it.
///
/// Stars and category are both derived from the rounded score, so a report
/// can always be re-graded from `score` alone.
pub fn classify(confidence: f64) -> (u8, u8, Category) {
    let score = super::clamp_score(confidence).round() as u8;
    (score, stars_for_score(score), Category::from_score(score))
}
