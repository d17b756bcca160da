//! Confidence synthesis: weighted base score followed by ordered adjustment
//! stages. Every stage is clamped to [0, 100] before the next one runs.

use super::clamp_score;
use super::session::SessionSnapshot;
use crate::types::{Bias, DetectionResult, ScoreBreakdown};
use tracing::debug;

const VOLATILITY_SPIKE_BONUS: f64 = 20.0;
const NO_VOLATILITY_PENALTY: f64 = -5.0;
const TREND_BONUS: f64 = 15.0;
const TREND_VOLATILITY_ALIGNMENT_BONUS: f64 = 10.0;
const WEAK_PATTERN_PENALTY: f64 = -10.0;
const WEAK_PATTERN_STARS: f64 = 3.0;

const HIGH_WIN_RATE: f64 = 0.75;
const LOW_WIN_RATE: f64 = 0.4;
const HIGH_WIN_RATE_BONUS: f64 = 5.0;
const LOW_WIN_RATE_PENALTY: f64 = -7.0;

const TREND_PATTERN_BOOST: f64 = 3.0;
const ULTRA_VOLUME_BOOST: f64 = 4.0;
const FIVE_STAR_BOOST: f64 = 5.0;
const VOLATILITY_CONTEXT_PENALTY: f64 = -6.0;

const REINFORCE_HIGH: f64 = 85.0;
const REINFORCE_HIGH_BONUS: f64 = 5.0;
const REINFORCE_LOW: f64 = 25.0;
const REINFORCE_LOW_PENALTY: f64 = -10.0;

/// Score contributed by a pattern with the given star rating.
pub fn star_weight(stars: u8) -> f64 {
    match stars {
        0 => 0.0,
        1 => 2.0,
        2 => 5.0,
        3 => 12.0,
        4 => 25.0,
        _ => 35.0,
    }
}

/// Weighted sum over the present detections, clamped.
pub fn base_score(detections: &[DetectionResult]) -> f64 {
    let trend = detections.iter().find_map(|d| d.as_trend());
    let spike = detections.iter().find_map(|d| d.as_volatility());
    let pattern_stars: Vec<u8> = detections
        .iter()
        .filter_map(|d| d.as_pattern())
        .map(|p| p.stars)
        .collect();

    let mut score: f64 = pattern_stars.iter().map(|&s| star_weight(s)).sum();

    score += if spike.is_some() {
        VOLATILITY_SPIKE_BONUS
    } else {
        NO_VOLATILITY_PENALTY
    };

    if trend.is_some() {
        score += TREND_BONUS;
    }

    if let (Some(trend), Some(spike)) = (trend, spike) {
        if Bias::from_sign(spike.current_move_pct) == Some(trend.direction) {
            score += TREND_VOLATILITY_ALIGNMENT_BONUS;
        }
    }

    if !pattern_stars.is_empty() {
        let average =
            pattern_stars.iter().map(|&s| s as f64).sum::<f64>() / pattern_stars.len() as f64;
        if average < WEAK_PATTERN_STARS {
            score += WEAK_PATTERN_PENALTY;
        }
    }

    clamp_score(score)
}

/// Stage 1: optional global multiplier.
pub fn apply_static_scale(score: f64, scale: Option<f64>) -> f64 {
    match scale {
        Some(factor) => clamp_score(score * factor),
        None => clamp_score(score),
    }
}

/// Stage 2 adjustment from the session win rate. Pure in the snapshot.
pub fn win_rate_adjustment(stats: &SessionSnapshot) -> f64 {
    match stats.win_rate() {
        Some(rate) if rate > HIGH_WIN_RATE => HIGH_WIN_RATE_BONUS,
        Some(rate) if rate < LOW_WIN_RATE => LOW_WIN_RATE_PENALTY,
        _ => 0.0,
    }
}

/// Stage 3 adjustment from detector co-occurrence.
///
/// Each rule only asks whether a detection is present, so the result does not
/// depend on the order of `detections`.
pub fn context_adjustment(detections: &[DetectionResult]) -> f64 {
    let bullish_trend = detections
        .iter()
        .filter_map(|d| d.as_trend())
        .any(|t| t.direction == Bias::Bullish);
    let five_star_bullish_pattern = detections
        .iter()
        .filter_map(|d| d.as_pattern())
        .any(|p| p.stars >= 5 && p.name.bias() == Some(Bias::Bullish));
    let any_five_star = detections
        .iter()
        .filter_map(|d| d.as_pattern())
        .any(|p| p.stars >= 5);
    let ultra_volume = detections
        .iter()
        .filter_map(|d| d.as_volume())
        .any(|v| v.ultra);
    let volatility_spike = detections.iter().any(|d| d.as_volatility().is_some());

    let mut adjustment = 0.0;
    if bullish_trend && five_star_bullish_pattern {
        adjustment += TREND_PATTERN_BOOST;
    }
    if ultra_volume {
        adjustment += ULTRA_VOLUME_BOOST;
    }
    if any_five_star {
        adjustment += FIVE_STAR_BOOST;
    }
    if volatility_spike {
        adjustment += VOLATILITY_CONTEXT_PENALTY;
    }
    adjustment
}

/// Stage 4: push strong scores up and weak scores down.
pub fn reinforce(score: f64) -> f64 {
    if score >= REINFORCE_HIGH {
        clamp_score(score + REINFORCE_HIGH_BONUS)
    } else if score <= REINFORCE_LOW {
        clamp_score(score + REINFORCE_LOW_PENALTY)
    } else {
        clamp_score(score)
    }
}

/// Fuses detections and session feedback into a bounded score.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceSynthesizer {
    static_scale: Option<f64>,
}

impl ConfidenceSynthesizer {
    pub fn new(static_scale: Option<f64>) -> Self {
        Self { static_scale }
    }

    /// Run every stage in order and record each intermediate value.
    pub fn synthesize(
        &self,
        detections: &[DetectionResult],
        stats: &SessionSnapshot,
    ) -> ScoreBreakdown {
        let base = base_score(detections);
        let scaled = apply_static_scale(base, self.static_scale);
        let win_rate_tuned = clamp_score(scaled + win_rate_adjustment(stats));
        let context_boosted = clamp_score(win_rate_tuned + context_adjustment(detections));
        let reinforced = reinforce(context_boosted);

        debug!(
            base,
            scaled,
            win_rate_tuned,
            context_boosted,
            reinforced,
            "Synthesized confidence"
        );

        ScoreBreakdown {
            base,
            scaled,
            win_rate_tuned,
            context_boosted,
            reinforced,
        }
    }
}
