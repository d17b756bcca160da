//! Evaluation pipeline: indicators, detectors, risk/reward, synthesis,
//! classification and the session update.

use super::classifier::classify;
use super::confidence::ConfidenceSynthesizer;
use super::detectors::{all_detectors, Detector};
use super::indicators;
use super::risk_reward::RiskRewardEstimator;
use super::session::SessionStats;
use crate::config::EngineConfig;
use crate::error::{ConfigError, Result};
use crate::types::{
    CandleSeries, CompositeSignal, DetectionResult, RiskAdvisory, RiskLevel, RiskRewardEstimate,
    Side, SignalReport, StatsDelta,
};
use tracing::{debug, info, warn};

/// Stateless signal engine. Shared session state is passed in per call.
pub struct SignalEngine {
    config: EngineConfig,
    detectors: Vec<Box<dyn Detector>>,
    estimator: RiskRewardEstimator,
    synthesizer: ConfidenceSynthesizer,
}

impl SignalEngine {
    /// Build an engine from a validated configuration.
    pub fn new(config: EngineConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            detectors: all_detectors(&config),
            estimator: RiskRewardEstimator::new(config.risk_reward_window),
            synthesizer: ConfidenceSynthesizer::new(config.static_confidence_scale),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate the latest candle of `series`.
    ///
    /// `stats` is read once for win-rate tuning and updated only after the
    /// signal has been fully built; a failed evaluation leaves it untouched.
    pub fn evaluate(
        &self,
        symbol: &str,
        series: &CandleSeries,
        stats: &SessionStats,
    ) -> Result<SignalReport> {
        let snapshot = indicators::snapshot(series, &self.config).map_err(|e| {
            warn!("Cannot evaluate {}: {}", symbol, e);
            e
        })?;

        let mut detections = Vec::with_capacity(self.detectors.len());
        for detector in &self.detectors {
            match detector.detect(series, &snapshot) {
                Some(detection) => {
                    debug!("{}: {} fired", symbol, detector.id());
                    detections.push(detection);
                }
                None => debug!("{}: {} inconclusive", symbol, detector.id()),
            }
        }

        let risk_reward = propose_side(&detections).and_then(|side| {
            let estimate = self.estimator.estimate(series, side);
            if estimate.is_none() {
                debug!("{}: no {} risk/reward estimate", symbol, side);
            }
            estimate
        });

        let breakdown = self.synthesizer.synthesize(&detections, &stats.snapshot());
        let confidence = breakdown.reinforced;
        let (score, stars, category) = classify(confidence);
        let timestamp = series.last().map(|c| c.timestamp).unwrap_or_default();

        let signal = CompositeSignal::new(
            symbol.to_string(),
            timestamp,
            score,
            stars,
            category,
            confidence,
            detections,
            risk_reward,
            snapshot,
            breakdown,
        );

        let advisory = advise(
            snapshot.atr_percent,
            signal.risk_reward(),
            self.config.min_reward_risk,
        );
        let delta = StatsDelta {
            strong: signal.is_strong(),
            confidence,
        };
        stats.apply(delta);

        info!(
            "{} scored {} ({}, {} stars, {} detections)",
            symbol,
            score,
            category,
            stars,
            signal.detections().len()
        );

        Ok(SignalReport {
            signal,
            advisory,
            delta,
        })
    }

    /// Evaluate several symbols against the same session, in input order.
    pub fn evaluate_batch(
        &self,
        inputs: &[(String, CandleSeries)],
        stats: &SessionStats,
    ) -> Vec<Result<SignalReport>> {
        inputs
            .iter()
            .map(|(symbol, series)| self.evaluate(symbol, series, stats))
            .collect()
    }
}

/// Side to estimate risk/reward for: trend first, then a directional
/// pattern, then the move alert.
pub fn propose_side(detections: &[DetectionResult]) -> Option<Side> {
    if let Some(trend) = detections.iter().find_map(|d| d.as_trend()) {
        return Some(trend.direction.side());
    }
    if let Some(bias) = detections
        .iter()
        .filter_map(|d| d.as_pattern())
        .find_map(|p| p.name.bias())
    {
        return Some(bias.side());
    }
    detections
        .iter()
        .find_map(|d| d.as_move())
        .map(|m| m.direction.side())
}

/// Risk advisory from the latest ATR% and the estimate, if any.
pub fn advise(
    atr_percent: f64,
    estimate: Option<&RiskRewardEstimate>,
    min_reward_risk: f64,
) -> RiskAdvisory {
    let level = RiskLevel::from_atr_percent(atr_percent);
    let reward_risk = estimate.map(|e| e.ratio);
    let favorable = level != RiskLevel::Extreme
        && reward_risk.map(|r| r >= min_reward_risk).unwrap_or(false);
    RiskAdvisory {
        level,
        atr_percent,
        reward_risk,
        favorable,
    }
}
