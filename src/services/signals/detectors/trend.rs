//! EMA crossover + RSI band + slope trend confirmation.

use super::Detector;
use crate::types::{Bias, CandleSeries, DetectionResult, IndicatorSnapshot, TrendSignal};

/// RSI band that confirms a bullish trend without being overbought.
const BULLISH_RSI: (f64, f64) = (50.0, 68.0);
/// RSI band that confirms a bearish trend without being oversold.
const BEARISH_RSI: (f64, f64) = (32.0, 50.0);

/// Trend detector.
///
/// Bullish when the slope is positive, the fast EMA is above the slow one
/// and RSI sits in (50, 68). Bearish is the mirror with RSI in (32, 50).
pub struct TrendDetector;

impl TrendDetector {
    pub fn classify(indicators: &IndicatorSnapshot) -> Option<Bias> {
        let IndicatorSnapshot {
            rsi,
            ema_fast,
            ema_slow,
            slope,
            ..
        } = *indicators;

        if slope > 0.0 && ema_fast > ema_slow && rsi > BULLISH_RSI.0 && rsi < BULLISH_RSI.1 {
            Some(Bias::Bullish)
        } else if slope < 0.0 && ema_fast < ema_slow && rsi > BEARISH_RSI.0 && rsi < BEARISH_RSI.1
        {
            Some(Bias::Bearish)
        } else {
            None
        }
    }
}

impl Detector for TrendDetector {
    fn id(&self) -> &str {
        "trend"
    }

    fn detect(
        &self,
        _series: &CandleSeries,
        indicators: &IndicatorSnapshot,
    ) -> Option<DetectionResult> {
        let direction = Self::classify(indicators)?;
        if indicators.last_close == 0.0 {
            return None;
        }
        let crossover_strength =
            (indicators.ema_fast - indicators.ema_slow).abs() / indicators.last_close * 100.0;

        Some(DetectionResult::Trend(TrendSignal {
            direction,
            rsi: indicators.rsi,
            slope: indicators.slope,
            crossover_strength,
        }))
    }
}
