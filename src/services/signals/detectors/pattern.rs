//! Candlestick pattern recognition on the latest candle.

use super::Detector;
use crate::config::{EngineConfig, PatternStars};
use crate::types::{
    Candle, CandlePattern, CandleSeries, DetectionResult, IndicatorSnapshot, PatternMatch,
};

/// Body below this share of the range is a doji.
const DOJI_BODY_RATIO: f64 = 0.10;
/// Body above this share of the range is an engulfing candidate.
const ENGULFING_BODY_RATIO: f64 = 0.60;
/// Long shadow must be at least this multiple of the body.
const SHADOW_BODY_MULTIPLE: f64 = 2.0;

/// Recognises doji, engulfing, hammer and shooting star formations and tags
/// them with the configured star weight.
pub struct PatternDetector {
    stars: PatternStars,
}

impl PatternDetector {
    pub fn new(stars: PatternStars) -> Self {
        Self { stars }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.pattern_stars)
    }

    /// Classify `current`, using `previous` for the two-candle engulfing check.
    pub fn classify(current: &Candle, previous: Option<&Candle>) -> CandlePattern {
        let range = current.range();
        if range <= f64::EPSILON {
            return CandlePattern::NoPattern;
        }

        let body = current.body();
        let body_ratio = body / range;

        if body_ratio < DOJI_BODY_RATIO {
            return CandlePattern::Doji;
        }

        if body_ratio > ENGULFING_BODY_RATIO {
            return Self::engulfing(current, previous).unwrap_or(CandlePattern::NoPattern);
        }

        let upper = current.upper_shadow();
        let lower = current.lower_shadow();

        if lower >= body * SHADOW_BODY_MULTIPLE && upper <= body {
            CandlePattern::Hammer
        } else if upper >= body * SHADOW_BODY_MULTIPLE && lower <= body {
            CandlePattern::ShootingStar
        } else {
            CandlePattern::NoPattern
        }
    }

    /// Engulfing reading of a wide-bodied candle.
    ///
    /// Without a previous candle the close direction alone decides. With one,
    /// the previous candle must point the other way and its body must sit
    /// inside the current body.
    fn engulfing(current: &Candle, previous: Option<&Candle>) -> Option<CandlePattern> {
        let Some(prev) = previous else {
            return if current.is_bullish() {
                Some(CandlePattern::BullishEngulfing)
            } else if current.is_bearish() {
                Some(CandlePattern::BearishEngulfing)
            } else {
                None
            };
        };

        if current.is_bullish()
            && prev.is_bearish()
            && current.open <= prev.close
            && current.close >= prev.open
        {
            Some(CandlePattern::BullishEngulfing)
        } else if current.is_bearish()
            && prev.is_bullish()
            && current.open >= prev.close
            && current.close <= prev.open
        {
            Some(CandlePattern::BearishEngulfing)
        } else {
            None
        }
    }
}

impl Detector for PatternDetector {
    fn id(&self) -> &str {
        "candlestick_pattern"
    }

    fn detect(
        &self,
        series: &CandleSeries,
        _indicators: &IndicatorSnapshot,
    ) -> Option<DetectionResult> {
        let candles = series.candles();
        let (current, history) = candles.split_last()?;

        match Self::classify(current, history.last()) {
            CandlePattern::NoPattern => None,
            name => Some(DetectionResult::Pattern(PatternMatch {
                name,
                stars: self.stars.stars_for(name),
            })),
        }
    }
}
