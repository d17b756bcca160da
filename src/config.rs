use crate::error::ConfigError;
use crate::types::CandlePattern;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Move detector tiers, in percent of the open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveThresholds {
    pub early: f64,
    pub full: f64,
}

impl Default for MoveThresholds {
    fn default() -> Self {
        Self {
            early: 1.0,
            full: 2.5,
        }
    }
}

/// Star weight (0-5) attached to each candlestick pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatternStars {
    pub hammer: u8,
    pub shooting_star: u8,
    pub bullish_engulfing: u8,
    pub bearish_engulfing: u8,
    pub doji: u8,
}

impl Default for PatternStars {
    fn default() -> Self {
        Self {
            hammer: 4,
            shooting_star: 4,
            bullish_engulfing: 5,
            bearish_engulfing: 5,
            doji: 2,
        }
    }
}

impl PatternStars {
    pub fn stars_for(&self, pattern: CandlePattern) -> u8 {
        match pattern {
            CandlePattern::Hammer => self.hammer,
            CandlePattern::ShootingStar => self.shooting_star,
            CandlePattern::BullishEngulfing => self.bullish_engulfing,
            CandlePattern::BearishEngulfing => self.bearish_engulfing,
            CandlePattern::Doji => self.doji,
            CandlePattern::NoPattern => 0,
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// RSI smoothing period.
    pub rsi_period: usize,
    /// Fast EMA period.
    pub ema_fast: usize,
    /// Slow EMA period.
    pub ema_slow: usize,
    /// Number of closes in the least-squares slope fit.
    pub slope_window: usize,
    /// Number of true ranges averaged into the ATR.
    pub atr_period: usize,
    /// Number of prior close-to-close moves averaged by the volatility detector.
    pub volatility_window: usize,
    pub volatility_threshold_multiplier: f64,
    /// Number of prior volumes averaged by the volume detector.
    pub volume_window: usize,
    pub volume_spike_multiplier: f64,
    /// Multiplier above which a volume spike counts as ultra.
    pub volume_ultra_multiplier: f64,
    pub move_thresholds: MoveThresholds,
    pub pattern_stars: PatternStars,
    /// Optional global multiplier applied to the base score (disabled by default).
    pub static_confidence_scale: Option<f64>,
    /// Number of candles scanned for recent extremes.
    pub risk_reward_window: usize,
    /// Minimum reward:risk for a favorable advisory.
    pub min_reward_risk: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            ema_fast: 9,
            ema_slow: 21,
            slope_window: 5,
            atr_period: 14,
            volatility_window: 14,
            volatility_threshold_multiplier: 1.7,
            volume_window: 20,
            volume_spike_multiplier: 1.5,
            volume_ultra_multiplier: 3.0,
            move_thresholds: MoveThresholds::default(),
            pattern_stars: PatternStars::default(),
            static_confidence_scale: None,
            risk_reward_window: 20,
            min_reward_risk: 1.0,
        }
    }
}

/// Read and parse an environment variable, falling back to `default`.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl EngineConfig {
    /// Load configuration from `OMEN_*` environment variables.
    ///
    /// Missing or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let stars = defaults.pattern_stars;

        Self {
            rsi_period: env_or("OMEN_RSI_PERIOD", defaults.rsi_period),
            ema_fast: env_or("OMEN_EMA_FAST", defaults.ema_fast),
            ema_slow: env_or("OMEN_EMA_SLOW", defaults.ema_slow),
            slope_window: env_or("OMEN_SLOPE_WINDOW", defaults.slope_window),
            atr_period: env_or("OMEN_ATR_PERIOD", defaults.atr_period),
            volatility_window: env_or("OMEN_VOLATILITY_WINDOW", defaults.volatility_window),
            volatility_threshold_multiplier: env_or(
                "OMEN_VOLATILITY_MULTIPLIER",
                defaults.volatility_threshold_multiplier,
            ),
            volume_window: env_or("OMEN_VOLUME_WINDOW", defaults.volume_window),
            volume_spike_multiplier: env_or(
                "OMEN_VOLUME_SPIKE_MULTIPLIER",
                defaults.volume_spike_multiplier,
            ),
            volume_ultra_multiplier: env_or(
                "OMEN_VOLUME_ULTRA_MULTIPLIER",
                defaults.volume_ultra_multiplier,
            ),
            move_thresholds: MoveThresholds {
                early: env_or("OMEN_MOVE_EARLY", defaults.move_thresholds.early),
                full: env_or("OMEN_MOVE_FULL", defaults.move_thresholds.full),
            },
            pattern_stars: PatternStars {
                hammer: env_or("OMEN_STARS_HAMMER", stars.hammer),
                shooting_star: env_or("OMEN_STARS_SHOOTING_STAR", stars.shooting_star),
                bullish_engulfing: env_or(
                    "OMEN_STARS_BULLISH_ENGULFING",
                    stars.bullish_engulfing,
                ),
                bearish_engulfing: env_or(
                    "OMEN_STARS_BEARISH_ENGULFING",
                    stars.bearish_engulfing,
                ),
                doji: env_or("OMEN_STARS_DOJI", stars.doji),
            },
            static_confidence_scale: env::var("OMEN_STATIC_CONFIDENCE_SCALE")
                .ok()
                .and_then(|v| v.trim().parse().ok()),
            risk_reward_window: env_or("OMEN_RISK_REWARD_WINDOW", defaults.risk_reward_window),
            min_reward_risk: env_or("OMEN_MIN_REWARD_RISK", defaults.min_reward_risk),
        }
    }

    /// Minimum candles the indicator layer needs.
    pub fn min_candles(&self) -> usize {
        self.rsi_period
            .max(self.slope_window)
            .max(self.ema_slow)
            .max(2)
    }

    /// Reject values the indicators and detectors cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("ema_fast", self.ema_fast),
            ("ema_slow", self.ema_slow),
            ("slope_window", self.slope_window),
            ("atr_period", self.atr_period),
            ("volatility_window", self.volatility_window),
            ("volume_window", self.volume_window),
            ("risk_reward_window", self.risk_reward_window),
        ];
        for (field, value) in periods {
            if value == 0 {
                return Err(ConfigError::invalid(field, "must be at least 1"));
            }
        }

        if self.ema_fast >= self.ema_slow {
            return Err(ConfigError::invalid(
                "ema_fast",
                format!(
                    "must be shorter than ema_slow ({} >= {})",
                    self.ema_fast, self.ema_slow
                ),
            ));
        }

        let multipliers = [
            (
                "volatility_threshold_multiplier",
                self.volatility_threshold_multiplier,
            ),
            ("volume_spike_multiplier", self.volume_spike_multiplier),
            ("volume_ultra_multiplier", self.volume_ultra_multiplier),
            ("min_reward_risk", self.min_reward_risk),
        ];
        for (field, value) in multipliers {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be positive, got {}", value),
                ));
            }
        }

        if self.volume_ultra_multiplier < self.volume_spike_multiplier {
            return Err(ConfigError::invalid(
                "volume_ultra_multiplier",
                "must not be below volume_spike_multiplier",
            ));
        }

        let MoveThresholds { early, full } = self.move_thresholds;
        if !early.is_finite() || early <= 0.0 {
            return Err(ConfigError::invalid("move_thresholds.early", "must be positive"));
        }
        if !full.is_finite() || full < early {
            return Err(ConfigError::invalid(
                "move_thresholds.full",
                format!("must be at least early ({} < {})", full, early),
            ));
        }

        let stars = self.pattern_stars;
        let weights = [
            ("pattern_stars.hammer", stars.hammer),
            ("pattern_stars.shooting_star", stars.shooting_star),
            ("pattern_stars.bullish_engulfing", stars.bullish_engulfing),
            ("pattern_stars.bearish_engulfing", stars.bearish_engulfing),
            ("pattern_stars.doji", stars.doji),
        ];
        for (field, value) in weights {
            if value > 5 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be 0-5, got {}", value),
                ));
            }
        }

        if let Some(scale) = self.static_confidence_scale {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(ConfigError::invalid(
                    "static_confidence_scale",
                    format!("must be positive, got {}", scale),
                ));
            }
        }

        Ok(())
    }
}
