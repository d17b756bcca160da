use crate::error::DirectionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Market bias of a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    Bullish,
    Bearish,
}

impl Bias {
    /// Bias from the sign of a value; zero has no bias.
    pub fn from_sign(value: f64) -> Option<Self> {
        if value > 0.0 {
            Some(Bias::Bullish)
        } else if value < 0.0 {
            Some(Bias::Bearish)
        } else {
            None
        }
    }

    /// Trade side that follows this bias.
    pub fn side(&self) -> Side {
        match self {
            Bias::Bullish => Side::Long,
            Bias::Bearish => Side::Short,
        }
    }
}

/// Proposed trade side for risk/reward estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Long,
    Short,
}

impl FromStr for Side {
    type Err = DirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "long" | "buy" => Ok(Side::Long),
            "short" | "sell" => Ok(Side::Short),
            _ => Err(DirectionError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "long"),
            Side::Short => write!(f, "short"),
        }
    }
}

/// Indicator values computed for a single evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub atr: f64,
    pub atr_percent: f64,
    pub slope: f64,
    pub last_close: f64,
}

/// EMA/RSI/slope trend confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSignal {
    pub direction: Bias,
    pub rsi: f64,
    pub slope: f64,
    /// Distance between the EMAs as a percentage of the last close.
    pub crossover_strength: f64,
}

/// Close-to-close move well above its recent average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolatilitySpike {
    /// Signed percentage change of the latest close.
    pub current_move_pct: f64,
    /// Average absolute percentage change over the lookback window.
    pub average_move_pct: f64,
    pub atr: f64,
}

/// Volume well above its rolling average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSpike {
    pub current_volume: f64,
    pub average_volume: f64,
    /// Current volume as a percentage of the average.
    pub volume_pct: f64,
    /// Volume cleared the ultra multiplier as well.
    pub ultra: bool,
}

/// Severity tier of an intrabar move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    Early,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveAlert {
    pub kind: MoveKind,
    pub move_pct: f64,
    pub direction: Bias,
}

/// Single/two-candle formations recognised on the latest candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandlePattern {
    Hammer,
    ShootingStar,
    BullishEngulfing,
    BearishEngulfing,
    Doji,
    NoPattern,
}

impl CandlePattern {
    /// Directional reading of the pattern. Doji and no pattern are neutral.
    pub fn bias(&self) -> Option<Bias> {
        match self {
            CandlePattern::Hammer | CandlePattern::BullishEngulfing => Some(Bias::Bullish),
            CandlePattern::ShootingStar | CandlePattern::BearishEngulfing => Some(Bias::Bearish),
            CandlePattern::Doji | CandlePattern::NoPattern => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CandlePattern::Hammer => "Hammer",
            CandlePattern::ShootingStar => "Shooting Star",
            CandlePattern::BullishEngulfing => "Bullish Engulfing",
            CandlePattern::BearishEngulfing => "Bearish Engulfing",
            CandlePattern::Doji => "Doji",
            CandlePattern::NoPattern => "No Pattern",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMatch {
    pub name: CandlePattern,
    /// Historical reliability, 0-5.
    pub stars: u8,
}

/// Output of one detector for one evaluation cycle.
///
/// Tagged by `detector` in JSON; `kind` belongs to [`MoveAlert`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "detector", rename_all = "snake_case")]
pub enum DetectionResult {
    Trend(TrendSignal),
    VolatilitySpike(VolatilitySpike),
    VolumeSpike(VolumeSpike),
    Move(MoveAlert),
    Pattern(PatternMatch),
}

impl DetectionResult {
    pub fn as_trend(&self) -> Option<&TrendSignal> {
        match self {
            DetectionResult::Trend(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_volatility(&self) -> Option<&VolatilitySpike> {
        match self {
            DetectionResult::VolatilitySpike(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_volume(&self) -> Option<&VolumeSpike> {
        match self {
            DetectionResult::VolumeSpike(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_move(&self) -> Option<&MoveAlert> {
        match self {
            DetectionResult::Move(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_pattern(&self) -> Option<&PatternMatch> {
        match self {
            DetectionResult::Pattern(p) => Some(p),
            _ => None,
        }
    }
}

/// Stop, target and reward:risk for a proposed side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRewardEstimate {
    pub side: Side,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub target: f64,
    pub risk: f64,
    pub reward: f64,
    pub ratio: f64,
}

/// Ordered quality band of a composite score, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Reject,
    Unfavorable,
    HighRisk,
    Caution,
    Moderate,
    High,
    Top,
    Ultra,
    GodTier,
}

impl Category {
    /// Category for a score, testing bands highest first.
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 95 => Category::GodTier,
            s if s >= 90 => Category::Ultra,
            s if s >= 80 => Category::Top,
            s if s >= 70 => Category::High,
            s if s >= 60 => Category::Moderate,
            s if s >= 50 => Category::Caution,
            s if s >= 40 => Category::HighRisk,
            s if s >= 30 => Category::Unfavorable,
            _ => Category::Reject,
        }
    }

    /// Get display label for this category.
    pub fn label(&self) -> &'static str {
        match self {
            Category::GodTier => "God Tier",
            Category::Ultra => "Ultra",
            Category::Top => "Top",
            Category::High => "High",
            Category::Moderate => "Moderate",
            Category::Caution => "Caution",
            Category::HighRisk => "High Risk",
            Category::Unfavorable => "Unfavorable",
            Category::Reject => "Reject",
        }
    }

    /// Position in the ladder, 0 for `Reject` up to 8 for `GodTier`.
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Inclusive lower bound of the band.
    pub fn min_score(&self) -> u8 {
        match self {
            Category::GodTier => 95,
            Category::Ultra => 90,
            Category::Top => 80,
            Category::High => 70,
            Category::Moderate => 60,
            Category::Caution => 50,
            Category::HighRisk => 40,
            Category::Unfavorable => 30,
            Category::Reject => 0,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Score after each synthesizer stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub base: f64,
    pub scaled: f64,
    pub win_rate_tuned: f64,
    pub context_boosted: f64,
    pub reinforced: f64,
}

/// Graded signal for one symbol at one evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeSignal {
    symbol: String,
    timestamp: i64,
    score: u8,
    stars: u8,
    category: Category,
    confidence: f64,
    detections: Vec<DetectionResult>,
    risk_reward: Option<RiskRewardEstimate>,
    indicators: IndicatorSnapshot,
    breakdown: ScoreBreakdown,
}

impl CompositeSignal {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        symbol: String,
        timestamp: i64,
        score: u8,
        stars: u8,
        category: Category,
        confidence: f64,
        detections: Vec<DetectionResult>,
        risk_reward: Option<RiskRewardEstimate>,
        indicators: IndicatorSnapshot,
        breakdown: ScoreBreakdown,
    ) -> Self {
        Self {
            symbol,
            timestamp,
            score,
            stars,
            category,
            confidence,
            detections,
            risk_reward,
            indicators,
            breakdown,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Timestamp (ms) of the candle the signal was evaluated on.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Composite score, 0-100.
    pub fn score(&self) -> u8 {
        self.score
    }

    /// Star rating, 1-5, derived from the score.
    pub fn stars(&self) -> u8 {
        self.stars
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Unrounded final score.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn detections(&self) -> &[DetectionResult] {
        &self.detections
    }

    pub fn risk_reward(&self) -> Option<&RiskRewardEstimate> {
        self.risk_reward.as_ref()
    }

    pub fn indicators(&self) -> &IndicatorSnapshot {
        &self.indicators
    }

    pub fn breakdown(&self) -> &ScoreBreakdown {
        &self.breakdown
    }

    /// Strong signals count as wins in the session statistics.
    pub fn is_strong(&self) -> bool {
        self.stars >= 4 && self.confidence >= 70.0
    }
}

/// Volatility band of the latest ATR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    Elevated,
    Extreme,
}

impl RiskLevel {
    pub fn from_atr_percent(atr_percent: f64) -> Self {
        match atr_percent {
            p if p < 1.0 => RiskLevel::Low,
            p if p < 2.5 => RiskLevel::Moderate,
            p if p < 5.0 => RiskLevel::Elevated,
            _ => RiskLevel::Extreme,
        }
    }
}

/// Risk summary that accompanies every signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAdvisory {
    pub level: RiskLevel,
    pub atr_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward_risk: Option<f64>,
    /// Reward:risk meets the configured minimum and volatility is not extreme.
    pub favorable: bool,
}

/// Increment applied to the session statistics by one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDelta {
    pub strong: bool,
    pub confidence: f64,
}

/// Everything an evaluation produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalReport {
    pub signal: CompositeSignal,
    pub advisory: RiskAdvisory,
    pub delta: StatsDelta,
}
