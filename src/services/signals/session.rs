//! Session statistics shared by concurrent evaluations.

use crate::types::StatsDelta;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

/// `total_confidence` is stored in thousandths.
const CONFIDENCE_SCALE: f64 = 1000.0;

/// Process-lifetime signal counters.
///
/// Owned by the caller and passed to the engine by reference. Each counter is
/// atomic on its own; readers may see a snapshot that is one increment stale,
/// which the win-rate tuning tolerates.
pub struct SessionStats {
    total_signals: AtomicU64,
    strong_signals: AtomicU64,
    weak_signals: AtomicU64,
    total_confidence_milli: AtomicU64,
    /// Unix timestamp (milliseconds) of creation or last reset.
    started_at: AtomicI64,
}

impl SessionStats {
    /// Create a new, empty session.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Point-in-time copy of the counters.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            total_signals: self.total_signals.load(Ordering::Relaxed),
            strong_signals: self.strong_signals.load(Ordering::Relaxed),
            weak_signals: self.weak_signals.load(Ordering::Relaxed),
            total_confidence: self.total_confidence_milli.load(Ordering::Relaxed) as f64
                / CONFIDENCE_SCALE,
            started_at: self.started_at.load(Ordering::Relaxed),
        }
    }

    /// Record one evaluated signal.
    pub fn apply(&self, delta: StatsDelta) {
        self.total_signals.fetch_add(1, Ordering::Relaxed);
        if delta.strong {
            self.strong_signals.fetch_add(1, Ordering::Relaxed);
        } else {
            self.weak_signals.fetch_add(1, Ordering::Relaxed);
        }
        let milli = (delta.confidence.max(0.0) * CONFIDENCE_SCALE).round() as u64;
        self.total_confidence_milli
            .fetch_add(milli, Ordering::Relaxed);
    }

    /// Zero every counter. Called by whoever owns the reset schedule.
    pub fn reset(&self) {
        self.total_signals.store(0, Ordering::Relaxed);
        self.strong_signals.store(0, Ordering::Relaxed);
        self.weak_signals.store(0, Ordering::Relaxed);
        self.total_confidence_milli.store(0, Ordering::Relaxed);
        self.started_at
            .store(chrono::Utc::now().timestamp_millis(), Ordering::Relaxed);
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            total_signals: AtomicU64::new(0),
            strong_signals: AtomicU64::new(0),
            weak_signals: AtomicU64::new(0),
            total_confidence_milli: AtomicU64::new(0),
            started_at: AtomicI64::new(chrono::Utc::now().timestamp_millis()),
        }
    }
}

/// Immutable view of [`SessionStats`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub total_signals: u64,
    pub strong_signals: u64,
    pub weak_signals: u64,
    pub total_confidence: f64,
    pub started_at: i64,
}

impl SessionSnapshot {
    /// Counter-only snapshot, mostly for tests and replays.
    pub fn with_counts(total_signals: u64, strong_signals: u64) -> Self {
        Self {
            total_signals,
            strong_signals,
            weak_signals: total_signals.saturating_sub(strong_signals),
            ..Self::default()
        }
    }

    /// Strong share of all signals; `None` before the first signal.
    pub fn win_rate(&self) -> Option<f64> {
        if self.total_signals == 0 {
            return None;
        }
        Some(self.strong_signals as f64 / self.total_signals as f64)
    }

    pub fn average_confidence(&self) -> Option<f64> {
        if self.total_signals == 0 {
            return None;
        }
        Some(self.total_confidence / self.total_signals as f64)
    }
}
