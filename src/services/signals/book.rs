//! Latest composite signal per symbol.

use crate::types::CompositeSignal;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// Concurrent store of the most recent signal for each symbol.
pub struct SignalBook {
    /// Key is the uppercased symbol.
    signals: DashMap<String, CompositeSignal>,
}

impl SignalBook {
    /// Create a new, empty book.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Store a signal, replacing any older one for the same symbol.
    ///
    /// A signal evaluated on an earlier candle than the stored one is ignored.
    pub fn record(&self, signal: CompositeSignal) {
        match self.signals.entry(signal.symbol().to_uppercase()) {
            Entry::Occupied(mut entry) => {
                if entry.get().timestamp() > signal.timestamp() {
                    debug!(
                        "Ignoring stale signal for {} ({} < {})",
                        entry.key(),
                        signal.timestamp(),
                        entry.get().timestamp()
                    );
                    return;
                }
                entry.insert(signal);
            }
            Entry::Vacant(entry) => {
                entry.insert(signal);
            }
        }
    }

    /// Most recent signal for a symbol.
    pub fn latest(&self, symbol: &str) -> Option<CompositeSignal> {
        self.signals
            .get(&symbol.to_uppercase())
            .map(|entry| entry.clone())
    }

    /// Highest-scoring signal across all symbols.
    pub fn strongest(&self) -> Option<CompositeSignal> {
        self.signals
            .iter()
            .max_by(|a, b| {
                a.score()
                    .cmp(&b.score())
                    .then_with(|| b.symbol().cmp(a.symbol()))
            })
            .map(|entry| entry.value().clone())
    }

    /// All stored signals, highest score first.
    pub fn ranked(&self) -> Vec<CompositeSignal> {
        let mut all: Vec<CompositeSignal> =
            self.signals.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| {
            b.score()
                .cmp(&a.score())
                .then_with(|| a.symbol().cmp(b.symbol()))
        });
        all
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn clear(&self) {
        self.signals.clear();
    }
}

impl Default for SignalBook {
    fn default() -> Self {
        Self {
            signals: DashMap::new(),
        }
    }
}
