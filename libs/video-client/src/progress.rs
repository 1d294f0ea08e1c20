use std::sync::atomic::{AtomicU8, Ordering};

/// `round(sent * 100 / total)` clamped to 0..=100, 0 while the total is unknown.
pub fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    (sent as f64 * 100.0 / total as f64).round().clamp(0.0, 100.0) as u8
}

/// Percentage for one transfer. Never goes backwards, a new transfer gets a
/// new tracker.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    last: AtomicU8,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, sent: u64, total: u64) -> u8 {
        let next = percent(sent, total);
        self.last.fetch_max(next, Ordering::AcqRel).max(next)
    }
}
