// Velocity tracker
// Sliding-window counts and sums over a merchant's history. Pure, no
// I/O; the caller supplies an immutable snapshot per computation.

use chrono::{DateTime, Duration, Utc};

use crate::entities::Transaction;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowStats {
    pub count: u64,
    pub sum: f64,
    pub mean_amount: f64,
}

/// Sorts the supplied history once; delivery order is not trusted.
#[derive(Debug)]
pub struct VelocitySnapshot<'a> {
    sorted: Vec<&'a Transaction>,
}

impl<'a> VelocitySnapshot<'a> {
    pub fn new(history: &'a [Transaction]) -> Self {
        let mut sorted: Vec<&Transaction> = history.iter().collect();
        sorted.sort_by_key(|tx| tx.timestamp);
        Self { sorted }
    }

    /// Transactions with timestamps in `(as_of - window, as_of]`.
    pub fn window(&self, as_of: DateTime<Utc>, window: Duration) -> &[&'a Transaction] {
        let start = as_of - window;
        let lo = self.sorted.partition_point(|tx| tx.timestamp <= start);
        let hi = self.sorted.partition_point(|tx| tx.timestamp <= as_of);
        &self.sorted[lo..hi]
    }

    pub fn stats(&self, as_of: DateTime<Utc>, window: Duration) -> WindowStats {
        let slice = self.window(as_of, window);
        let count = slice.len() as u64;
        let sum: f64 = slice.iter().map(|tx| tx.amount).sum();
        let mean_amount = if count > 0 { sum / count as f64 } else { 0.0 };
        WindowStats {
            count,
            sum,
            mean_amount,
        }
    }
}
