//! Time-based identifier assignment.

use chrono::Utc;

/// Hands out strictly increasing millisecond timestamps.
///
/// Two records created in the same millisecond still get distinct, ordered IDs.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Returns the next identifier.
    pub fn next_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last.saturating_add(1));
        self.last
    }

    /// Raises the floor so future IDs stay above `seen`.
    pub fn observe(&mut self, seen: i64) {
        self.last = self.last.max(seen);
    }
}
