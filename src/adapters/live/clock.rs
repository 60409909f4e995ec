//! Live clock using the system clock and local UTC offset.

use chrono::{DateTime, FixedOffset, Local};

use crate::ports::Clock;

/// Returns the real current time in the machine's local offset.
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn returns_current_time() {
        let before = Utc::now();
        let now = LiveClock.now();
        let after = Utc::now();

        assert!(now >= before);
        assert!(now <= after);
    }
}
