//! Wall-clock source for the scheduler and countdown.

use chrono::{DateTime, FixedOffset, Local, Offset};

/// Current wall-clock time with the host's UTC offset.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The host clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let now = Local::now();
        now.with_timezone(&now.offset().fix())
    }
}
