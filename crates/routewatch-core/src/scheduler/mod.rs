//! Wall-clock-aligned cycle scheduler.
//!
//! Cycles fire at local times whose minute is a multiple of the configured
//! interval (:00, :05, :10, … by default), one at a time, until shutdown.
//! A separate countdown task prints the time left to the next boundary.

mod boundary;
mod clock;
mod countdown;
mod run;

pub use boundary::{floor_boundary, next_boundary, time_until};
pub use clock::{Clock, SystemClock};
pub use countdown::{format_countdown, run_countdown};
pub use run::{Scheduler, SchedulerState};

#[cfg(test)]
mod tests;
