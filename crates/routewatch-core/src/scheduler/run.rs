//! Scheduler loop and state machine.

use chrono::{DateTime, FixedOffset};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use super::boundary::{floor_boundary, next_boundary, time_until};
use super::clock::Clock;
use crate::collector::CycleReport;

/// Longest single sleep; the clock is re-read on every wake so wall-clock
/// jumps and timer drift are corrected within this bound.
const MAX_SLEEP: Duration = Duration::from_secs(30);

/// Idle → Running on start; Running ⇄ Firing around each cycle; → Stopped on shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Firing,
    Stopped,
}

/// Fires one job per wall-clock boundary, strictly sequentially.
pub struct Scheduler {
    clock: Arc<dyn Clock>,
    interval_minutes: u32,
    state: watch::Sender<SchedulerState>,
}

impl Scheduler {
    pub fn new(clock: Arc<dyn Clock>, interval_minutes: u32) -> Self {
        let (state, _) = watch::channel(SchedulerState::Idle);
        Self {
            clock,
            interval_minutes,
            state,
        }
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    /// Observe state transitions (e.g. for status output).
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state.subscribe()
    }

    fn set_state(&self, state: SchedulerState) {
        self.state.send_replace(state);
    }

    /// Run until `shutdown` becomes true (or its sender is dropped).
    ///
    /// Each job runs in its own task and is awaited to completion; a panic in
    /// it is logged and the scheduler keeps going. Shutdown never interrupts a
    /// running job. Boundaries that pass while a job is running are coalesced
    /// into one immediate firing once it finishes. Returns the number of
    /// cycles run.
    pub async fn run<F, Fut>(&self, mut job: F, mut shutdown: watch::Receiver<bool>) -> u64
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = CycleReport> + Send + 'static,
    {
        self.set_state(SchedulerState::Running);
        tracing::info!(
            interval_minutes = self.interval_minutes,
            "starting scheduler, collecting data every {} minutes aligned to the clock",
            self.interval_minutes
        );

        let mut cycles = 0u64;
        let mut next = next_boundary(&self.clock.now(), self.interval_minutes);
        loop {
            if !self.wait_until(&next, &mut shutdown).await {
                break;
            }

            self.set_state(SchedulerState::Firing);
            tracing::info!(boundary = %next.format("%Y-%m-%d %H:%M:%S"), "cycle triggered");
            match tokio::spawn(job()).await {
                Ok(report) => tracing::debug!(
                    succeeded = report.succeeded,
                    attempted = report.attempted,
                    "cycle finished"
                ),
                Err(e) => tracing::error!("collection cycle aborted: {}", e),
            }
            cycles += 1;
            self.set_state(SchedulerState::Running);

            if *shutdown.borrow() {
                break;
            }
            next = self.following(&next);
        }

        self.set_state(SchedulerState::Stopped);
        tracing::info!(cycles, "scheduler stopped");
        cycles
    }

    /// Boundary after `fired`, or the latest passed boundary if the cycle overran.
    fn following(&self, fired: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        let now = self.clock.now();
        let following = next_boundary(fired, self.interval_minutes);
        if following <= now {
            let coalesced = floor_boundary(&now, self.interval_minutes);
            tracing::warn!(
                missed_from = %following.format("%H:%M:%S"),
                "cycle overran its slot; firing once for the missed boundaries"
            );
            coalesced
        } else {
            following
        }
    }

    /// Sleep until the clock reaches `target`. Returns false if shutdown was requested.
    async fn wait_until(
        &self,
        target: &DateTime<FixedOffset>,
        shutdown: &mut watch::Receiver<bool>,
    ) -> bool {
        loop {
            if *shutdown.borrow() {
                return false;
            }
            let now = self.clock.now();
            if now >= *target {
                return true;
            }
            let nap = time_until(&now, target).min(MAX_SLEEP);
            tokio::select! {
                _ = tokio::time::sleep(nap) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        return false;
                    }
                }
            }
        }
    }
}
