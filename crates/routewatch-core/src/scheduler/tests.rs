//! Scheduler tests on a manual clock driven by tokio's paused time.

use super::*;
use crate::collector::CycleReport;
use chrono::{DateTime, FixedOffset, TimeZone};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// Wall clock that starts at a fixed time and advances with tokio's (paused) clock.
struct ManualClock {
    base: DateTime<FixedOffset>,
    origin: tokio::time::Instant,
}

impl ManualClock {
    fn starting_at(h: u32, m: u32, s: u32) -> Self {
        let tz = FixedOffset::east_opt(4 * 3600).unwrap();
        Self {
            base: tz.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap(),
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.base + chrono::Duration::from_std(self.origin.elapsed()).unwrap()
    }
}

fn hms(t: &DateTime<FixedOffset>) -> String {
    t.format("%H:%M:%S").to_string()
}

#[tokio::test(start_paused = true)]
async fn fires_on_aligned_boundaries() {
    let clock = Arc::new(ManualClock::starting_at(10, 2, 30));
    let scheduler = Scheduler::new(clock.clone(), 5);
    assert_eq!(scheduler.state(), SchedulerState::Idle);

    let (stop_tx, stop_rx) = watch::channel(false);
    let fired = Arc::new(Mutex::new(Vec::new()));
    let job = {
        let fired = Arc::clone(&fired);
        let clock = Arc::clone(&clock);
        move || {
            let mut f = fired.lock().unwrap();
            f.push(hms(&clock.now()));
            if f.len() == 3 {
                let _ = stop_tx.send(true);
            }
            async { CycleReport::default() }
        }
    };

    let cycles = scheduler.run(job, stop_rx).await;
    assert_eq!(cycles, 3);
    assert_eq!(
        *fired.lock().unwrap(),
        vec!["10:05:00", "10:10:00", "10:15:00"]
    );
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn overrun_is_coalesced_into_one_deferred_firing() {
    let clock = Arc::new(ManualClock::starting_at(10, 2, 30));
    let scheduler = Scheduler::new(clock.clone(), 5);
    let (stop_tx, stop_rx) = watch::channel(false);
    let fired = Arc::new(Mutex::new(Vec::new()));
    let job = {
        let fired = Arc::clone(&fired);
        let clock = Arc::clone(&clock);
        move || {
            let mut f = fired.lock().unwrap();
            f.push(hms(&clock.now()));
            let first = f.len() == 1;
            if f.len() == 3 {
                let _ = stop_tx.send(true);
            }
            async move {
                if first {
                    tokio::time::sleep(Duration::from_secs(12 * 60)).await;
                }
                CycleReport::default()
            }
        }
    };

    scheduler.run(job, stop_rx).await;
    assert_eq!(
        *fired.lock().unwrap(),
        vec!["10:05:00", "10:17:00", "10:20:00"]
    );
}

#[tokio::test(start_paused = true)]
async fn shutdown_while_waiting_stops_without_firing() {
    let clock = Arc::new(ManualClock::starting_at(10, 2, 30));
    let scheduler = Scheduler::new(clock, 5);
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(60)).await;
        let _ = stop_tx.send(true);
    });

    let cycles = scheduler
        .run(|| async { CycleReport::default() }, stop_rx)
        .await;
    assert_eq!(cycles, 0);
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn in_flight_cycle_finishes_before_stop() {
    let clock = Arc::new(ManualClock::starting_at(10, 4, 0));
    let scheduler = Scheduler::new(clock, 5);
    let (stop_tx, stop_rx) = watch::channel(false);
    let observed = Arc::new(Mutex::new(None));
    let finished = Arc::new(Mutex::new(false));
    let job = {
        let observed = Arc::clone(&observed);
        let finished = Arc::clone(&finished);
        let state_rx = scheduler.subscribe();
        move || {
            // Interrupt arrives as the cycle starts.
            let _ = stop_tx.send(true);
            let observed = Arc::clone(&observed);
            let finished = Arc::clone(&finished);
            let state_rx = state_rx.clone();
            async move {
                *observed.lock().unwrap() = Some(*state_rx.borrow());
                tokio::time::sleep(Duration::from_secs(60)).await;
                *finished.lock().unwrap() = true;
                CycleReport::default()
            }
        }
    };

    let cycles = scheduler.run(job, stop_rx).await;
    assert_eq!(cycles, 1);
    assert!(*finished.lock().unwrap());
    assert_eq!(*observed.lock().unwrap(), Some(SchedulerState::Firing));
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn panicking_cycle_does_not_stop_scheduler() {
    let clock = Arc::new(ManualClock::starting_at(10, 4, 0));
    let scheduler = Scheduler::new(clock, 5);
    let (stop_tx, stop_rx) = watch::channel(false);
    let mut calls = 0u32;
    let job = move || {
        calls += 1;
        let n = calls;
        if n == 2 {
            let _ = stop_tx.send(true);
        }
        async move {
            if n == 1 {
                panic!("cycle blew up");
            }
            CycleReport::default()
        }
    };

    assert_eq!(scheduler.run(job, stop_rx).await, 2);
}

#[tokio::test(start_paused = true)]
async fn countdown_prints_and_exits_on_shutdown() {
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::starting_at(10, 2, 30));
    let (stop_tx, stop_rx) = watch::channel(false);
    let handle = tokio::spawn(run_countdown(clock, 5, stop_rx, Vec::<u8>::new()));

    tokio::time::sleep(Duration::from_millis(2500)).await;
    stop_tx.send(true).unwrap();
    let out = String::from_utf8(handle.await.unwrap()).unwrap();

    assert!(out.contains("\rNext run at 10:05:00 (in 02:30)"), "{out:?}");
    assert!(out.contains("(in 02:29)"));
    assert!(out.contains("(in 02:28)"));
    assert!(out.ends_with('\n'));
}

#[tokio::test(start_paused = true)]
async fn countdown_exits_when_sender_dropped() {
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::starting_at(10, 2, 30));
    let (stop_tx, stop_rx) = watch::channel(false);
    let handle = tokio::spawn(run_countdown(clock, 5, stop_rx, Vec::<u8>::new()));
    drop(stop_tx);
    assert!(handle.await.is_ok());
}

#[test]
fn countdown_format() {
    let tz = FixedOffset::east_opt(0).unwrap();
    let now = tz.with_ymd_and_hms(2024, 1, 1, 10, 2, 30).unwrap();
    let next = next_boundary(&now, 5);
    assert_eq!(
        format_countdown(&now, &next),
        "Next run at 10:05:00 (in 02:30)"
    );
}
