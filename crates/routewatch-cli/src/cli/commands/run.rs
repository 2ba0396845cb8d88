//! `routewatch run` – clock-aligned collection until Ctrl-C.

use anyhow::Result;
use routewatch_core::config::RouteWatchConfig;
use routewatch_core::scheduler::{run_countdown, Clock, Scheduler, SystemClock};
use std::sync::Arc;
use tokio::sync::watch;

use super::build_collector;

/// 128 + SIGINT.
const FORCED_EXIT_CODE: i32 = 130;

#[derive(Debug, PartialEq, Eq)]
enum Interrupts {
    /// A second interrupt arrived before the process finished.
    Forced,
    /// Interrupts cannot be observed; shutdown is never requested.
    Unavailable,
}

/// First interrupt requests a graceful stop; the second one is returned as
/// `Forced` so the caller can exit while a cycle is still stuck in I/O.
async fn watch_interrupts<F, Fut>(mut next_interrupt: F, shutdown_tx: watch::Sender<bool>) -> Interrupts
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = std::io::Result<()>>,
{
    if let Err(e) = next_interrupt().await {
        tracing::warn!("cannot listen for Ctrl-C: {}", e);
        // A dropped sender reads as shutdown; hold it.
        std::future::pending::<()>().await;
        return Interrupts::Unavailable;
    }
    println!();
    tracing::info!("interrupt received; stopping after the current cycle (Ctrl-C again to force exit)");
    let _ = shutdown_tx.send(true);

    match next_interrupt().await {
        Ok(()) => Interrupts::Forced,
        Err(e) => {
            tracing::warn!("cannot listen for a second Ctrl-C: {}", e);
            std::future::pending::<()>().await;
            Interrupts::Unavailable
        }
    }
}

pub async fn run_scheduler(cfg: &RouteWatchConfig, countdown: bool) -> Result<()> {
    let collector = Arc::new(build_collector(cfg).await?);
    let interval = cfg.interval_minutes();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Interrupts::Forced = watch_interrupts(tokio::signal::ctrl_c, shutdown_tx).await {
            tracing::warn!("second interrupt; exiting without waiting for the current cycle");
            std::process::exit(FORCED_EXIT_CODE);
        }
    });

    let countdown_handle = countdown.then(|| {
        tokio::spawn(run_countdown(
            Arc::clone(&clock),
            interval,
            shutdown_rx.clone(),
            std::io::stdout(),
        ))
    });

    let scheduler = Scheduler::new(clock, interval);
    let cycles = scheduler
        .run(
            move || {
                let collector = Arc::clone(&collector);
                async move { collector.run_cycle().await }
            },
            shutdown_rx,
        )
        .await;

    if let Some(handle) = countdown_handle {
        let _ = handle.await;
    }
    tracing::info!(cycles, "application stopped by user");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn first_interrupt_stops_gracefully_second_forces() {
        let (tx, rx) = mpsc::unbounded_channel::<()>();
        let rx = Arc::new(tokio::sync::Mutex::new(rx));
        let next = move || {
            let rx = Arc::clone(&rx);
            async move {
                rx.lock().await.recv().await;
                Ok(())
            }
        };
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(watch_interrupts(next, shutdown_tx));

        tx.send(()).unwrap();
        shutdown_rx.changed().await.unwrap();
        assert!(*shutdown_rx.borrow());

        // Still listening after the first interrupt.
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(!handle.is_finished());

        tx.send(()).unwrap();
        assert_eq!(handle.await.unwrap(), Interrupts::Forced);
    }

    #[tokio::test(start_paused = true)]
    async fn unavailable_listener_never_requests_shutdown() {
        let next = || async { Err(std::io::Error::other("no signals")) };
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(watch_interrupts(next, shutdown_tx));

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(!handle.is_finished());
        assert!(!*shutdown_rx.borrow());
        assert!(shutdown_rx.has_changed().is_ok());
    }
}
