//! Cancellable once-per-period callbacks.
//!
//! The quiz screen refreshes its elapsed-time display every second, and the
//! completed screen refreshes its countdown to midnight. Both run as a
//! `Ticker`: started explicitly, stopped explicitly (or by the callback
//! itself), and aborted on drop so no timer outlives its screen.

use std::time::Duration;

use quiz_core::countdown::Countdown;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::Clock;

/// What the tick callback wants to happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

/// Handle to a running periodic task.
#[derive(Debug)]
pub struct Ticker {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn a task that calls `on_tick` every `period`, starting immediately.
    ///
    /// The callback receives the 1-based tick number. Must be called from
    /// within a tokio runtime.
    pub fn start<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(u64) -> TickControl + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let (shutdown, mut stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut ticks = 0_u64;
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = interval.tick() => {
                        ticks += 1;
                        if on_tick(ticks) == TickControl::Stop {
                            break;
                        }
                    }
                }
            }
        });

        Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop ticking and wait for the task to wind down.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    /// Wait until the callback itself returns `TickControl::Stop`.
    pub async fn finished(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Reports elapsed whole seconds every second, starting from `already_elapsed`.
pub fn elapsed_ticker<F>(already_elapsed: u64, mut on_update: F) -> Ticker
where
    F: FnMut(u64) + Send + 'static,
{
    let started = Instant::now();
    Ticker::start(Duration::from_secs(1), move |_| {
        on_update(already_elapsed + started.elapsed().as_secs());
        TickControl::Continue
    })
}

/// Reports the countdown to the next midnight every second and stops once
/// it reaches zero.
///
/// The deadline is fixed when the ticker starts.
pub fn countdown_ticker<F>(clock: Clock, mut on_update: F) -> Ticker
where
    F: FnMut(Countdown) + Send + 'static,
{
    let remaining = Countdown::until_next_midnight(clock.now());
    let deadline = Instant::now() + Duration::from_secs(remaining.total_seconds());
    Ticker::start(Duration::from_secs(1), move |_| {
        let left = Countdown::from_seconds(
            deadline.saturating_duration_since(Instant::now()).as_secs(),
        );
        on_update(left);
        if left.is_elapsed() {
            TickControl::Stop
        } else {
            TickControl::Continue
        }
    })
}
