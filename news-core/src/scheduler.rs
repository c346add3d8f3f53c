use std::sync::{Arc, Weak};
use std::time::Duration;

use rand::Rng;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::NewsError;
use crate::queue::Shared;

/// Decides when the next emission happens and which candidate it re-publishes.
///
/// Swapping this out changes the feel of the feed without touching subscribers.
pub trait Pacing: Send + Sync {
    /// A delay in `[min, max]`.
    fn next_delay(&self, min: Duration, max: Duration) -> Duration;
    /// An index in `0..window`. `window` is never zero.
    fn pick_index(&self, window: usize) -> usize;
}

/// Uniform random delay and uniform random pick.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPacing;

impl Pacing for RandomPacing {
    fn next_delay(&self, min: Duration, max: Duration) -> Duration {
        let min_ms = u64::try_from(min.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
        if min_ms >= max_ms {
            return min;
        }
        Duration::from_millis(rand::thread_rng().gen_range(min_ms..=max_ms))
    }

    fn pick_index(&self, window: usize) -> usize {
        rand::thread_rng().gen_range(0..window)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Scheduled,
}

pub(crate) struct SchedulerHandle {
    generation: u64,
    cancel_tx: broadcast::Sender<()>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Signals the task and lets it wind down on its own.
    pub(crate) fn cancel(self) {
        let _ = self.cancel_tx.send(());
        info!(generation = self.generation, "news scheduler stopped");
    }

    pub(crate) async fn stop(self) -> Result<(), NewsError> {
        let _ = self.cancel_tx.send(());
        self.join.await.map_err(NewsError::from)?;
        info!(generation = self.generation, "news scheduler shut down");
        Ok(())
    }
}

/// Emission loop for one scheduler generation.
///
/// Exits on cancel, when the queue is gone, or when a newer generation has
/// replaced it, so a restarted scheduler never runs alongside an old one.
pub(crate) fn spawn_scheduler(
    shared: Weak<Shared>,
    generation: u64,
    min: Duration,
    max: Duration,
    pacing: Arc<dyn Pacing>,
) -> SchedulerHandle {
    let (cancel_tx, mut cancel_rx) = broadcast::channel(1);

    let join = tokio::spawn(async move {
        loop {
            let delay = pacing.next_delay(min, max);
            let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
            debug!(generation, delay_ms, "next news emission armed");

            tokio::select! {
                biased;
                _ = cancel_rx.recv() => {
                    debug!(generation, "news scheduler cancelled");
                    break;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            let Some(queue) = shared.upgrade() else {
                break;
            };
            if !queue.is_current_scheduler(generation) {
                break;
            }
            if let Some(item) = queue.emit_cycle() {
                debug!(generation, id = %item.id, "news item re-published");
            }
        }
    });

    info!(generation, "news scheduler started");
    SchedulerHandle {
        generation,
        cancel_tx,
        join,
    }
}
