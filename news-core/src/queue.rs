use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::QueueConfig;
use crate::error::NewsError;
use crate::item::{sort_newest_first, NewsItem};
use crate::scheduler::{spawn_scheduler, Pacing, RandomPacing, SchedulerHandle, SchedulerState};
use crate::subscriber::{
    panic_message, Callback, DiagnosticsSink, SubscriberId, Subscription, TracingSink,
};

struct Registry {
    next_id: SubscriberId,
    next_generation: u64,
    subscribers: Vec<(SubscriberId, Callback)>,
    scheduler: Option<SchedulerHandle>,
}

pub(crate) struct Shared {
    config: QueueConfig,
    clock: Clock,
    pacing: Arc<dyn Pacing>,
    sink: Arc<dyn DiagnosticsSink>,
    items: RwLock<Vec<NewsItem>>,
    registry: Mutex<Registry>,
    // Held for the whole select-restamp-notify sequence.
    cycle: Mutex<()>,
}

impl Shared {
    pub(crate) fn is_current_scheduler(&self, generation: u64) -> bool {
        self.registry
            .lock()
            .scheduler
            .as_ref()
            .is_some_and(|handle| handle.generation() == generation)
    }

    pub(crate) fn remove_subscriber(&self, id: SubscriberId) {
        let stopped = {
            let mut registry = self.registry.lock();
            registry.subscribers.retain(|(sid, _)| *sid != id);
            debug!(
                subscriber = id,
                remaining = registry.subscribers.len(),
                "news subscriber removed"
            );
            if registry.subscribers.is_empty() {
                registry.scheduler.take()
            } else {
                None
            }
        };
        if let Some(handle) = stopped {
            handle.cancel();
        }
    }

    /// One emission: restamp a recent item, reorder, notify.
    pub(crate) fn emit_cycle(&self) -> Option<NewsItem> {
        let _cycle = self.cycle.lock();
        let updated = {
            let mut items = self.items.write();
            let window = self.config.candidate_window.min(items.len());
            if window == 0 {
                return None;
            }
            let index = self.pacing.pick_index(window).min(window - 1);
            let updated = items[index].restamped(self.clock.now());
            items[index] = updated.clone();
            sort_newest_first(&mut items);
            updated
        };
        self.notify(&updated);
        Some(updated)
    }

    fn notify(&self, item: &NewsItem) {
        // Callbacks run without any queue lock so they may unsubscribe or publish.
        let subscribers = self.registry.lock().subscribers.clone();
        for (id, callback) in subscribers {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback(item))) {
                self.sink.subscriber_failed(id, item, &panic_message(&*payload));
            }
        }
    }
}

/// Ordered, capacity-bounded feed that re-publishes recent items to
/// subscribers at paced intervals while anyone is listening.
///
/// Cloning is cheap and every clone drives the same queue.
#[derive(Clone)]
pub struct NewsQueue {
    shared: Arc<Shared>,
}

impl NewsQueue {
    /// Queue with random pacing, the system clock, and tracing diagnostics.
    pub fn new(seed: Vec<NewsItem>, config: QueueConfig) -> Result<Self, NewsError> {
        Self::builder(seed).config(config).build()
    }

    pub fn builder(seed: Vec<NewsItem>) -> NewsQueueBuilder {
        NewsQueueBuilder {
            seed,
            config: QueueConfig::default(),
            clock: Clock::system(),
            pacing: Arc::new(RandomPacing),
            sink: Arc::new(TracingSink),
        }
    }

    pub fn config(&self) -> &QueueConfig {
        &self.shared.config
    }

    /// Up to `limit` items, newest first. `None` returns everything.
    pub fn snapshot(&self, limit: Option<usize>) -> Vec<NewsItem> {
        let items = self.shared.items.read();
        let count = limit.unwrap_or(items.len()).min(items.len());
        items[..count].to_vec()
    }

    pub fn len(&self) -> usize {
        self.shared.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.items.read().is_empty()
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.registry.lock().subscribers.len()
    }

    pub fn state(&self) -> SchedulerState {
        if self.shared.registry.lock().scheduler.is_some() {
            SchedulerState::Scheduled
        } else {
            SchedulerState::Idle
        }
    }

    /// Registers `callback` for every item published from now on.
    ///
    /// The first subscriber starts the scheduler, so this must run inside a
    /// tokio runtime.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&NewsItem) + Send + Sync + 'static,
    {
        let mut registry = self.shared.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        let callback: Callback = Arc::new(callback);
        registry.subscribers.push((id, callback));

        if registry.scheduler.is_none() {
            let generation = registry.next_generation;
            registry.next_generation += 1;
            let config = &self.shared.config;
            registry.scheduler = Some(spawn_scheduler(
                Arc::downgrade(&self.shared),
                generation,
                config.min_interval(),
                config.max_interval(),
                self.shared.pacing.clone(),
            ));
        }
        debug!(
            subscriber = id,
            total = registry.subscribers.len(),
            "news subscriber added"
        );
        drop(registry);

        Subscription::new(id, Arc::downgrade(&self.shared))
    }

    /// Inserts `item` in `published_at` order and notifies subscribers.
    ///
    /// An existing entry with the same id is replaced.
    pub fn publish(&self, item: NewsItem) {
        {
            let mut items = self.shared.items.write();
            items.retain(|existing| existing.id != item.id);
            let position =
                items.partition_point(|existing| existing.published_at >= item.published_at);
            items.insert(position, item.clone());
            items.truncate(self.shared.config.capacity);
        }
        info!(id = %item.id, "news item published");
        self.shared.notify(&item);
    }

    /// Keeps the configured `retention_count` newest items. Returns how many were dropped.
    pub fn archive(&self) -> usize {
        self.archive_to(self.shared.config.retention_count)
    }

    pub fn archive_to(&self, retention_count: usize) -> usize {
        let mut items = self.shared.items.write();
        let dropped = items.len().saturating_sub(retention_count);
        items.truncate(retention_count);
        if dropped > 0 {
            info!(dropped, kept = items.len(), "archived old news items");
        }
        dropped
    }

    /// Drops every subscriber, stops the scheduler and waits for it to exit.
    pub async fn shutdown(&self) -> Result<(), NewsError> {
        let handle = {
            let mut registry = self.shared.registry.lock();
            registry.subscribers.clear();
            registry.scheduler.take()
        };
        match handle {
            Some(handle) => handle.stop().await,
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for NewsQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsQueue")
            .field("len", &self.len())
            .field("subscribers", &self.subscriber_count())
            .field("state", &self.state())
            .finish()
    }
}

pub struct NewsQueueBuilder {
    seed: Vec<NewsItem>,
    config: QueueConfig,
    clock: Clock,
    pacing: Arc<dyn Pacing>,
    sink: Arc<dyn DiagnosticsSink>,
}

impl NewsQueueBuilder {
    #[must_use]
    pub fn config(mut self, config: QueueConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn pacing(mut self, pacing: Arc<dyn Pacing>) -> Self {
        self.pacing = pacing;
        self
    }

    #[must_use]
    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Validates the config, dedups the seed by id (first wins), orders it newest
    /// first and trims it to capacity.
    pub fn build(self) -> Result<NewsQueue, NewsError> {
        self.config.validate()?;

        let mut seen = HashSet::new();
        let mut items: Vec<NewsItem> = self
            .seed
            .into_iter()
            .filter(|item| seen.insert(item.id.clone()))
            .collect();
        sort_newest_first(&mut items);
        items.truncate(self.config.capacity);

        Ok(NewsQueue {
            shared: Arc::new(Shared {
                config: self.config,
                clock: self.clock,
                pacing: self.pacing,
                sink: self.sink,
                items: RwLock::new(items),
                registry: Mutex::new(Registry {
                    next_id: 0,
                    next_generation: 0,
                    subscribers: Vec::new(),
                    scheduler: None,
                }),
                cycle: Mutex::new(()),
            }),
        })
    }
}
