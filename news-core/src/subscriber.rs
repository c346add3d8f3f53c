use std::any::Any;
use std::sync::{Arc, Weak};

use tracing::error;

use crate::item::NewsItem;
use crate::queue::Shared;

pub type SubscriberId = u64;

pub(crate) type Callback = Arc<dyn Fn(&NewsItem) + Send + Sync>;

/// Where subscriber failures are reported. Reports never reach the scheduler.
pub trait DiagnosticsSink: Send + Sync {
    fn subscriber_failed(&self, subscriber: SubscriberId, item: &NewsItem, reason: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn subscriber_failed(&self, subscriber: SubscriberId, item: &NewsItem, reason: &str) {
        error!(subscriber, id = %item.id, reason, "news subscriber callback panicked");
    }
}

/// Registration returned by `NewsQueue::subscribe`.
///
/// Unsubscribes on `unsubscribe()` or drop. Once either returns, the callback
/// receives nothing further beyond a delivery already underway on another thread.
///
/// The handle does not keep the queue alive, so it may be stored inside its own
/// callback without leaking the queue.
#[must_use = "dropping a Subscription unsubscribes it immediately"]
pub struct Subscription {
    id: SubscriberId,
    shared: Option<Weak<Shared>>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriberId, shared: Weak<Shared>) -> Self {
        Self {
            id,
            shared: Some(shared),
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(shared) = self.shared.take().and_then(|weak| weak.upgrade()) {
            shared.remove_subscriber(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.shared.is_some())
            .finish()
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
