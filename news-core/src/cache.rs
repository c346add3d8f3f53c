use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::CacheConfig;
use crate::error::NewsError;
use crate::item::NewsItem;
use crate::query::NewsQuery;
use crate::retriever::Retriever;

/// Where a batch handed out by the cache came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Fresh,
    Cached,
    Fallback,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Fresh => write!(f, "fresh"),
            Provenance::Cached => write!(f, "cached"),
            Provenance::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Shared with the cache entry. Treat as read-only.
    pub items: Arc<Vec<NewsItem>>,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub items: Vec<NewsItem>,
    pub provenance: Provenance,
}

#[derive(Debug)]
struct CacheEntry {
    items: Arc<Vec<NewsItem>>,
    fetched_at: Instant,
}

/// TTL cache in front of a [`Retriever`]. Always answers.
///
/// The entry lock is held across retrieval, so callers racing past an expired
/// TTL share one retrieval: the first refreshes, the rest see its entry.
#[derive(Clone)]
pub struct NewsCache {
    retriever: Arc<dyn Retriever>,
    fallback: Arc<Vec<NewsItem>>,
    ttl: Duration,
    entry: Arc<Mutex<Option<CacheEntry>>>,
}

impl NewsCache {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        fallback: Vec<NewsItem>,
        config: &CacheConfig,
    ) -> Result<Self, NewsError> {
        config.validate()?;
        if fallback.is_empty() {
            return Err(NewsError::config("fallback corpus must not be empty"));
        }
        Ok(Self {
            retriever,
            fallback: Arc::new(fallback),
            ttl: config.ttl(),
            entry: Arc::new(Mutex::new(None)),
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn fetch_items(&self) -> FetchResult {
        let mut entry = self.entry.lock().await;

        if let Some(current) = entry.as_ref() {
            if current.fetched_at.elapsed() < self.ttl {
                debug!("serving cached news batch");
                return FetchResult {
                    items: current.items.clone(),
                    provenance: Provenance::Cached,
                };
            }
        }

        match self.retrieve().await {
            Ok(items) => {
                let items = Arc::new(items);
                *entry = Some(CacheEntry {
                    items: items.clone(),
                    fetched_at: Instant::now(),
                });
                info!(count = items.len(), "news cache refreshed");
                FetchResult {
                    items,
                    provenance: Provenance::Fresh,
                }
            }
            Err(e) => match entry.as_ref() {
                Some(stale) => {
                    warn!(error = %e, "retrieval failed, serving stale cached batch");
                    FetchResult {
                        items: stale.items.clone(),
                        provenance: Provenance::Fallback,
                    }
                }
                None => {
                    warn!(error = %e, "retrieval failed with empty cache, serving bundled corpus");
                    FetchResult {
                        items: self.fallback.clone(),
                        provenance: Provenance::Fallback,
                    }
                }
            },
        }
    }

    async fn retrieve(&self) -> Result<Vec<NewsItem>, NewsError> {
        let items = self.retriever.retrieve().await?;
        if items.is_empty() {
            return Err(NewsError::EmptyBatch);
        }
        Ok(items)
    }

    /// Drops the cached batch so the next fetch retrieves again.
    pub async fn invalidate(&self) {
        let mut entry = self.entry.lock().await;
        *entry = None;
        info!("news cache invalidated");
    }

    pub async fn fetch_query(&self, query: &NewsQuery) -> QueryResult {
        let FetchResult { items, provenance } = self.fetch_items().await;
        QueryResult {
            items: query.apply(&items),
            provenance,
        }
    }

    pub async fn latest(&self, count: usize) -> QueryResult {
        self.fetch_query(&NewsQuery::new().limit(count)).await
    }

    pub async fn find(&self, id: &str) -> Option<NewsItem> {
        let FetchResult { items, .. } = self.fetch_items().await;
        items.iter().find(|item| item.id == id).cloned()
    }
}

impl fmt::Debug for NewsCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsCache")
            .field("ttl", &self.ttl)
            .field("fallback_len", &self.fallback.len())
            .finish_non_exhaustive()
    }
}
