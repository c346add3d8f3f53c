use std::sync::Arc;

use reqwest::Client;
use tracing::info;

use crate::cache::NewsCache;
use crate::clock::Clock;
use crate::config::PipelineConfig;
use crate::corpus::static_corpus;
use crate::error::NewsError;
use crate::queue::NewsQueue;
use crate::retriever::{HttpRetriever, Retriever, StaticRetriever};

/// One cache and one queue, built together and handed to consumers explicitly.
///
/// The two share the item shape only. The queue is seeded once from the
/// bundled corpus and never sees the cache's refreshes.
#[derive(Debug, Clone)]
pub struct NewsPipeline {
    cache: NewsCache,
    queue: NewsQueue,
}

impl NewsPipeline {
    pub fn new(cache: NewsCache, queue: NewsQueue) -> Self {
        Self { cache, queue }
    }

    /// Builds both components from `config`, failing fast when it is invalid.
    ///
    /// With `source.endpoint` set the cache retrieves over HTTP, otherwise it
    /// serves the bundled corpus.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, NewsError> {
        config.validate()?;
        let clock = Clock::system();

        let retriever: Arc<dyn Retriever> = match config.source.endpoint_url()? {
            Some(endpoint) => {
                info!(endpoint = %endpoint, "news cache retrieving over http");
                let client = Client::builder()
                    .user_agent(concat!("news-feed/", env!("CARGO_PKG_VERSION")))
                    .build()?;
                Arc::new(HttpRetriever::new(
                    client,
                    endpoint,
                    config.source.request_timeout(),
                ))
            }
            None => Arc::new(StaticRetriever::new(clock)),
        };

        let cache = NewsCache::new(retriever, static_corpus(clock.now()), &config.cache)?;
        let queue = NewsQueue::builder(static_corpus(clock.now()))
            .config(config.queue.clone())
            .clock(clock)
            .build()?;

        Ok(Self { cache, queue })
    }

    pub fn cache(&self) -> &NewsCache {
        &self.cache
    }

    pub fn queue(&self) -> &NewsQueue {
        &self.queue
    }

    pub async fn shutdown(&self) -> Result<(), NewsError> {
        self.queue.shutdown().await
    }
}
