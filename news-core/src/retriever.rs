use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::clock::Clock;
use crate::corpus::static_corpus;
use crate::error::NewsError;
use crate::item::{sort_newest_first, NewsItem};

/// The retrieval step behind the cache. Anything able to produce a batch of items.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self) -> Result<Vec<NewsItem>, NewsError>;
}

/// Serves the bundled corpus.
#[derive(Debug, Clone, Default)]
pub struct StaticRetriever {
    clock: Clock,
}

impl StaticRetriever {
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl Retriever for StaticRetriever {
    async fn retrieve(&self) -> Result<Vec<NewsItem>, NewsError> {
        Ok(static_corpus(self.clock.now()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    List(Vec<NewsItem>),
    Envelope { items: Vec<NewsItem> },
}

/// Fetches a JSON list of items, either a bare array or `{ "items": [...] }`.
#[derive(Debug, Clone)]
pub struct HttpRetriever {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpRetriever {
    pub fn new(client: Client, endpoint: Url, timeout: Duration) -> Self {
        Self {
            client,
            endpoint,
            timeout,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Retriever for HttpRetriever {
    async fn retrieve(&self) -> Result<Vec<NewsItem>, NewsError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NewsError::Status {
                status: response.status().as_u16(),
                url: response.url().to_string(),
            });
        }

        let bytes = response.bytes().await?;
        let mut items = match serde_json::from_slice::<Payload>(&bytes)? {
            Payload::List(items) | Payload::Envelope { items } => items,
        };
        sort_newest_first(&mut items);
        debug!(endpoint = %self.endpoint, count = items.len(), "retrieved news batch");
        Ok(items)
    }
}
