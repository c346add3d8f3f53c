pub mod cache;
pub mod clock;
pub mod config;
pub mod corpus;
pub mod error;
pub mod item;
pub mod pipeline;
pub mod query;
pub mod queue;
pub mod retriever;
pub mod scheduler;
pub mod subscriber;

pub use cache::{FetchResult, NewsCache, Provenance, QueryResult};
pub use clock::Clock;
pub use config::{CacheConfig, PipelineConfig, QueueConfig, SourceConfig};
pub use corpus::static_corpus;
pub use error::NewsError;
pub use item::{EntityKind, Impact, NewsItem, RelatedEntity};
pub use pipeline::NewsPipeline;
pub use query::NewsQuery;
pub use queue::{NewsQueue, NewsQueueBuilder};
pub use retriever::{HttpRetriever, Retriever, StaticRetriever};
pub use scheduler::{Pacing, RandomPacing, SchedulerState};
pub use subscriber::{DiagnosticsSink, SubscriberId, Subscription, TracingSink};
