use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use news_core::{
    static_corpus, CacheConfig, EntityKind, HttpRetriever, Impact, NewsCache, NewsError,
    NewsPipeline, PipelineConfig, Provenance, Retriever, SchedulerState, SourceConfig,
};
use reqwest::Client;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_json() -> String {
    r#"[
  {
    "id": "asm-variant-sellout",
    "title": "Spider-Man Variant Sells Out",
    "summary": "The 1:100 variant sold out in hours.",
    "body": "Retailers report the ratio variant sold out on day one.",
    "source": "Retailer Weekly",
    "url": "/news/asm-variant-sellout",
    "publishedAt": "2024-10-21T07:28:00Z",
    "impact": "positive",
    "relatedEntity": { "kind": "comic", "symbol": "ASM300", "displayName": "Amazing Spider-Man" },
    "keywords": ["Marvel", "Variant"]
  },
  {
    "id": "indie-printer-closure",
    "title": "Indie Printer Closes Its Doors",
    "summary": "A long-running small-press printer shut down.",
    "body": "Small publishers are scrambling for new print partners.",
    "source": "Indie Comics Journal",
    "publishedAt": "2024-10-21T08:00:00Z",
    "impact": "negative"
  }
]"#
    .to_string()
}

async fn serve(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(template)
        .mount(server)
        .await;
}

fn retriever_for(server: &MockServer) -> HttpRetriever {
    let endpoint = Url::parse(&format!("{}/news", server.uri())).unwrap();
    HttpRetriever::new(Client::new(), endpoint, Duration::from_secs(2))
}

#[tokio::test]
async fn http_retriever_decodes_and_orders_items() {
    let server = MockServer::start().await;
    serve(
        &server,
        ResponseTemplate::new(200)
            .insert_header("content-type", "application/json")
            .set_body_string(sample_json()),
    )
    .await;

    let items = retriever_for(&server).retrieve().await.unwrap();
    assert_eq!(items.len(), 2);

    // Newest first regardless of payload order.
    assert_eq!(items[0].id, "indie-printer-closure");
    assert_eq!(items[0].impact, Impact::Negative);
    assert!(items[0].keywords.is_empty());
    assert!(items[0].related_entity.is_none());

    let variant = &items[1];
    assert_eq!(
        variant.published_at,
        Utc.with_ymd_and_hms(2024, 10, 21, 7, 28, 0).unwrap()
    );
    let related = variant.related_entity.as_ref().unwrap();
    assert_eq!(related.kind, EntityKind::Comic);
    assert_eq!(related.display_name, "Amazing Spider-Man");
    assert_eq!(variant.keywords, vec!["Marvel", "Variant"]);
}

#[tokio::test]
async fn http_retriever_accepts_an_items_envelope() {
    let server = MockServer::start().await;
    let body = format!(r#"{{ "items": {} }}"#, sample_json());
    serve(&server, ResponseTemplate::new(200).set_body_string(body)).await;

    let items = retriever_for(&server).retrieve().await.unwrap();
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn http_retriever_reports_error_status() {
    let server = MockServer::start().await;
    serve(&server, ResponseTemplate::new(500)).await;

    let err = retriever_for(&server).retrieve().await.unwrap_err();
    assert!(matches!(err, NewsError::Status { status: 500, .. }));
}

#[tokio::test]
async fn http_retriever_rejects_malformed_payload() {
    let server = MockServer::start().await;
    serve(&server, ResponseTemplate::new(200).set_body_string("{ not json")).await;

    let err = retriever_for(&server).retrieve().await.unwrap_err();
    assert!(matches!(err, NewsError::Decode(_)));
}

#[tokio::test]
async fn cache_over_unavailable_endpoint_falls_back() {
    let server = MockServer::start().await;
    serve(&server, ResponseTemplate::new(503)).await;

    let cache = NewsCache::new(
        Arc::new(retriever_for(&server)),
        static_corpus(Utc::now()),
        &CacheConfig::default(),
    )
    .unwrap();

    let result = cache.fetch_items().await;
    assert_eq!(result.provenance, Provenance::Fallback);
    assert_eq!(result.items.len(), static_corpus(Utc::now()).len());
}

#[tokio::test]
async fn pipeline_from_config_uses_configured_endpoint() {
    let server = MockServer::start().await;
    serve(&server, ResponseTemplate::new(200).set_body_string(sample_json())).await;

    let config = PipelineConfig {
        source: SourceConfig {
            endpoint: Some(format!("{}/news", server.uri())),
            request_timeout_seconds: 2,
        },
        ..PipelineConfig::default()
    };
    let pipeline = NewsPipeline::from_config(&config).unwrap();

    let first = pipeline.cache().fetch_items().await;
    assert_eq!(first.provenance, Provenance::Fresh);
    assert_eq!(first.items.len(), 2);
    assert_eq!(pipeline.cache().fetch_items().await.provenance, Provenance::Cached);

    // The queue seeds from the bundled corpus, not the endpoint.
    assert_eq!(pipeline.queue().len(), static_corpus(Utc::now()).len());
    assert_eq!(pipeline.queue().state(), SchedulerState::Idle);
    pipeline.shutdown().await.unwrap();
}

#[tokio::test]
async fn default_pipeline_serves_the_bundled_corpus() {
    let pipeline = NewsPipeline::from_config(&PipelineConfig::default()).unwrap();

    let batch = pipeline.cache().fetch_items().await;
    assert_eq!(batch.provenance, Provenance::Fresh);
    assert_eq!(
        batch.items.iter().map(|i| &i.id).collect::<Vec<_>>(),
        pipeline
            .queue()
            .snapshot(None)
            .iter()
            .map(|i| &i.id)
            .collect::<Vec<_>>()
    );
}

#[test]
fn pipeline_rejects_invalid_config() {
    let mut config = PipelineConfig::default();
    config.queue.min_interval_seconds = config.queue.max_interval_seconds + 1;
    assert!(matches!(
        NewsPipeline::from_config(&config),
        Err(NewsError::InvalidConfig(_))
    ));
}
