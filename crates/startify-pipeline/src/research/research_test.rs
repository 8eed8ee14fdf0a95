use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use startify_core::{builtin_investor_pool, MemoryStore, StoreError};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::PipelineError;

fn idea() -> StructuredIdea {
    StructuredIdea::new(
        "grocery",
        "rural areas",
        vec!["delivery".into(), "digital payments".into()],
        vec![],
        "smart grocery app for rural areas with delivery and digital payments",
    )
}

async fn page_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<title>Reference</title><p>Rural grocery delivery is growing.</p>"),
        )
        .mount(&server)
        .await;
    server
}

fn fetcher(server: &MockServer) -> ReferenceFetcher {
    let sources = ["one", "two", "three"]
        .iter()
        .map(|p| format!("{}/{p}", server.uri()))
        .collect();
    ReferenceFetcher::new(sources, 5, "test-agent").unwrap()
}

fn stage(cache: Arc<dyn CacheStore>, server: &MockServer) -> ResearchStage {
    ResearchStage::new(cache, fetcher(server), builtin_investor_pool().unwrap().investors)
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map_or(0, |r| r.len())
}

#[test]
fn fingerprint_is_stable_and_content_sensitive() {
    let a = fingerprint(&idea()).unwrap();
    assert_eq!(a, fingerprint(&idea()).unwrap());
    assert!(a.starts_with("research:"));
    assert_eq!(a.len(), "research:".len() + 64);

    let mut other = idea();
    other.target_audience = "students".to_string();
    assert_ne!(a, fingerprint(&other).unwrap());
}

#[test]
fn search_queries_interpolate_idea() {
    let queries = search_queries(&idea());
    assert_eq!(queries[0], "grocery app rural areas competitors");
    assert_eq!(queries[1], "grocery app market size rural areas");
    assert_eq!(queries[2], "grocery rural areas trends");
    assert_eq!(queries[3], "grocery app retention strategies");
}

#[tokio::test]
async fn second_call_is_served_from_cache_without_requests() {
    let server = page_server().await;
    let cache = Arc::new(MemoryStore::new());
    let stage = stage(cache.clone(), &server);

    let first = stage.research(&idea()).await;
    let after_first = request_count(&server).await;
    assert_eq!(after_first, 9, "three queries against three sources");

    let second = stage.research(&idea()).await;
    assert_eq!(request_count(&server).await, after_first);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    let key = fingerprint(&idea()).unwrap();
    assert!(cache.get(&key).await.unwrap().is_some());
}

#[tokio::test]
async fn computed_result_has_expected_shape() {
    let server = page_server().await;
    let stage = stage(Arc::new(MemoryStore::new()), &server);
    let result = stage.research(&idea()).await;

    assert_eq!(result.competitors.len(), 3);
    assert_eq!(result.competitors[0].name, "Reference");
    assert_eq!(result.trends, mock_trends("grocery"));
    assert!(result.summary_text.starts_with("Rural grocery delivery is growing."));
    assert!(result.summary_text.ends_with("..."));
    assert_eq!(result.key_opportunities.len(), 4);
    assert_eq!(result.key_risks.len(), 4);
    assert_eq!(result.market_insights.market_size, "$682B");
    assert_eq!(result.market_insights.growth, "15-25%");
    assert_eq!(result.investors.len(), 5);
    assert_eq!(result.investors[0].name, "Alex Kumar");
}

#[tokio::test]
async fn expired_entry_is_recomputed() {
    let server = page_server().await;
    let offset = Arc::new(AtomicI64::new(0));
    let handle = Arc::clone(&offset);
    let base: DateTime<Utc> = DateTime::parse_from_rfc3339("2026-03-01T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    let cache = Arc::new(MemoryStore::with_clock(Arc::new(move || {
        base + chrono::Duration::seconds(handle.load(Ordering::SeqCst))
    })));
    let stage = stage(cache, &server).with_ttl(Duration::from_secs(60));

    stage.research(&idea()).await;
    offset.store(59, Ordering::SeqCst);
    stage.research(&idea()).await;
    assert_eq!(request_count(&server).await, 9);

    offset.store(60, Ordering::SeqCst);
    stage.research(&idea()).await;
    assert_eq!(request_count(&server).await, 18);
}

#[tokio::test]
async fn unreachable_sources_yield_sentinel_summary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let stage = stage(Arc::new(MemoryStore::new()), &server);

    let result = stage.research(&idea()).await;
    assert!(result.competitors.is_empty());
    assert_eq!(result.summary_text, NO_SOURCES);
    assert_eq!(result.investors.len(), 5);
}

struct FailingTrends;

#[async_trait]
impl TrendProvider for FailingTrends {
    async fn interest(&self, _: &[String]) -> Result<BTreeMap<String, f64>, PipelineError> {
        Err(PipelineError::Llm("trend provider offline".to_string()))
    }
}

struct FixedTrends;

#[async_trait]
impl TrendProvider for FixedTrends {
    async fn interest(&self, keywords: &[String]) -> Result<BTreeMap<String, f64>, PipelineError> {
        Ok(keywords.iter().map(|k| (k.clone(), 90.0)).collect())
    }
}

#[tokio::test]
async fn trend_provider_failure_uses_mock_scores() {
    let server = page_server().await;
    let stage = stage(Arc::new(MemoryStore::new()), &server)
        .with_trend_provider(Arc::new(FailingTrends));
    let result = stage.research(&idea()).await;
    assert_eq!(result.trends, mock_trends("grocery"));
}

#[tokio::test]
async fn trend_provider_scores_drive_growth_band() {
    let server = page_server().await;
    let stage = stage(Arc::new(MemoryStore::new()), &server)
        .with_trend_provider(Arc::new(FixedTrends));
    let result = stage.research(&idea()).await;
    assert_eq!(result.trends.len(), 2);
    assert_eq!(result.market_insights.growth, "25-35%");
}

struct BrokenCache;

#[async_trait]
impl CacheStore for BrokenCache {
    async fn get(&self, _: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn put(&self, _: &str, _: serde_json::Value, _: Duration) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }
}

#[tokio::test]
async fn cache_failures_do_not_fail_research() {
    let server = page_server().await;
    let stage = stage(Arc::new(BrokenCache), &server);
    let result = stage.research(&idea()).await;
    assert_eq!(result.competitors.len(), 3);
}

#[tokio::test]
async fn corrupt_cache_entry_is_treated_as_miss() {
    let server = page_server().await;
    let cache = Arc::new(MemoryStore::new());
    let key = fingerprint(&idea()).unwrap();
    cache
        .put(&key, serde_json::json!({"not": "research"}), DEFAULT_TTL)
        .await
        .unwrap();

    let stage = stage(cache, &server);
    let result = stage.research(&idea()).await;
    assert_eq!(result.competitors.len(), 3);
    assert_eq!(request_count(&server).await, 9);
}
