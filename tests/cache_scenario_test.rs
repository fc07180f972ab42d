use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mailmind::agent::{Agent, ConfidencePolicy};
use mailmind::{InvokeError, ModelInvoker, ModelResponse};
use mailmind_cache::{CachedInvoker, CachedModel, PromptLog, ResponseStore};
use tempfile::TempDir;

/// Adapter returning a fixed record and counting its calls
struct FixedModel {
    text: &'static str,
    confidence: f64,
    calls: AtomicUsize,
}

impl FixedModel {
    fn new(text: &'static str, confidence: f64) -> Arc<Self> {
        Arc::new(Self {
            text,
            confidence,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ModelInvoker for FixedModel {
    async fn invoke(&self, _prompt: &str) -> Result<ModelResponse, InvokeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ModelResponse::new(self.text, self.confidence)?)
    }
}

fn cache_in(dir: &TempDir) -> Arc<CachedInvoker> {
    Arc::new(CachedInvoker::new(
        ResponseStore::new(dir.path().join("cache").join("llm_cache.json")),
        PromptLog::new(dir.path().join("logs").join("llm_log.md")),
    ))
}

fn log_entries(dir: &TempDir) -> usize {
    fs::read_to_string(dir.path().join("logs").join("llm_log.md"))
        .map(|content| content.matches("### 🕒 ").count())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_second_run_is_served_from_cache() {
    let dir = TempDir::new().unwrap();

    let first = FixedModel::new("Hi", 0.9);
    let response = cache_in(&dir)
        .cached_invoke("Summarize: hello", first.as_ref())
        .await
        .unwrap();
    assert_eq!(response, ModelResponse::new("Hi", 0.9).unwrap());
    assert_eq!(log_entries(&dir), 1);

    // A later run with a different adapter still gets the stored record
    let different = FixedModel::new("DIFFERENT", 0.1);
    let response = cache_in(&dir)
        .cached_invoke("Summarize: hello", different.as_ref())
        .await
        .unwrap();

    assert_eq!(response, ModelResponse::new("Hi", 0.9).unwrap());
    assert_eq!(different.calls.load(Ordering::SeqCst), 0);
    assert_eq!(log_entries(&dir), 1);
}

#[tokio::test]
async fn test_cache_document_is_pretty_json_keyed_by_prompt() {
    let dir = TempDir::new().unwrap();
    let model = FixedModel::new("Hi", 0.9);
    cache_in(&dir)
        .cached_invoke("Summarize: hello", model.as_ref())
        .await
        .unwrap();

    let content = fs::read_to_string(dir.path().join("cache").join("llm_cache.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "Summarize: hello": { "text": "Hi", "confidence": 0.9 } })
    );
    assert!(content.contains('\n'));
}

#[tokio::test]
async fn test_agent_over_cached_model() {
    let dir = TempDir::new().unwrap();
    let cache = cache_in(&dir);

    let low = FixedModel::new("Maybe", 0.5);
    let agent = Agent::new(
        Some(Arc::new(CachedModel::new(Arc::clone(&cache), low.clone()))),
        ConfidencePolicy::default(),
    );
    assert_eq!(agent.run("Draft reply").await.unwrap(), "[Low confidence] Maybe");

    // The cached record is gated again under the new threshold
    let agent = Agent::new(
        Some(Arc::new(CachedModel::new(cache, FixedModel::new("unused", 1.0)))),
        ConfidencePolicy::new(0.5),
    );
    assert_eq!(agent.run("Draft reply").await.unwrap(), "Maybe");
    assert_eq!(low.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_corrupt_cache_surfaces_as_error() {
    let dir = TempDir::new().unwrap();
    let cache = cache_in(&dir);
    fs::create_dir_all(dir.path().join("cache")).unwrap();
    fs::write(dir.path().join("cache").join("llm_cache.json"), "not json").unwrap();

    let model = FixedModel::new("Hi", 0.9);
    let agent = Agent::new(
        Some(Arc::new(CachedModel::new(cache, model.clone()))),
        ConfidencePolicy::default(),
    );

    let err = agent.run("Summarize: hello").await.unwrap_err();
    assert!(err.to_string().contains("llm_cache.json"));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}
