//! Cache-first model invocation

use std::sync::Arc;

use async_trait::async_trait;
use mailmind_core::{InvokeError, ModelInvoker, ModelResponse};
use tokio::sync::Mutex;

use crate::error::CacheError;
use crate::fingerprint::prompt_fingerprint;
use crate::journal::PromptLog;
use crate::store::ResponseStore;

/// Runs a model only for prompts the cache has not seen.
///
/// Load, invoke, save and journal happen inside one critical section, so
/// tasks sharing a `CachedInvoker` never invoke the model twice for the same
/// prompt and never drop each other's entries. Separate processes sharing the
/// same document are not coordinated: the last writer wins.
pub struct CachedInvoker {
    store: ResponseStore<ModelResponse>,
    log: PromptLog,
    lock: Mutex<()>,
}

impl CachedInvoker {
    pub fn new(store: ResponseStore<ModelResponse>, log: PromptLog) -> Self {
        Self {
            store,
            log,
            lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &ResponseStore<ModelResponse> {
        &self.store
    }

    pub fn log(&self) -> &PromptLog {
        &self.log
    }

    /// Return the cached response for `prompt`, invoking `model` on a miss.
    ///
    /// A failed invocation is returned as [`CacheError::Invoke`] and leaves
    /// both the cache and the journal untouched.
    pub async fn cached_invoke(
        &self,
        prompt: &str,
        model: &dyn ModelInvoker,
    ) -> Result<ModelResponse, CacheError> {
        let _guard = self.lock.lock().await;
        let key = prompt_fingerprint(prompt);

        let mut cache = self.store.load()?;
        if let Some(hit) = cache.get(prompt) {
            log::info!("Cache hit: {}", key);
            return Ok(hit.clone());
        }

        log::info!("Cache miss: {}", key);
        let response = model.invoke(prompt).await?;

        cache.insert(prompt.to_string(), response.clone());
        self.store.save(&cache)?;
        self.log.append(prompt, response.text())?;
        log::info!("Cache stored: {}", key);

        Ok(response)
    }
}

/// A model whose every call goes through a [`CachedInvoker`].
pub struct CachedModel {
    cache: Arc<CachedInvoker>,
    inner: Arc<dyn ModelInvoker>,
}

impl CachedModel {
    pub fn new(cache: Arc<CachedInvoker>, inner: Arc<dyn ModelInvoker>) -> Self {
        Self { cache, inner }
    }
}

#[async_trait]
impl ModelInvoker for CachedModel {
    async fn invoke(&self, prompt: &str) -> Result<ModelResponse, InvokeError> {
        self.cache
            .cached_invoke(prompt, self.inner.as_ref())
            .await
            .map_err(InvokeError::from)
    }
}
