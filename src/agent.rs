//! Confidence-gated agent
//!
//! Turns a model response into the text shown to the user. Model failures
//! become an `[error: ...]` line; failures of the storage around the model
//! are returned as errors.

use std::sync::Arc;

use mailmind_core::{InvokeError, ModelInvoker, ModelResponse};

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.85;
pub const LOW_CONFIDENCE_MARKER: &str = "[Low confidence]";
pub const NO_LLM_RESPONSE: &str = "[No LLM available] Static response: 'OK, noted.'";

/// Outcome of applying a [`ConfidencePolicy`] to a response
#[derive(Debug, Clone, PartialEq)]
pub enum Gated {
    Confident(String),
    LowConfidence(String),
}

impl Gated {
    /// Text as displayed, with the marker for low-confidence output
    pub fn render(&self) -> String {
        match self {
            Gated::Confident(text) => text.clone(),
            Gated::LowConfidence(text) => format!("{} {}", LOW_CONFIDENCE_MARKER, text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidencePolicy {
    threshold: f64,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl ConfidencePolicy {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The threshold is inclusive: `confidence == threshold` is confident.
    pub fn gate(&self, response: &ModelResponse) -> Gated {
        if response.confidence() >= self.threshold {
            Gated::Confident(response.text().to_string())
        } else {
            Gated::LowConfidence(response.text().to_string())
        }
    }
}

pub struct Agent {
    model: Option<Arc<dyn ModelInvoker>>,
    policy: ConfidencePolicy,
}

impl Agent {
    pub fn new(model: Option<Arc<dyn ModelInvoker>>, policy: ConfidencePolicy) -> Self {
        Self { model, policy }
    }

    /// An agent with no model configured
    pub fn offline() -> Self {
        Self::new(None, ConfidencePolicy::default())
    }

    pub async fn run(&self, prompt: &str) -> Result<String, InvokeError> {
        let Some(model) = &self.model else {
            return Ok(NO_LLM_RESPONSE.to_string());
        };

        match model.invoke(prompt).await {
            Ok(response) => Ok(self.policy.gate(&response).render()),
            Err(e) if e.is_model_failure() => {
                tracing::warn!("Model invocation failed: {}", e);
                Ok(format!("[error: {}]", e))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    fn response(confidence: f64) -> ModelResponse {
        ModelResponse::new("Draft reply", confidence).unwrap()
    }

    struct Fixed(f64);

    #[async_trait]
    impl ModelInvoker for Fixed {
        async fn invoke(&self, _prompt: &str) -> Result<ModelResponse, InvokeError> {
            Ok(ModelResponse::new("text", self.0)?)
        }
    }

    struct Broken;

    #[async_trait]
    impl ModelInvoker for Broken {
        async fn invoke(&self, _prompt: &str) -> Result<ModelResponse, InvokeError> {
            Err(InvokeError::Timeout { timeout_secs: 300 })
        }
    }

    struct BrokenStorage;

    #[async_trait]
    impl ModelInvoker for BrokenStorage {
        async fn invoke(&self, _prompt: &str) -> Result<ModelResponse, InvokeError> {
            let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
            Err(InvokeError::Storage(Box::new(io)))
        }
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let policy = ConfidencePolicy::default();
        assert_eq!(
            policy.gate(&response(0.85)),
            Gated::Confident("Draft reply".to_string())
        );
        assert_eq!(
            policy.gate(&response(0.84999)),
            Gated::LowConfidence("Draft reply".to_string())
        );
    }

    #[test]
    fn test_gate_extremes() {
        let policy = ConfidencePolicy::default();
        assert!(matches!(policy.gate(&response(1.0)), Gated::Confident(_)));
        assert!(matches!(policy.gate(&response(0.0)), Gated::LowConfidence(_)));
    }

    #[test]
    fn test_render() {
        assert_eq!(Gated::Confident("ok".to_string()).render(), "ok");
        assert_eq!(
            Gated::LowConfidence("maybe".to_string()).render(),
            "[Low confidence] maybe"
        );
    }

    #[tokio::test]
    async fn test_agent_without_model() {
        let agent = Agent::offline();
        assert_eq!(agent.run("anything").await.unwrap(), NO_LLM_RESPONSE);
    }

    #[tokio::test]
    async fn test_agent_gates_response() {
        let agent = Agent::new(Some(Arc::new(Fixed(0.9))), ConfidencePolicy::default());
        assert_eq!(agent.run("p").await.unwrap(), "text");

        let agent = Agent::new(Some(Arc::new(Fixed(0.5))), ConfidencePolicy::default());
        assert_eq!(agent.run("p").await.unwrap(), "[Low confidence] text");
    }

    #[tokio::test]
    async fn test_agent_custom_threshold() {
        let agent = Agent::new(Some(Arc::new(Fixed(0.5))), ConfidencePolicy::new(0.5));
        assert_eq!(agent.run("p").await.unwrap(), "text");
    }

    #[tokio::test]
    async fn test_model_failure_is_displayed() {
        let agent = Agent::new(Some(Arc::new(Broken)), ConfidencePolicy::default());
        assert_eq!(
            agent.run("p").await.unwrap(),
            "[error: model timed out after 300 seconds]"
        );
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let agent = Agent::new(Some(Arc::new(BrokenStorage)), ConfidencePolicy::default());
        assert!(agent.run("p").await.is_err());
    }
}
