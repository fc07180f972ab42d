//! The model invocation seam.

use async_trait::async_trait;
use thiserror::Error;

use crate::response::{ModelResponse, ResponseError};

/// Why a model invocation did not produce a response.
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("{backend} failed: {message}")]
    Backend { backend: String, message: String },

    #[error("model timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    #[error("invalid model response: {0}")]
    InvalidResponse(#[from] ResponseError),

    /// The layer in front of the model (the response cache) failed.
    #[error("response storage failed: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl InvokeError {
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// True when the model itself failed, as opposed to the storage around it.
    pub fn is_model_failure(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

/// Anything that turns a prompt into a [`ModelResponse`].
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<ModelResponse, InvokeError>;
}
