//! Ollama CLI integration for mailmind.
//!
//! Runs a local model through `ollama run <model> <prompt>`, streaming its
//! output line by line and bounding every call with a timeout.

mod executor;
mod stream;

pub use executor::{OllamaError, OllamaExecutor, OllamaOutput, SUCCESS_CONFIDENCE};
pub use stream::{StreamCallback, StreamEvent};

use std::path::PathBuf;

/// Configuration for the Ollama executor.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Path to the ollama binary (defaults to "ollama" in PATH).
    pub runtime_path: PathBuf,
    /// Model identifier passed to `ollama run`.
    pub model: String,
    /// Timeout in seconds for each invocation.
    pub timeout_secs: u64,
    /// Working directory for the child process (inherited when unset).
    pub working_dir: Option<PathBuf>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            runtime_path: PathBuf::from("ollama"),
            model: "llama3".to_string(),
            timeout_secs: 300,
            working_dir: None,
        }
    }
}

impl OllamaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_runtime_path(mut self, path: PathBuf) -> Self {
        self.runtime_path = path;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the timeout in seconds (at least one second).
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs.max(1);
        self
    }

    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }
}
