//! Ollama CLI executor with timeout and streamed output.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use mailmind_core::{InvokeError, ModelInvoker, ModelResponse};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::stream::{StreamCallback, StreamEvent};
use crate::OllamaConfig;

/// Confidence attached to every successful Ollama response.
pub const SUCCESS_CONFIDENCE: f64 = 0.9;

/// Errors that can occur during Ollama execution.
#[derive(Error, Debug)]
pub enum OllamaError {
    #[error("Failed to run Ollama process: {0}")]
    SpawnError(#[from] std::io::Error),

    #[error("Failed to read Ollama output: {0}")]
    OutputError(std::io::Error),

    #[error("Ollama timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    #[error("Ollama exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("Ollama produced no output")]
    EmptyOutput,

    #[error("Ollama binary not found at: {0}")]
    BinaryNotFound(PathBuf),
}

impl From<OllamaError> for InvokeError {
    fn from(err: OllamaError) -> Self {
        match err {
            OllamaError::Timeout { timeout_secs } => InvokeError::Timeout { timeout_secs },
            other => InvokeError::backend("ollama", other.to_string()),
        }
    }
}

/// Output from one Ollama execution.
#[derive(Debug, Clone)]
pub struct OllamaOutput {
    /// Output lines, trimmed and joined with single spaces.
    pub text: String,
    pub duration_ms: u64,
}

/// Executor for `ollama run`.
pub struct OllamaExecutor {
    runtime_path: PathBuf,
    model: String,
    timeout_secs: u64,
    working_dir: Option<PathBuf>,
    callback: Option<Arc<dyn StreamCallback>>,
}

impl OllamaExecutor {
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            runtime_path: config.runtime_path,
            model: config.model,
            timeout_secs: config.timeout_secs,
            working_dir: config.working_dir,
            callback: None,
        }
    }

    /// Receive output lines as they are produced.
    pub fn with_callback(mut self, callback: Arc<dyn StreamCallback>) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Execute a prompt and collect the full output.
    ///
    /// The child process is killed if the timeout elapses.
    pub async fn execute(&self, prompt: &str) -> Result<OllamaOutput, OllamaError> {
        let result = timeout(
            Duration::from_secs(self.timeout_secs),
            self.spawn_ollama_process(prompt),
        )
        .await
        .unwrap_or(Err(OllamaError::Timeout {
            timeout_secs: self.timeout_secs,
        }));

        if let Err(ref e) = result {
            warn!("Ollama execution failed: {}", e);
            self.emit(StreamEvent::Error(e.to_string()));
        }

        result
    }

    async fn spawn_ollama_process(&self, prompt: &str) -> Result<OllamaOutput, OllamaError> {
        let start_time = Instant::now();
        let mut cmd = Command::new(&self.runtime_path);

        cmd.arg("run").arg(&self.model).arg(prompt);

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(
            "Spawning Ollama process: {} run {}",
            self.runtime_path.display(),
            self.model
        );

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OllamaError::BinaryNotFound(self.runtime_path.clone())
            } else {
                OllamaError::SpawnError(e)
            }
        })?;

        self.emit(StreamEvent::Started {
            model: self.model.clone(),
        });

        // Drain stderr concurrently so a chatty process cannot block on a full pipe
        let stderr_task = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf).await;
                buf
            })
        });

        let mut output = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            let mut reader = BufReader::new(stdout);
            let mut buf = Vec::new();
            loop {
                buf.clear();
                let read = reader
                    .read_until(b'\n', &mut buf)
                    .await
                    .map_err(OllamaError::OutputError)?;
                if read == 0 {
                    break;
                }

                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\r', '\n']);
                self.emit(StreamEvent::Text(line.to_string()));
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    output.push(trimmed.to_string());
                }
            }
        }

        let status = child.wait().await?;
        let stderr = match stderr_task {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };

        if !status.success() {
            return Err(OllamaError::NonZeroExit {
                code: status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            });
        }

        if output.is_empty() {
            return Err(OllamaError::EmptyOutput);
        }

        let duration_ms = start_time.elapsed().as_millis() as u64;
        self.emit(StreamEvent::Complete { duration_ms });
        info!("Ollama completed in {}ms", duration_ms);

        Ok(OllamaOutput {
            text: output.join(" "),
            duration_ms,
        })
    }

    fn emit(&self, event: StreamEvent) {
        if let Some(ref callback) = self.callback {
            callback.on_event(event);
        }
    }
}

#[async_trait]
impl ModelInvoker for OllamaExecutor {
    async fn invoke(&self, prompt: &str) -> Result<ModelResponse, InvokeError> {
        let output = self.execute(prompt).await?;
        Ok(ModelResponse::new(output.text, SUCCESS_CONFIDENCE)?)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Runs `sh run <model> <prompt>` in `dir`, so `dir/run` acts as a fake
    /// ollama with `$1` = model and `$2` = prompt.
    fn fake_runtime(dir: &TempDir, script: &str, timeout_secs: u64) -> OllamaExecutor {
        std::fs::write(dir.path().join("run"), script).unwrap();
        OllamaExecutor::new(
            OllamaConfig::default()
                .with_runtime_path(PathBuf::from("sh"))
                .with_working_dir(dir.path().to_path_buf())
                .with_timeout(timeout_secs),
        )
    }

    #[derive(Default)]
    struct RecordingCallback {
        events: Mutex<Vec<StreamEvent>>,
    }

    impl StreamCallback for RecordingCallback {
        fn on_event(&self, event: StreamEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[tokio::test]
    async fn test_output_lines_are_joined() {
        let dir = TempDir::new().unwrap();
        let executor = fake_runtime(&dir, "printf 'Hello\\n   world  \\n\\n'\n", 10);

        let output = executor.execute("hi").await.unwrap();
        assert_eq!(output.text, "Hello world");
    }

    #[tokio::test]
    async fn test_invalid_utf8_output_is_replaced() {
        let dir = TempDir::new().unwrap();
        let executor = fake_runtime(&dir, "printf 'caf\\351\\r\\n'\n", 10);
        let output = executor.execute("prompt").await.unwrap();
        assert_eq!(output.text, "caf\u{FFFD}");
    }

    #[tokio::test]
    async fn test_model_and_prompt_are_passed_as_arguments() {
        let dir = TempDir::new().unwrap();
        let executor = fake_runtime(&dir, "echo \"$1\"\necho \"$2\"\n", 10);

        let output = executor.execute("Summarize: hello").await.unwrap();
        assert_eq!(output.text, "llama3 Summarize: hello");
    }

    #[tokio::test]
    async fn test_invoke_returns_response_record() {
        let dir = TempDir::new().unwrap();
        let executor = fake_runtime(&dir, "echo Hi\n", 10);

        let response = executor.invoke("prompt").await.unwrap();
        assert_eq!(response.text(), "Hi");
        assert_eq!(response.confidence(), SUCCESS_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_an_error() {
        let dir = TempDir::new().unwrap();
        let executor = fake_runtime(&dir, "echo partial\necho 'model not found' >&2\nexit 3\n", 10);

        match executor.execute("prompt").await {
            Err(OllamaError::NonZeroExit { code, stderr }) => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "model not found");
            }
            other => panic!("expected non-zero exit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_output_is_an_error() {
        let dir = TempDir::new().unwrap();
        let executor = fake_runtime(&dir, "exit 0\n", 10);

        assert!(matches!(
            executor.execute("prompt").await,
            Err(OllamaError::EmptyOutput)
        ));
    }

    #[tokio::test]
    async fn test_timeout() {
        let dir = TempDir::new().unwrap();
        let executor = fake_runtime(&dir, "sleep 5\necho late\n", 1);

        let err = executor.invoke("prompt").await.unwrap_err();
        assert!(matches!(err, InvokeError::Timeout { timeout_secs: 1 }));
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let executor = OllamaExecutor::new(
            OllamaConfig::default()
                .with_runtime_path(PathBuf::from("/nonexistent/mailmind-ollama")),
        );

        assert!(matches!(
            executor.execute("prompt").await,
            Err(OllamaError::BinaryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_stream_events() {
        let dir = TempDir::new().unwrap();
        let callback = Arc::new(RecordingCallback::default());
        let executor =
            fake_runtime(&dir, "echo one\necho two\n", 10).with_callback(callback.clone());

        executor.execute("prompt").await.unwrap();

        let events = callback.events.lock().unwrap();
        assert_eq!(
            events[0],
            StreamEvent::Started {
                model: "llama3".to_string()
            }
        );
        assert_eq!(events[1], StreamEvent::Text("one".to_string()));
        assert_eq!(events[2], StreamEvent::Text("two".to_string()));
        assert!(matches!(events[3], StreamEvent::Complete { .. }));
    }
}
