pub mod agent;
pub mod cli;
pub mod config;
pub mod digest;
pub mod prompts;
pub mod reader;
pub mod summarizer;

#[cfg(test)]
mod testing;

// Re-export core types for convenience
pub use agent::{Agent, ConfidencePolicy, Gated};
pub use mailmind_core::{InvokeError, Mailbox, MailMessage, ModelInvoker, ModelResponse};
