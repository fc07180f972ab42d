//! Prompt-keyed response cache for mailmind
//!
//! Model responses are cached by the exact prompt text so that a prompt is
//! never sent to the model twice, across process runs. Every computed
//! response is also written to a human-readable Markdown journal.

pub mod error;
pub mod fingerprint;
pub mod invoker;
pub mod journal;
pub mod store;

pub use error::CacheError;
pub use fingerprint::prompt_fingerprint;
pub use invoker::{CachedInvoker, CachedModel};
pub use journal::PromptLog;
pub use store::{CacheMap, ResponseStore, StoreStats};
