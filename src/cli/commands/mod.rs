pub mod ask;
pub mod cache;
pub mod check;
pub mod list;
pub mod parse;
pub mod reply;
pub mod show;
pub mod summarize;

pub use ask::run_ask_command;
pub use cache::handle_cache_command;
pub use check::run_check_command;
pub use list::{run_list_command, ListOptions};
pub use parse::run_parse_command;
pub use reply::run_reply_command;
pub use show::run_show_command;
pub use summarize::run_summarize_command;

use anyhow::{anyhow, Result};
use std::sync::Arc;

use mailmind_cache::{CachedInvoker, CachedModel, PromptLog, ResponseStore};
use mailmind_core::{Mailbox, ModelInvoker};
use mailmind_gmail::GmailClient;
use mailmind_ollama::{OllamaConfig, OllamaExecutor};

use crate::agent::{Agent, ConfidencePolicy};
use crate::cli::streaming_ui::StreamingDisplay;
use crate::config::MailmindConfig;

/// Ollama executor, wrapped in the response cache unless caching is disabled
pub fn build_model(config: &MailmindConfig) -> Arc<dyn ModelInvoker> {
    let executor = OllamaExecutor::new(
        OllamaConfig::new()
            .with_runtime_path(config.model.runtime_path.clone())
            .with_model(config.model.model.clone())
            .with_timeout(config.model.timeout_secs),
    )
    .with_callback(Arc::new(StreamingDisplay::new()));

    if !config.cache.enabled {
        tracing::debug!("Response cache disabled");
        return Arc::new(executor);
    }

    let cache = CachedInvoker::new(
        ResponseStore::new(config.llm_cache_path()),
        PromptLog::new(config.log_path()),
    );
    Arc::new(CachedModel::new(Arc::new(cache), Arc::new(executor)))
}

pub fn build_agent(config: &MailmindConfig) -> Agent {
    Agent::new(
        Some(build_model(config)),
        ConfidencePolicy::new(config.model.confidence_threshold),
    )
}

pub fn build_mailbox(config: &MailmindConfig) -> Result<Arc<dyn Mailbox>> {
    let token = config.gmail.access_token.clone().ok_or_else(|| {
        anyhow!("No Gmail access token configured; set GMAIL_ACCESS_TOKEN or gmail.access_token")
    })?;
    Ok(Arc::new(GmailClient::with_base_url(
        token,
        config.gmail.api_base_url.clone(),
    )))
}
