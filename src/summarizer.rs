//! Unread-mail summarizer backed by a per-message summary cache

use std::sync::Arc;

use anyhow::Result;
use mailmind_cache::ResponseStore;
use mailmind_core::{Mailbox, ModelInvoker};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::digest::Summary;
use crate::prompts::summary_prompt;

/// What the summary cache remembers about a message, keyed by message id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub subject: String,
    pub summary: String,
}

pub struct EmailSummarizer {
    mailbox: Arc<dyn Mailbox>,
    model: Arc<dyn ModelInvoker>,
    store: ResponseStore<SummaryRecord>,
    query: String,
    max_results: u32,
}

impl EmailSummarizer {
    pub fn new(
        mailbox: Arc<dyn Mailbox>,
        model: Arc<dyn ModelInvoker>,
        store: ResponseStore<SummaryRecord>,
    ) -> Self {
        Self {
            mailbox,
            model,
            store,
            query: "is:unread".to_string(),
            max_results: 10,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// Summarize unread messages that have not been summarized before.
    ///
    /// Returns summaries for newly processed messages only. A message whose
    /// model call fails is skipped and not recorded, so the next run retries it.
    pub async fn summarize_unread(&self) -> Result<Vec<Summary>> {
        let mut cache = self.store.load()?;
        let ids = self
            .mailbox
            .list_messages(Some(&self.query), self.max_results)
            .await?;
        info!("Found {} unread message(s)", ids.len());

        let mut summaries = Vec::new();
        for id in ids {
            if cache.contains_key(&id) {
                debug!("Message {} already summarized", id);
                continue;
            }

            let message = self.mailbox.fetch_message(&id).await?;
            let response = match self.model.invoke(&summary_prompt(&message)).await {
                Ok(response) => response,
                Err(e) if e.is_model_failure() => {
                    warn!("Skipping message {}: {}", id, e);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let summary = response.into_text();
            cache.insert(
                id,
                SummaryRecord {
                    subject: message.subject.clone(),
                    summary: summary.clone(),
                },
            );
            self.store.save(&cache)?;
            summaries.push((message.subject, summary));
        }

        Ok(summaries)
    }
}
