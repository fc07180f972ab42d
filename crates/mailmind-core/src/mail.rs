//! Mailbox boundary.
//!
//! The assistant only needs to list message ids, fetch one message, send
//! a plain-text message and read the account profile. Everything
//! provider-specific stays behind [`Mailbox`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const NO_SUBJECT: &str = "(No Subject)";
pub const UNKNOWN_SENDER: &str = "(Unknown)";

/// A fetched message, normalized to what prompts are built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailMessage {
    pub id: String,
    pub thread_id: Option<String>,
    pub subject: String,
    pub sender: String,
    /// Short provider-generated preview.
    pub snippet: String,
    /// Plain-text body; HTML-only messages are reduced to text.
    pub body: String,
    pub labels: Vec<String>,
}

impl MailMessage {
    pub fn is_unread(&self) -> bool {
        self.labels.iter().any(|l| l == "UNREAD")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Account information used to check that the mailbox is reachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailboxProfile {
    pub email_address: String,
    pub messages_total: u64,
}

#[async_trait]
pub trait Mailbox: Send + Sync {
    /// Message ids matching `query` (provider search syntax), newest first.
    async fn list_messages(&self, query: Option<&str>, max_results: u32) -> anyhow::Result<Vec<String>>;

    async fn fetch_message(&self, id: &str) -> anyhow::Result<MailMessage>;

    async fn send_message(&self, message: &OutgoingMessage) -> anyhow::Result<()>;

    async fn profile(&self) -> anyhow::Result<MailboxProfile>;

    /// The most recent message in the mailbox, if any.
    async fn latest_message(&self) -> anyhow::Result<Option<MailMessage>> {
        match self.list_messages(None, 1).await?.first() {
            Some(id) => Ok(Some(self.fetch_message(id).await?)),
            None => Ok(None),
        }
    }
}
