//! In-memory mailbox shared by unit tests.

use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use mailmind_core::{Mailbox, MailboxProfile, MailMessage, OutgoingMessage};

pub fn message(id: &str) -> MailMessage {
    MailMessage {
        id: id.to_string(),
        thread_id: Some(format!("t-{}", id)),
        subject: format!("Subject {}", id),
        sender: "Alice <alice@example.com>".to_string(),
        snippet: format!("snippet {}", id),
        body: format!("Body of {}", id),
        labels: vec!["INBOX".to_string(), "UNREAD".to_string()],
    }
}

#[derive(Default)]
pub struct MemoryMailbox {
    messages: Vec<MailMessage>,
    /// Ids listed after the stored messages that cannot be fetched
    missing: Vec<String>,
    queries: Mutex<Vec<Option<String>>>,
    profile_error: Option<String>,
}

impl MemoryMailbox {
    pub fn new(messages: Vec<MailMessage>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    pub fn with_listed_id(mut self, id: &str) -> Self {
        self.missing.push(id.to_string());
        self
    }

    pub fn with_profile_error(mut self, error: &str) -> Self {
        self.profile_error = Some(error.to_string());
        self
    }

    pub fn queries(&self) -> Vec<Option<String>> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailbox for MemoryMailbox {
    async fn list_messages(&self, query: Option<&str>, max_results: u32) -> Result<Vec<String>> {
        self.queries.lock().unwrap().push(query.map(str::to_string));
        Ok(self
            .messages
            .iter()
            .map(|m| m.id.clone())
            .chain(self.missing.iter().cloned())
            .take(max_results as usize)
            .collect())
    }

    async fn fetch_message(&self, id: &str) -> Result<MailMessage> {
        self.messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| anyhow!("Gmail API returned 404: message {} not found", id))
    }

    async fn send_message(&self, _message: &OutgoingMessage) -> Result<()> {
        Ok(())
    }

    async fn profile(&self) -> Result<MailboxProfile> {
        if let Some(error) = &self.profile_error {
            return Err(anyhow!("{}", error));
        }
        Ok(MailboxProfile {
            email_address: "me@example.com".to_string(),
            messages_total: self.messages.len() as u64,
        })
    }
}
