//! Gmail REST v1 client.

use async_trait::async_trait;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use mailmind_core::{Mailbox, MailboxProfile, MailMessage, OutgoingMessage};

use crate::message::{build_mime, parse_raw_message};

pub const DEFAULT_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

#[derive(Error, Debug)]
pub enum GmailError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gmail API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode message {id}: {reason}")]
    Decode { id: String, reason: String },
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

/// `messages.get` with `format=raw`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawMessageResponse {
    id: String,
    #[serde(default)]
    thread_id: Option<String>,
    #[serde(default)]
    label_ids: Vec<String>,
    #[serde(default)]
    snippet: String,
    raw: String,
}

/// `users.getProfile`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    email_address: String,
    #[serde(default)]
    messages_total: u64,
}

impl From<ProfileResponse> for MailboxProfile {
    fn from(profile: ProfileResponse) -> Self {
        Self {
            email_address: profile.email_address,
            messages_total: profile.messages_total,
        }
    }
}

pub struct GmailClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl GmailClient {
    pub fn with_base_url(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, GmailError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GmailError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    pub async fn list(&self, query: Option<&str>, max_results: u32) -> Result<Vec<String>, GmailError> {
        let mut params = vec![("maxResults", max_results.to_string())];
        if let Some(q) = query {
            params.push(("q", q.to_string()));
        }

        let list: ListResponse = self.get_json("messages", &params).await?;
        Ok(list.messages.into_iter().map(|m| m.id).collect())
    }

    pub async fn get(&self, id: &str) -> Result<MailMessage, GmailError> {
        let raw: RawMessageResponse = self
            .get_json(&format!("messages/{}", id), &[("format", "raw".to_string())])
            .await?;
        let message = decode_raw_response(raw)?;
        debug!("Fetched message {}: {}", message.id, message.subject);
        Ok(message)
    }

    pub async fn profile(&self) -> Result<MailboxProfile, GmailError> {
        let profile: ProfileResponse = self.get_json("profile", &[]).await?;
        Ok(profile.into())
    }

    pub async fn send(&self, message: &OutgoingMessage) -> Result<(), GmailError> {
        let raw = URL_SAFE.encode(build_mime(message).as_bytes());
        let url = format!("{}/messages/send", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({ "raw": raw }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GmailError::Api {
                status: status.as_u16(),
                message,
            });
        }

        info!("Sent message to {}", message.to);
        Ok(())
    }
}

/// Turn a `format=raw` response into a [`MailMessage`].
pub(crate) fn decode_raw_response(response: RawMessageResponse) -> Result<MailMessage, GmailError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(response.raw.trim_end_matches('='))
        .map_err(|e| GmailError::Decode {
            id: response.id.clone(),
            reason: e.to_string(),
        })?;

    let parsed = parse_raw_message(&bytes).ok_or_else(|| GmailError::Decode {
        id: response.id.clone(),
        reason: "not an RFC 822 message".to_string(),
    })?;

    Ok(MailMessage {
        id: response.id,
        thread_id: response.thread_id,
        subject: parsed.subject,
        sender: parsed.sender,
        snippet: response.snippet,
        body: parsed.body,
        labels: response.label_ids,
    })
}

#[async_trait]
impl Mailbox for GmailClient {
    async fn list_messages(&self, query: Option<&str>, max_results: u32) -> anyhow::Result<Vec<String>> {
        Ok(self.list(query, max_results).await?)
    }

    async fn fetch_message(&self, id: &str) -> anyhow::Result<MailMessage> {
        Ok(self.get(id).await?)
    }

    async fn send_message(&self, message: &OutgoingMessage) -> anyhow::Result<()> {
        Ok(self.send(message).await?)
    }

    async fn profile(&self) -> anyhow::Result<MailboxProfile> {
        Ok(GmailClient::profile(self).await?)
    }
}
