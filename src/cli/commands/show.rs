use anyhow::{Context, Result};

use mailmind_core::{Mailbox, MailMessage};

use crate::cli::commands::build_mailbox;
use crate::config::MailmindConfig;

pub async fn run_show_command(config: &MailmindConfig, id: &str) -> Result<()> {
    let mailbox = build_mailbox(config)?;
    let message = fetch_email(mailbox.as_ref(), id).await?;
    print!("{}", render_message(&message));
    Ok(())
}

pub async fn fetch_email(mailbox: &dyn Mailbox, id: &str) -> Result<MailMessage> {
    mailbox
        .fetch_message(id)
        .await
        .with_context(|| format!("Failed to fetch message {}", id))
}

/// Headers followed by the full text body.
pub fn render_message(message: &MailMessage) -> String {
    let mut out = String::new();
    out.push_str(&format!("ID: {}\n", message.id));
    if let Some(thread_id) = &message.thread_id {
        out.push_str(&format!("Thread: {}\n", thread_id));
    }
    out.push_str(&format!("Subject: {}\n", message.subject));
    out.push_str(&format!("From: {}\n", message.sender));
    if !message.labels.is_empty() {
        out.push_str(&format!("Labels: {}\n", message.labels.join(", ")));
    }
    out.push_str(&format!("Unread: {}\n", if message.is_unread() { "yes" } else { "no" }));
    out.push('\n');

    let body = if message.body.is_empty() {
        &message.snippet
    } else {
        &message.body
    };
    out.push_str(body);
    out.push('\n');
    out
}
