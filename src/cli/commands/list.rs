use anyhow::{Context, Result};

use mailmind_core::{Mailbox, MailMessage};

use crate::cli::commands::build_mailbox;
use crate::cli::ui::StatusPrinter;
use crate::config::MailmindConfig;
use crate::reader::{content_preview, email_query, read_emails, PREVIEW_CHARS};

pub struct ListOptions<'a> {
    pub query: Option<&'a str>,
    pub count: u32,
    pub include_spam_trash: bool,
}

pub async fn run_list_command(config: &MailmindConfig, options: ListOptions<'_>) -> Result<()> {
    let printer = StatusPrinter::new();
    let mailbox = build_mailbox(config)?;

    let messages = list_emails(mailbox.as_ref(), &options).await?;
    if messages.is_empty() {
        printer.info("List", "No messages found");
        return Ok(());
    }

    print!("{}", render_listing(&messages));
    printer.success("Listed", &format!("{} messages", messages.len()));
    Ok(())
}

pub async fn list_emails(mailbox: &dyn Mailbox, options: &ListOptions<'_>) -> Result<Vec<MailMessage>> {
    let query = email_query(options.query, options.include_spam_trash);
    read_emails(mailbox, query.as_deref(), options.count)
        .await
        .context("Failed to list messages")
}

pub fn render_listing(messages: &[MailMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        let unread = if message.is_unread() { " [unread]" } else { "" };
        out.push_str(&format!("📧 {}{}\n", message.subject, unread));
        out.push_str(&format!("   From: {}\n", message.sender));
        out.push_str(&format!("   ID: {}\n", message.id));
        if !message.body.is_empty() {
            out.push_str(&format!("   {}\n", content_preview(&message.body, PREVIEW_CHARS)));
        }
        out.push('\n');
    }
    out
}
