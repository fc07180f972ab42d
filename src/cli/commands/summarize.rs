use anyhow::{Context, Result};
use chrono::Local;

use mailmind_cache::ResponseStore;
use mailmind_core::OutgoingMessage;

use crate::cli::commands::{build_mailbox, build_model};
use crate::cli::ui::{separator, StatusPrinter};
use crate::config::MailmindConfig;
use crate::digest;
use crate::summarizer::EmailSummarizer;

pub async fn run_summarize_command(config: &MailmindConfig, send: bool) -> Result<()> {
    let printer = StatusPrinter::new();
    let mailbox = build_mailbox(config)?;

    let summarizer = EmailSummarizer::new(
        mailbox.clone(),
        build_model(config),
        ResponseStore::new(config.summary_cache_path()),
    )
    .with_query(config.gmail.unread_query.clone())
    .with_max_results(config.gmail.max_results);

    let summaries = summarizer.summarize_unread().await?;
    if summaries.is_empty() {
        printer.info("Summarize", "No new unread emails");
        return Ok(());
    }

    for (subject, summary) in &summaries {
        println!("📧 {}\n{}\n{}", subject, summary, separator());
    }

    if send {
        let message = OutgoingMessage {
            to: config.gmail.summary_recipient.clone(),
            subject: digest::subject(Local::now().date_naive()),
            body: digest::email_body(&summaries),
        };
        mailbox
            .send_message(&message)
            .await
            .context("Failed to send the summary email")?;
        printer.success("Sent", &format!("summary to {}", message.to));
    }

    Ok(())
}
