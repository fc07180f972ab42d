use anyhow::{Context, Result};

use mailmind_core::{Mailbox, MailboxProfile};

use crate::cli::commands::build_mailbox;
use crate::cli::ui::StatusPrinter;
use crate::config::MailmindConfig;

pub async fn run_check_command(config: &MailmindConfig) -> Result<()> {
    let printer = StatusPrinter::new();
    let mailbox = build_mailbox(config)?;

    let profile = check_connection(mailbox.as_ref()).await?;
    printer.success("Connected", &profile.email_address);
    printer.kv("Messages", &profile.messages_total.to_string());
    Ok(())
}

pub async fn check_connection(mailbox: &dyn Mailbox) -> Result<MailboxProfile> {
    let profile = mailbox
        .profile()
        .await
        .context("Gmail connection test failed")?;
    tracing::debug!("Mailbox profile: {:?}", profile);
    Ok(profile)
}
