use anyhow::{Context, Result};

use crate::cli::commands::{build_agent, build_mailbox};
use crate::cli::ui::StatusPrinter;
use crate::config::MailmindConfig;
use crate::prompts::reply_prompt;

pub async fn run_reply_command(config: &MailmindConfig) -> Result<()> {
    let printer = StatusPrinter::new();
    let mailbox = build_mailbox(config)?;

    let Some(message) = mailbox
        .latest_message()
        .await
        .context("Failed to fetch the latest message")?
    else {
        printer.warning("Empty", "No messages found");
        return Ok(());
    };

    printer.info("Replying", &format!("{} ({})", message.subject, message.sender));

    let agent = build_agent(config);
    let draft = agent.run(&reply_prompt(&message)).await?;

    println!("✉️ Draft reply:\n{}", draft);
    Ok(())
}
