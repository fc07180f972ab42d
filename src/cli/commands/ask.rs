use anyhow::Result;

use crate::cli::commands::build_agent;
use crate::config::MailmindConfig;

pub async fn run_ask_command(config: &MailmindConfig, prompt: &str) -> Result<()> {
    let agent = build_agent(config);
    let output = agent.run(prompt).await?;
    println!("{}", output);
    Ok(())
}
