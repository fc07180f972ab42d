use anyhow::{anyhow, Context, Result};
use std::path::Path;

use mailmind_gmail::parse_raw_message;

pub fn run_parse_command(file: &Path) -> Result<()> {
    let raw = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let parsed = parse_raw_message(&raw)
        .ok_or_else(|| anyhow!("{} is not an RFC 822 message", file.display()))?;

    println!("Subject: {}", parsed.subject);
    println!("From: {}", parsed.sender);
    Ok(())
}
