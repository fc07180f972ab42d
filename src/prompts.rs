//! Prompt templates
//!
//! Prompts are cache keys, so any change here invalidates every cached
//! response built from the old wording.

use mailmind_core::MailMessage;

pub fn summary_prompt(message: &MailMessage) -> String {
    format!(
        "Summarize this email clearly in 1 sentence, then extract 3 keywords:\nFrom: {}\nSubject: {}\n\n{}",
        message.sender, message.subject, message.snippet
    )
}

pub fn reply_prompt(message: &MailMessage) -> String {
    format!(
        "Write a professional reply to this email from {} with subject '{}':\n\n{}",
        message.sender, message.subject, message.body
    )
}
