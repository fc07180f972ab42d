//! Reading mail outside the summary flow: listing, previews and lookups.

use anyhow::Result;
use mailmind_core::{Mailbox, MailMessage};
use tracing::{debug, info, warn};

/// Characters of body text shown in a listing.
pub const PREVIEW_CHARS: usize = 500;

const EXCLUDE_SPAM_TRASH: &str = "-in:spam -in:trash";

/// Search query sent to the mailbox. Spam and trash are excluded unless asked for.
pub fn email_query(query: Option<&str>, include_spam_trash: bool) -> Option<String> {
    let query = query.map(str::trim).filter(|q| !q.is_empty());
    match (query, include_spam_trash) {
        (Some(q), true) => Some(q.to_string()),
        (None, true) => None,
        (Some(q), false) => Some(format!("{} {}", q, EXCLUDE_SPAM_TRASH)),
        (None, false) => Some(EXCLUDE_SPAM_TRASH.to_string()),
    }
}

/// Fetch up to `count` messages matching `query`, newest first.
///
/// A message that fails to fetch is logged and left out.
pub async fn read_emails(
    mailbox: &dyn Mailbox,
    query: Option<&str>,
    count: u32,
) -> Result<Vec<MailMessage>> {
    info!("Reading {} emails with query: {:?}", count, query);
    let ids = mailbox.list_messages(query, count).await?;

    let mut messages = Vec::with_capacity(ids.len());
    for id in ids {
        match mailbox.fetch_message(&id).await {
            Ok(message) => {
                debug!("Read email {}: {}", id, message.subject);
                messages.push(message);
            }
            Err(e) => warn!("Error reading email {}: {:#}", id, e),
        }
    }

    info!("Read {} emails", messages.len());
    Ok(messages)
}

/// The first `max_chars` characters of `body`, with `...` when cut.
pub fn content_preview(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}
