//! RFC 822 parsing and composition.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mail_parser::MessageParser;

use mailmind_core::{OutgoingMessage, NO_SUBJECT, UNKNOWN_SENDER};

/// Subject, sender and text body of a raw message.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMessage {
    pub subject: String,
    pub sender: String,
    pub body: String,
}

/// Parse a raw RFC 822 message.
///
/// Returns `None` when the bytes are not a message at all. The body is the
/// first text part. mail-parser converts HTML-only messages to text.
pub fn parse_raw_message(raw: &[u8]) -> Option<ParsedMessage> {
    let message = MessageParser::default().parse(raw)?;

    let subject = message
        .subject()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NO_SUBJECT.to_string());

    let sender = message
        .from()
        .and_then(|from| from.first())
        .and_then(|addr| match (addr.name(), addr.address()) {
            (Some(name), Some(address)) => Some(format!("{} <{}>", name, address)),
            (None, Some(address)) => Some(address.to_string()),
            (Some(name), None) => Some(name.to_string()),
            (None, None) => None,
        })
        .unwrap_or_else(|| UNKNOWN_SENDER.to_string());

    let body = message
        .body_text(0)
        .map(|text| text.trim().to_string())
        .unwrap_or_default();

    Some(ParsedMessage {
        subject,
        sender,
        body,
    })
}

/// Render a plain-text UTF-8 message.
pub fn build_mime(message: &OutgoingMessage) -> String {
    format!(
        "To: {}\r\nFrom: me\r\nSubject: {}\r\nMIME-Version: 1.0\r\nContent-Type: text/plain; charset=\"UTF-8\"\r\nContent-Transfer-Encoding: 8bit\r\n\r\n{}",
        message.to,
        encode_header(&message.subject),
        message.body
    )
}

/// RFC 2047 encoded-word for non-ASCII header values.
fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value.as_bytes()))
    }
}
