//! Gmail mailbox for mailmind.
//!
//! Talks to the Gmail REST API with a bearer access token. Obtaining and
//! refreshing that token is left to the caller.

mod client;
mod message;

pub use client::{GmailClient, GmailError, DEFAULT_BASE_URL};
pub use message::{build_mime, parse_raw_message, ParsedMessage};
