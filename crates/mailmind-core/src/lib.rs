//! Core types and traits for mailmind.
//!
//! The model response record, the model invocation seam and the mailbox
//! boundary live here so that the cache, executor and mailbox crates can
//! depend on them without depending on each other.

pub mod invoker;
pub mod mail;
pub mod response;

pub use invoker::{InvokeError, ModelInvoker};
pub use mail::{Mailbox, MailboxProfile, MailMessage, OutgoingMessage, NO_SUBJECT, UNKNOWN_SENDER};
pub use response::{ModelResponse, ResponseError};
