//! Short prompt digests for log lines.
//!
//! Prompts carry mail content, so log records identify them by digest
//! instead of text. Cache keys themselves stay the verbatim prompt.

use sha2::{Digest, Sha256};

/// First 8 hex characters of the SHA-256 digest of `prompt`.
pub fn prompt_fingerprint(prompt: &str) -> String {
    let digest = Sha256::digest(prompt.as_bytes());
    let hex = format!("{:x}", digest);
    hex[..8].to_string()
}
