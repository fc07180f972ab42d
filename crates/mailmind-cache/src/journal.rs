//! Markdown journal of every computed prompt/response pair
//!
//! Newest entries are written at the top of the document. The journal is for
//! people reading it; nothing in mailmind reads it back.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::CacheError;
use crate::store::write_atomic;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct PromptLog {
    path: PathBuf,
}

impl PromptLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record one pair, timestamped with the local time
    pub fn append(&self, prompt: &str, response: &str) -> Result<(), CacheError> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.append_entry(&Self::format_entry(&timestamp, prompt, response))
    }

    /// Render one journal entry
    pub fn format_entry(timestamp: &str, prompt: &str, response: &str) -> String {
        format!(
            "### 🕒 {timestamp}\n\n**Prompt:**\n```\n{prompt}\n```\n\n**Response:**\n```\n{response}\n```\n\n---\n"
        )
    }

    fn append_entry(&self, entry: &str) -> Result<(), CacheError> {
        let previous = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(CacheError::io(&self.path, e)),
        };

        let mut content = String::with_capacity(entry.len() + previous.len());
        content.push_str(entry);
        content.push_str(&previous);

        write_atomic(&self.path, content.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn count_entries(content: &str) -> usize {
        content.matches("### 🕒 ").count()
    }

    #[test]
    fn test_format_entry() {
        let entry = PromptLog::format_entry("2024-05-01 09:30:00", "Summarize: hello", "Hi");
        assert_eq!(
            entry,
            "### 🕒 2024-05-01 09:30:00\n\n**Prompt:**\n```\nSummarize: hello\n```\n\n**Response:**\n```\nHi\n```\n\n---\n"
        );
    }

    #[test]
    fn test_append_creates_file_and_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log = PromptLog::new(temp_dir.path().join("logs").join("llm_log.md"));

        log.append("prompt", "response").unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(count_entries(&content), 1);
        assert!(content.contains("**Prompt:**\n```\nprompt\n```"));
        assert!(content.contains("**Response:**\n```\nresponse\n```"));
        assert!(content.ends_with("---\n"));
    }

    #[test]
    fn test_newest_entry_first() {
        let temp_dir = TempDir::new().unwrap();
        let log = PromptLog::new(temp_dir.path().join("llm_log.md"));

        log.append("first prompt", "first response").unwrap();
        log.append("second prompt", "second response").unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(count_entries(&content), 2);

        let first = content.find("first prompt").unwrap();
        let second = content.find("second prompt").unwrap();
        assert!(second < first, "newest entry should come first");
        assert!(content.starts_with("### 🕒 "));
    }

    #[test]
    fn test_existing_content_preserved_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("llm_log.md");
        let existing = "### 🕒 2023-01-01 00:00:00\n\nold entry\n\n---\n";
        fs::write(&path, existing).unwrap();

        let log = PromptLog::new(&path);
        log.append("new", "entry").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with(existing));
    }
}
