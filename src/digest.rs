//! Daily summary email composition

use chrono::NaiveDate;

/// One summarized message: `(subject, summary)`.
pub type Summary = (String, String);

pub fn email_body(summaries: &[Summary]) -> String {
    summaries
        .iter()
        .map(|(subject, summary)| format!("🧾 *{}*\n{}\n", subject, summary))
        .collect::<Vec<_>>()
        .join("\n---\n\n")
}

pub fn subject(date: NaiveDate) -> String {
    format!("📬 Daily Email Summary – {}", date.format("%Y-%m-%d"))
}
