//! Cache management commands

use anyhow::Result;
use std::io::{self, Write};

use mailmind_cache::ResponseStore;
use mailmind_core::ModelResponse;

use crate::cli::args::CacheAction;
use crate::config::MailmindConfig;
use crate::summarizer::SummaryRecord;

/// Execute cache command
pub async fn handle_cache_command(action: &CacheAction, config: &MailmindConfig) -> Result<()> {
    let responses: ResponseStore<ModelResponse> = ResponseStore::new(config.llm_cache_path());
    let summaries: ResponseStore<SummaryRecord> = ResponseStore::new(config.summary_cache_path());

    match action {
        CacheAction::Stats => {
            println!("📊 Cache statistics");
            println!("   Directory: {}", config.cache.directory.display());
            println!("   Enabled: {}", config.cache.enabled);

            let response_stats = responses.stats()?;
            println!("\nModel responses ({}):", responses.path().display());
            println!("   Entries: {}", response_stats.total_entries);
            println!("   Size: {} bytes", response_stats.total_size_bytes);

            let summary_stats = summaries.stats()?;
            println!("\nEmail summaries ({}):", summaries.path().display());
            println!("   Entries: {}", summary_stats.total_entries);
            println!("   Size: {} bytes", summary_stats.total_size_bytes);

            if response_stats.total_entries == 0 && summary_stats.total_entries == 0 {
                println!("\n💡 Cache is empty");
            }
        }

        CacheAction::Clear { yes } => {
            println!("🗑️  Clear all cache");
            println!("   Directory: {}", config.cache.directory.display());

            // A corrupt document cannot be counted but is still removed
            let total = responses.stats().map(|s| s.total_entries).unwrap_or_default()
                + summaries.stats().map(|s| s.total_entries).unwrap_or_default();
            println!("\n⚠️  Warning: This will delete ALL {} cache entries", total);

            if !yes {
                print!("   Continue? [y/N]: ");
                io::stdout().flush()?;

                let mut input = String::new();
                io::stdin().read_line(&mut input)?;

                if !input.trim().eq_ignore_ascii_case("y") {
                    println!("   Aborted");
                    return Ok(());
                }
            }

            let removed = responses.clear()? + summaries.clear()?;
            println!("\n✅ Removed {} entries", removed);
        }
    }

    Ok(())
}
