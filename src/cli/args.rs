use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Always call the model, bypassing the response cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Model passed to `ollama run`
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Print the default configuration and exit
    #[arg(long)]
    pub generate_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draft a reply to the latest message in the mailbox
    Reply,

    /// Summarize unread mail
    Summarize {
        /// Email the digest to the configured summary recipient
        #[arg(long)]
        send: bool,
    },

    /// Run a prompt through the agent
    Ask {
        prompt: String,
    },

    /// List messages matching a search query, newest first
    List {
        /// Gmail search query, e.g. `from:alice is:unread`
        #[arg(short, long)]
        query: Option<String>,

        /// Number of messages to read
        #[arg(short = 'n', long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=500))]
        count: u32,

        /// Also search spam and trash
        #[arg(long)]
        include_spam_trash: bool,
    },

    /// Show one message in full
    Show {
        /// Message id, as printed by `list`
        id: String,
    },

    /// Check that the mailbox is reachable with the configured token
    Check,

    /// Show subject and sender of a raw RFC 822 email file
    Parse {
        file: PathBuf,
    },

    /// Manage the response and summary caches
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show cache statistics
    Stats,

    /// Remove every cache entry
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
