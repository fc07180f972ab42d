use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Args, Commands};
use crate::cli::commands::{
    handle_cache_command, run_ask_command, run_check_command, run_list_command,
    run_parse_command, run_reply_command, run_show_command, run_summarize_command, ListOptions,
};
use crate::config::MailmindConfig;

pub struct RootCommand;

impl RootCommand {
    pub async fn execute() -> Result<()> {
        let args = Args::parse();
        init_tracing(args.verbosity);

        if args.generate_config {
            println!("{}", MailmindConfig::generate_default_config());
            return Ok(());
        }

        let Some(command) = &args.command else {
            Args::command().print_help()?;
            return Ok(());
        };

        let env_vars: HashMap<String, String> = std::env::vars().collect();
        let mut config = MailmindConfig::load_with_precedence(args.config.as_deref(), &env_vars)
            .context("Failed to load configuration")?;
        config.apply_cli_overrides(args.model.as_deref(), args.no_cache);
        config.validate()?;

        match command {
            Commands::Reply => run_reply_command(&config).await,
            Commands::Summarize { send } => run_summarize_command(&config, *send).await,
            Commands::Ask { prompt } => run_ask_command(&config, prompt).await,
            Commands::List {
                query,
                count,
                include_spam_trash,
            } => {
                let options = ListOptions {
                    query: query.as_deref(),
                    count: *count,
                    include_spam_trash: *include_spam_trash,
                };
                run_list_command(&config, options).await
            }
            Commands::Show { id } => run_show_command(&config, id).await,
            Commands::Check => run_check_command(&config).await,
            Commands::Parse { file } => run_parse_command(file),
            Commands::Cache { action } => handle_cache_command(action, &config).await,
        }
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises the default level to debug.
/// Records from the `log` facade are bridged into the same subscriber.
fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
