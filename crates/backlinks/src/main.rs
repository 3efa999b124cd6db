//! Backlinks CLI
//!
//! Lists the notes that link to a note in a Markdown vault and jumps to the
//! line holding the reference.

use anyhow::Result;
use backlink_core::{BacklinkResolver, MatchStrategy};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod host;
mod vault;

use commands::Session;
use config::Config;
use vault::Vault;

#[derive(Parser)]
#[command(name = "backlinks")]
#[command(about = "Find the notes that link to a note, and jump to the reference")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Vault directory
    #[arg(long, global = true, env = "BACKLINKS_VAULT", default_value = ".")]
    vault: PathBuf,

    /// Config file (defaults to <vault>/.backlinks.toml when present)
    #[arg(long, global = true, env = "BACKLINKS_CONFIG")]
    config: Option<PathBuf>,

    /// How link targets are matched: substring or exact
    #[arg(long, global = true)]
    strategy: Option<MatchStrategy>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Do not print notices
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every backlink to a note
    List {
        /// Vault-relative path or basename of the note
        note: String,
    },
    /// Open a backlink of a note and land on the referencing line
    Open {
        /// Vault-relative path or basename of the note
        note: String,
        /// Which backlink to open, as numbered by `list`
        #[arg(long, short, default_value_t = 0)]
        index: usize,
    },
    /// Find the line in a note that links to `#<header>`
    Locate {
        /// Vault-relative path or basename of the note
        note: String,
        header: String,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "backlinks={lvl},backlink_core={lvl}",
            lvl = default_level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<String> {
    let config = Config::load(cli.config.as_deref(), &cli.vault)?;
    let strategy = cli.strategy.unwrap_or(config.strategy);
    tracing::debug!("Config: {:?}, strategy: {}", config, strategy);

    let vault = Vault::open(&cli.vault, &config.ignore).await?;
    if vault.is_empty() {
        tracing::warn!("No Markdown notes found in {:?}", vault.root());
    } else {
        tracing::debug!("Vault has {} notes", vault.len());
    }
    let session = Session {
        vault: Arc::new(vault),
        resolver: BacklinkResolver::new(strategy),
        visible_lines: config.visible_lines(),
        json: cli.json,
        quiet: cli.quiet,
    };

    match &cli.command {
        Commands::List { note } => commands::list::execute(&session, note),
        Commands::Open { note, index } => commands::open::execute(&session, note, *index).await,
        Commands::Locate { note, header } => {
            commands::locate::execute(&session, note, header).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}
