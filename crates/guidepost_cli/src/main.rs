//! Guidepost CLI - backups of a Zendesk Guide help center.

mod commands;
mod config;
mod progress;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::Term;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::commands::search::OutputFormat;

#[derive(Parser)]
#[command(name = "guidepost")]
#[command(version)]
#[command(about = "Backups of a Zendesk Guide help center")]
#[command(
    long_about = "Guidepost retrieves the articles, sections, categories and attachments of a \
Zendesk Guide help center, across one or all locales, and stores them as a single JSON backup."
)]
#[command(after_long_help = r#"EXAMPLES
    Back up the default locale:
        $ guidepost backup --subdomain acme

    Back up every locale with sections and categories:
        $ guidepost backup --all-locales --sideload

    Print the retrieved content instead of storing it:
        $ guidepost retrieve --locale es > es.json

    Search articles:
        $ guidepost search "reset password" --locale en-us

    Generate shell completions:
        $ guidepost completions bash > ~/.local/share/bash-completion/completions/guidepost

CONFIGURATION
    Guidepost reads configuration from:
      1. ~/.config/guidepost/config.toml (or $XDG_CONFIG_HOME/guidepost/config.toml)
      2. ./guidepost.toml
      3. Environment variables (GUIDEPOST_ prefix, e.g., GUIDEPOST_ZENDESK__SUBDOMAIN)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    GUIDEPOST_ZENDESK__SUBDOMAIN                 Help-center subdomain
    GUIDEPOST_ZENDESK__PROJECT                   Project name for the credential variables
    <PROJECT>_GUIDEPOST_ZENDESK_EMAIL            Agent email
    <PROJECT>_GUIDEPOST_ZENDESK_PASSWORD_TOKEN   API token
    GUIDEPOST_BACKUP__DIR                        Backup root directory
    GUIDEPOST_HTTP__TIMEOUT_SECS                 Per-request timeout (default: 30)
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Retrieve all content and store it as a timestamped JSON backup
    Backup {
        #[command(flatten)]
        sync_opts: SyncArgs,

        /// Backup root directory (default from config or the data directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Retrieve all content and print it as JSON
    Retrieve {
        #[command(flatten)]
        sync_opts: SyncArgs,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit compact JSON
        #[arg(long)]
        compact: bool,
    },
    /// Search articles (first page of results only)
    Search {
        /// Free-text query
        query: String,

        /// Restrict results to a locale
        #[arg(short, long)]
        locale: Option<String>,

        /// Help-center subdomain (overrides config)
        #[arg(short, long)]
        subdomain: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Import a backup file into the record store and report the result
    Import {
        /// Backup JSON file
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Generate man page(s)
    Man {
        /// Output directory for man pages (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Retrieval options shared by `backup` and `retrieve`.
#[derive(Debug, Clone, clap::Args)]
struct SyncArgs {
    /// Help-center subdomain (overrides config)
    #[arg(short, long)]
    subdomain: Option<String>,

    /// Sideload sections and categories with the articles
    #[arg(short = 'S', long)]
    sideload: bool,

    /// Retrieve every locale the account has
    #[arg(short = 'A', long)]
    all_locales: bool,

    /// Locale to retrieve when not retrieving all locales
    #[arg(short, long)]
    locale: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Structured logging only when not attached to a terminal
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("guidepost=info,guidepost_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();

    // Commands that need neither config nor network
    match &cli.command {
        Commands::Completions { shell } => return commands::meta::handle_completions(*shell),
        Commands::Man { output } => return commands::meta::handle_man(output.clone()),
        Commands::Import { file, output } => {
            return commands::import::handle_import(file, *output).await;
        }
        _ => {}
    }

    let config = config::Config::load();

    let cancel = CancellationToken::new();
    shutdown::setup_shutdown_handler(cancel.clone());

    match cli.command {
        Commands::Backup { sync_opts, dir } => {
            commands::backup::handle_backup(sync_opts, dir, &config, cancel).await?;
        }
        Commands::Retrieve {
            sync_opts,
            output,
            compact,
        } => {
            commands::retrieve::handle_retrieve(sync_opts, output, compact, &config, cancel)
                .await?;
        }
        Commands::Search {
            query,
            locale,
            subdomain,
            output,
        } => {
            commands::search::handle_search(query, locale, subdomain, output, &config, cancel)
                .await?;
        }
        Commands::Import { .. } | Commands::Completions { .. } | Commands::Man { .. } => {}
    }

    Ok(())
}
