//! ScriptForge CLI — entry point.
//!
//! # Commands
//!
//! - `scriptforge keys add|list|remove|validate` — manage provider credentials
//! - `scriptforge settings show|set-hub|set-openrouter` — provider settings
//! - `scriptforge outline <idea>` — generate a story outline
//! - `scriptforge character <idea>` — generate a reference character
//! - `scriptforge run <idea>` — full pipeline: outline → parts → analysis

mod generate_cmd;
mod helpers;
mod keys_cmd;
mod settings_cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};

use scriptforge_core::Provider;

/// ScriptForge — multi-provider narrated-script generator
#[derive(Parser)]
#[command(name = "scriptforge", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage provider credentials
    Keys {
        #[command(subcommand)]
        action: keys_cmd::KeysCommands,
    },

    /// Show or change provider settings
    Settings {
        #[command(subcommand)]
        action: settings_cmd::SettingsCommands,
    },

    /// Generate a story outline
    Outline {
        /// The story idea
        idea: String,

        #[command(flatten)]
        options: GenerateOptions,
    },

    /// Generate a visual reference description for the main character
    Character {
        /// The story idea
        idea: String,

        #[command(flatten)]
        options: GenerateOptions,
    },

    /// Full pipeline: outline, every script part, then character analysis
    Run {
        /// The story idea
        idea: String,

        /// Write the assembled script to this file instead of stdout
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,

        #[command(flatten)]
        options: GenerateOptions,
    },
}

/// Flags shared by the generation commands.
#[derive(clap::Args)]
pub(crate) struct GenerateOptions {
    /// Provider to use: gemini, hub, openai, or openrouter
    #[arg(short, long, default_value = "gemini", value_parser = helpers::parse_provider)]
    pub(crate) provider: Provider,

    /// Model override (defaults to the provider's configured model)
    #[arg(short, long)]
    pub(crate) model: Option<String>,

    /// Output language for the story
    #[arg(short, long, default_value = "english")]
    pub(crate) language: String,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    pub(crate) logs: bool,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Keys { action } => {
            init_logging(false);
            keys_cmd::dispatch(action).await
        }
        Commands::Settings { action } => {
            init_logging(false);
            settings_cmd::dispatch(action)
        }
        Commands::Outline { idea, options } => {
            init_logging(options.logs);
            generate_cmd::outline(&idea, &options).await
        }
        Commands::Character { idea, options } => {
            init_logging(options.logs);
            generate_cmd::character(&idea, &options).await
        }
        Commands::Run {
            idea,
            output,
            options,
        } => {
            init_logging(options.logs);
            generate_cmd::run(&idea, output.as_deref(), &options).await
        }
    }
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("scriptforge=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
