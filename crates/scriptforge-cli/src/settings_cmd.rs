//! `scriptforge settings` — show and change per-provider settings.

use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use scriptforge_core::{FileKvStore, HubSettings, KvStore, OpenRouterSettings, SettingsStore};

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show the current settings for every provider
    Show,

    /// Configure the Hub gateway
    SetHub {
        /// Base endpoint, without the call sub-path (e.g. `https://host/v1`)
        #[arg(long)]
        endpoint: Option<String>,

        /// Default model
        #[arg(long)]
        model: Option<String>,
    },

    /// Configure OpenRouter
    SetOpenrouter {
        /// Default model (e.g. `anthropic/claude-3.5-sonnet`)
        #[arg(long)]
        model: String,
    },
}

pub fn dispatch(action: SettingsCommands) -> Result<()> {
    let kv: Arc<dyn KvStore> = Arc::new(FileKvStore::open_default());
    let settings = SettingsStore::new(kv);

    match action {
        SettingsCommands::Show => {
            show(&settings);
            Ok(())
        }
        SettingsCommands::SetHub { endpoint, model } => {
            let mut hub = settings.hub();
            if let Some(endpoint) = endpoint {
                hub.endpoint = endpoint.trim().trim_end_matches('/').to_string();
            }
            if let Some(model) = model {
                hub.model = model;
            }
            settings.save_hub(&hub);
            println!("Hub: {} ({})", hub.endpoint, hub.model);
            Ok(())
        }
        SettingsCommands::SetOpenrouter { model } => {
            let or = OpenRouterSettings { model };
            settings.save_openrouter(&or);
            println!("OpenRouter model: {}", or.model);
            Ok(())
        }
    }
}

fn show(settings: &SettingsStore) {
    let hub: HubSettings = settings.hub();
    println!();
    println!(
        "  {:<12} model {}",
        "Gemini".bold(),
        settings.gemini().model
    );
    println!(
        "  {:<12} model {} | endpoint {}",
        "Hub".bold(),
        hub.model,
        hub.endpoint
    );
    println!(
        "  {:<12} model {}",
        "OpenAI".bold(),
        settings.openai().model
    );
    println!(
        "  {:<12} model {}",
        "OpenRouter".bold(),
        settings.openrouter().model
    );
    println!();
}
