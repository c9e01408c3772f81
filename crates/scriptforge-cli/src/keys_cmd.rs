//! `scriptforge keys` — manage provider credentials.
//!
//! Validation goes through the same probe the engine uses; a credential
//! already cooling down is reported from its stored state without a network
//! call.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;
use colored::Colorize;

use scriptforge_core::{
    Credential, CredentialStore, FileKvStore, KvStore, Provider, SettingsStore,
};
use scriptforge_engine::{cooldown_report, Probe};

use crate::helpers;

#[derive(Subcommand)]
pub enum KeysCommands {
    /// Add a credential for a provider
    Add {
        /// Provider the secret belongs to
        #[arg(value_parser = helpers::parse_provider)]
        provider: Provider,

        /// The secret value
        secret: String,
    },

    /// List stored credentials with their health state
    List,

    /// Remove a credential by its list position (see `keys list`)
    Remove {
        /// 1-based position from `keys list`
        position: usize,
    },

    /// Probe every stored credential against its provider
    Validate,
}

pub async fn dispatch(action: KeysCommands) -> Result<()> {
    let kv: Arc<dyn KvStore> = Arc::new(FileKvStore::open_default());
    let store = CredentialStore::new(kv.clone());

    match action {
        KeysCommands::Add { provider, secret } => {
            let mut set = store.load();
            set.push(Credential::new(secret, provider));
            store.save(&set);
            println!("Added credential for {}.", provider.to_string().bold());
            Ok(())
        }
        KeysCommands::List => {
            list(&store);
            Ok(())
        }
        KeysCommands::Remove { position } => {
            let mut set = store.load();
            let Some(removed) = position.checked_sub(1).and_then(|i| set.remove(i)) else {
                anyhow::bail!("no credential at position {position}; run `keys list`");
            };
            store.save(&set);
            println!(
                "Removed {} credential {}.",
                removed.provider,
                removed.redacted()
            );
            Ok(())
        }
        KeysCommands::Validate => {
            validate(&store, &SettingsStore::new(kv)).await;
            Ok(())
        }
    }
}

fn list(store: &CredentialStore) {
    let set = store.load();
    if set.is_empty() {
        println!("No credentials stored. Add one with `scriptforge keys add`.");
        return;
    }

    let now = Utc::now();
    println!();
    for (i, credential) in set.iter().enumerate() {
        let health = match cooldown_report(credential, now) {
            Some(report) => report.message.yellow().to_string(),
            None => "ready".green().to_string(),
        };
        println!(
            "  {:>2}. {:<12} {:<10} {}",
            i + 1,
            credential.provider.to_string().bold(),
            credential.redacted(),
            health
        );
    }
    println!();
}

async fn validate(store: &CredentialStore, settings: &SettingsStore) {
    let set = store.load();
    if set.is_empty() {
        println!("No credentials stored.");
        return;
    }

    let probe = Probe::new();
    let now = Utc::now();
    println!();
    for credential in set.iter() {
        // Surface a known cooldown without burning a call
        let report = match cooldown_report(credential, now) {
            Some(report) => report,
            None => {
                let resolved = settings.resolved(credential.provider);
                probe
                    .probe(&credential.secret, credential.provider, &resolved)
                    .await
            }
        };
        println!(
            "  {:<12} {:<10} {}",
            credential.provider.to_string().bold(),
            credential.redacted(),
            helpers::format_report(&report)
        );
    }
    println!();
}
