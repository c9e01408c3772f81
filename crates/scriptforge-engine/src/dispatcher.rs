//! The request dispatcher — the core retry state machine.
//!
//! One call to [`Dispatcher::generate`] hides the whole credential dance:
//! load the set, filter to usable candidates, pick a round-robin start from
//! the ledger, pace each credential, issue the call through the provider's
//! adapter, classify failures, update health state, and fail over to the
//! next candidate. Per-credential failures never escape the loop; the
//! caller sees text or one aggregate error.
//!
//! The credential set is read-modify-written as a whole. Every access goes
//! through one async mutex, which closes the write race between concurrent
//! callers; the pacing sleep and the network call happen outside the lock so
//! other calls proceed while this one waits.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use scriptforge_core::utils::truncate_message;
use scriptforge_core::{
    Credential, CredentialStore, FailureKind, GenerationParams, KvStore, Prompt, Provider,
    SettingsStore,
};
use scriptforge_providers::{adapter_for, transport};

use crate::error::DispatchError;
use crate::ledger::RotationLedger;

/// Minimum spacing between two calls on the same credential.
const COOLDOWN_MS: i64 = 2000;

/// Maximum characters of raw error detail kept per attempt line.
const MAX_DETAIL_CHARS: usize = 150;

/// Anything that can turn a prompt into text for a provider.
///
/// The orchestrator depends on this seam rather than on the concrete
/// dispatcher, so its pipeline is testable without a network.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &Prompt,
        provider: Provider,
        model: Option<&str>,
        params: &GenerationParams,
    ) -> Result<String, DispatchError>;
}

// ─────────────────────────────────────────────
// Dispatcher
// ─────────────────────────────────────────────

/// Turns a logical request into text, transparently handling credential
/// selection, pacing, and failover.
pub struct Dispatcher {
    /// HTTP client (shared, connection-pooled). No request timeout is set
    /// here; the transport's own behavior governs.
    client: reqwest::Client,
    /// Serializing gate around the persisted credential set.
    credentials: Mutex<CredentialStore>,
    ledger: RotationLedger,
    settings: SettingsStore,
    /// Per-credential pacing window.
    cooldown: Duration,
}

impl Dispatcher {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Dispatcher {
            client: reqwest::Client::new(),
            credentials: Mutex::new(CredentialStore::new(kv.clone())),
            ledger: RotationLedger::new(kv.clone()),
            settings: SettingsStore::new(kv),
            cooldown: Duration::milliseconds(COOLDOWN_MS),
        }
    }

    /// Override the pacing window (tests).
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Generate text for `prompt` via `provider`.
    ///
    /// `model` overrides the configured default. Candidates are tried in
    /// round-robin order starting at the persisted cursor, each at most
    /// once; the cursor advances only on success.
    pub async fn generate(
        &self,
        prompt: &Prompt,
        provider: Provider,
        model: Option<&str>,
        params: &GenerationParams,
    ) -> Result<String, DispatchError> {
        let now = Utc::now();
        let (any_configured, available) = {
            let store = self.credentials.lock().await;
            let set = store.load();
            (set.any_for(provider), set.usable_for(provider, now))
        };

        if available.is_empty() {
            return Err(if any_configured {
                DispatchError::AllCredentialsExhausted { provider }
            } else {
                DispatchError::NoCredentialsConfigured { provider }
            });
        }

        let settings = self.settings.resolved(provider);
        let adapter = adapter_for(provider);
        let model = model.unwrap_or(&settings.model);
        let start = self.ledger.next_start_index(provider, available.len());

        debug!(
            provider = %provider,
            model,
            candidates = available.len(),
            start,
            "dispatching"
        );

        let mut attempts: Vec<String> = Vec::new();

        for step in 0..available.len() {
            let index = (start + step) % available.len();
            let credential = &available[index];
            let redacted = credential.redacted();

            self.pace(credential).await;

            // Stamp last-used and persist BEFORE the network call, so a
            // crash mid-call cannot cause immediate reuse.
            self.mutate_credential(&credential.secret, |c| c.last_used = Utc::now())
                .await;

            let request =
                adapter.build_request(prompt, model, &credential.secret, params, &settings);
            let outcome = transport::execute(&self.client, adapter, request).await;

            let (kind, detail) = match outcome {
                Ok(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        self.ledger.commit(provider, index);
                        debug!(provider = %provider, credential = %redacted, "call succeeded");
                        return Ok(text.to_string());
                    }
                    (
                        FailureKind::EmptyResponse,
                        "provider returned an empty response".to_string(),
                    )
                }
                Err(raw) => (adapter.classify(&raw), raw.to_string()),
            };

            if let Some(cooldown) = kind.cooldown() {
                let until = Utc::now() + cooldown;
                self.mutate_credential(&credential.secret, |c| {
                    c.exhausted_until = Some(until);
                })
                .await;
            }

            warn!(
                provider = %provider,
                credential = %redacted,
                kind = %kind,
                detail = %truncate_message(&detail, MAX_DETAIL_CHARS),
                "attempt failed"
            );
            attempts.push(format!(
                "{}: {} ({})",
                redacted,
                kind,
                truncate_message(&detail, MAX_DETAIL_CHARS)
            ));
        }

        error!(provider = %provider, attempts = attempts.len(), "all credentials failed");
        Err(DispatchError::AllAttemptsFailed { provider, attempts })
    }

    /// Wait out the remainder of the pacing window for one credential.
    ///
    /// Scoped to this call only — concurrent calls on other credentials are
    /// unaffected.
    async fn pace(&self, credential: &Credential) {
        let elapsed = Utc::now() - credential.last_used;
        if elapsed < self.cooldown {
            let wait = (self.cooldown - elapsed).to_std().unwrap_or_default();
            debug!(
                credential = %credential.redacted(),
                wait_ms = wait.as_millis() as u64,
                "pacing before reuse"
            );
            tokio::time::sleep(wait).await;
        }
    }

    /// Load → mutate one credential → save, all under the serializing lock.
    async fn mutate_credential<F>(&self, secret: &str, mutate: F)
    where
        F: FnOnce(&mut Credential),
    {
        let store = self.credentials.lock().await;
        let mut set = store.load();
        if let Some(credential) = set.find_mut(secret) {
            mutate(credential);
            store.save(&set);
        }
    }
}

#[async_trait]
impl TextGenerator for Dispatcher {
    async fn generate(
        &self,
        prompt: &Prompt,
        provider: Provider,
        model: Option<&str>,
        params: &GenerationParams,
    ) -> Result<String, DispatchError> {
        Dispatcher::generate(self, prompt, provider, model, params).await
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
