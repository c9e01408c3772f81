//! Credential validation outside the main generation flow.
//!
//! The probe issues a minimal one-token request through the same adapter and
//! transport the dispatcher uses, so a failure is classified identically —
//! but it never rotates, never writes health state, and callers can surface
//! an existing cooldown without touching the network at all.

use chrono::{DateTime, Utc};

use scriptforge_core::settings::ProviderSettings;
use scriptforge_core::utils::truncate_message;
use scriptforge_core::{Credential, FailureKind, GenerationParams, Prompt, Provider};
use scriptforge_providers::{adapter_for, transport};

/// Outcome of probing one credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeStatus {
    Valid,
    Invalid,
    RateLimited,
    QuotaExhausted,
    /// Benched by an earlier failure; reported without a network call.
    CoolingDown,
    Error,
}

impl std::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ProbeStatus::Valid => "valid",
            ProbeStatus::Invalid => "invalid",
            ProbeStatus::RateLimited => "rate limited",
            ProbeStatus::QuotaExhausted => "quota exhausted",
            ProbeStatus::CoolingDown => "cooling down",
            ProbeStatus::Error => "error",
        };
        f.write_str(label)
    }
}

/// Status plus a human-readable one-liner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeReport {
    pub status: ProbeStatus,
    pub message: String,
}

// ─────────────────────────────────────────────
// Probe
// ─────────────────────────────────────────────

/// Thin validation client over the shared adapters.
pub struct Probe {
    client: reqwest::Client,
}

impl Default for Probe {
    fn default() -> Self {
        Probe::new()
    }
}

impl Probe {
    pub fn new() -> Self {
        Probe {
            client: reqwest::Client::new(),
        }
    }

    /// Test a secret against its provider with a trivial one-token prompt.
    ///
    /// Read-only: no rotation, no persisted health state.
    pub async fn probe(
        &self,
        secret: &str,
        provider: Provider,
        settings: &ProviderSettings,
    ) -> ProbeReport {
        let adapter = adapter_for(provider);
        let params = GenerationParams {
            max_tokens: Some(1),
            ..Default::default()
        };
        let request =
            adapter.build_request(&Prompt::simple("Hi"), &settings.model, secret, &params, settings);

        match transport::execute(&self.client, adapter, request).await {
            Ok(text) if !text.trim().is_empty() => ProbeReport {
                status: ProbeStatus::Valid,
                message: "credential accepted".to_string(),
            },
            Ok(_) => ProbeReport {
                status: ProbeStatus::Error,
                message: "provider returned an empty response".to_string(),
            },
            Err(raw) => {
                let report = match adapter.classify(&raw) {
                    FailureKind::AuthInvalid => ProbeReport {
                        status: ProbeStatus::Invalid,
                        message: "invalid or revoked credential (401)".to_string(),
                    },
                    FailureKind::RateLimited => ProbeReport {
                        status: ProbeStatus::RateLimited,
                        message: "rate limited (429), retry shortly".to_string(),
                    },
                    FailureKind::QuotaExhausted => ProbeReport {
                        status: ProbeStatus::QuotaExhausted,
                        message: "quota exhausted".to_string(),
                    },
                    FailureKind::EmptyResponse | FailureKind::Transient => ProbeReport {
                        status: ProbeStatus::Error,
                        message: truncate_message(&raw.to_string(), 100),
                    },
                };
                report
            }
        }
    }
}

/// Surface an existing cooldown without calling the network.
///
/// `None` means the credential is not benched at `now` and a real probe is
/// worth issuing.
pub fn cooldown_report(credential: &Credential, now: DateTime<Utc>) -> Option<ProbeReport> {
    let until = credential.exhausted_until?;
    if until <= now {
        return None;
    }
    let remaining = until - now;
    Some(ProbeReport {
        status: ProbeStatus::CoolingDown,
        message: format!("cooling down for another {}", humanize(remaining)),
    })
}

fn humanize(duration: chrono::Duration) -> String {
    let seconds = duration.num_seconds().max(1);
    if seconds < 120 {
        format!("{}s", seconds)
    } else if seconds < 7200 {
        format!("{}m", seconds / 60)
    } else if seconds < 48 * 3600 {
        format!("{}h", seconds / 3600)
    } else {
        format!("{}d", seconds / 86400)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
