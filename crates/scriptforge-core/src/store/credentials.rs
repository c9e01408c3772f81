//! Credential set persistence.
//!
//! The whole set is one opaque blob under a single key: base64-wrapped JSON.
//! A corrupt blob is cleared and reported as empty so the caller can
//! re-prompt for setup; a rejected write is logged and swallowed.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{debug, warn};

use crate::credential::CredentialSet;
use crate::store::kv::KvStore;

/// Store key for the credential blob.
const CREDENTIALS_KEY: &str = "credentials-v1";

/// Owns all access to the persisted credential set.
pub struct CredentialStore {
    kv: Arc<dyn KvStore>,
    key: &'static str,
}

impl CredentialStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        CredentialStore {
            kv,
            key: CREDENTIALS_KEY,
        }
    }

    /// Load the full set.
    ///
    /// Missing data yields an empty set. A corrupt blob is removed from the
    /// store and also yields an empty set — never an error.
    pub fn load(&self) -> CredentialSet {
        let Some(encoded) = self.kv.get(self.key) else {
            return CredentialSet::new();
        };
        match decode(&encoded) {
            Ok(set) => set,
            Err(e) => {
                warn!(error = %e, "credential blob unreadable, clearing it");
                self.kv.remove(self.key);
                CredentialSet::new()
            }
        }
    }

    /// Persist the full set. A store rejection (e.g. size limits) is a
    /// local degradation: logged, not propagated.
    pub fn save(&self, set: &CredentialSet) {
        let json = match serde_json::to_string(set) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to encode credential set");
                return;
            }
        };
        if let Err(e) = self.kv.set(self.key, &BASE64.encode(json)) {
            warn!(error = %e, "failed to save credential set");
        } else {
            debug!(count = set.len(), "credential set saved");
        }
    }
}

fn decode(encoded: &str) -> anyhow::Result<CredentialSet> {
    let bytes = BASE64.decode(encoded.trim())?;
    let json = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&json)?)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
