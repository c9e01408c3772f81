//! Persisted round-robin cursors, one per provider.
//!
//! The ledger only picks a starting candidate; the dispatcher still walks
//! the full available set on failure. The cursor is committed on success
//! only, so a failed credential does not advance it.

use std::sync::Arc;

use tracing::warn;

use scriptforge_core::{KvStore, Provider};

/// Tracks the last successfully-used index per provider.
pub struct RotationLedger {
    kv: Arc<dyn KvStore>,
}

impl RotationLedger {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        RotationLedger { kv }
    }

    fn key(provider: Provider) -> String {
        format!("{}_last_key_index", provider.name())
    }

    /// Index to start the round-robin walk at: `(last + 1) mod n`,
    /// where a missing or unreadable cursor counts as `-1`.
    pub fn next_start_index(&self, provider: Provider, available_count: usize) -> usize {
        if available_count == 0 {
            return 0;
        }
        let last = self
            .kv
            .get(&Self::key(provider))
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(-1);
        (last + 1).rem_euclid(available_count as i64) as usize
    }

    /// Persist the winning index for a provider.
    pub fn commit(&self, provider: Provider, index: usize) {
        let key = Self::key(provider);
        if let Err(e) = self.kv.set(&key, &index.to_string()) {
            warn!(key, error = %e, "failed to persist rotation cursor");
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
