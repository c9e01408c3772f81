//! Credentials — one provider-scoped secret plus its usage metadata.
//!
//! A credential's health is a single optional timestamp: `exhausted_until`.
//! Absent means usable; a future instant means the dispatcher must skip the
//! credential until the instant passes. Nothing is ever deleted here — the
//! set is only replaced wholesale when the user resaves it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Provider;
use crate::utils;

/// One API secret bound to one provider.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// The secret value, opaque to the engine.
    pub secret: String,
    pub provider: Provider,
    /// When this credential last issued a call. Epoch for never.
    #[serde(default = "epoch")]
    pub last_used: DateTime<Utc>,
    /// Cooldown gate; absent means usable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exhausted_until: Option<DateTime<Utc>>,
}

fn epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

impl Credential {
    /// Create a fresh, never-used credential.
    pub fn new(secret: impl Into<String>, provider: Provider) -> Self {
        Credential {
            secret: secret.into(),
            provider,
            last_used: epoch(),
            exhausted_until: None,
        }
    }

    /// Whether the credential may be selected at `t`.
    pub fn is_usable_at(&self, t: DateTime<Utc>) -> bool {
        self.exhausted_until.map_or(true, |until| until <= t)
    }

    /// Last four characters of the secret, for logs and error lines.
    pub fn redacted(&self) -> String {
        utils::redact_secret(&self.secret)
    }
}

/// The ordered collection of all credentials, persisted as one blob.
///
/// All mutation goes load-entire-set → mutate → save-entire-set; there are
/// no partial updates, so concurrent writers must serialize around this type.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CredentialSet {
    credentials: Vec<Credential>,
}

impl CredentialSet {
    pub fn new() -> Self {
        CredentialSet::default()
    }

    pub fn push(&mut self, credential: Credential) {
        self.credentials.push(credential);
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Credential> {
        self.credentials.iter()
    }

    /// Remove by position, returning the removed credential if in range.
    pub fn remove(&mut self, index: usize) -> Option<Credential> {
        if index < self.credentials.len() {
            Some(self.credentials.remove(index))
        } else {
            None
        }
    }

    /// Credentials for `provider` that are usable at `now`, in set order.
    pub fn usable_for(&self, provider: Provider, now: DateTime<Utc>) -> Vec<Credential> {
        self.credentials
            .iter()
            .filter(|c| c.provider == provider && c.is_usable_at(now))
            .cloned()
            .collect()
    }

    /// Whether any credential exists for `provider`, usable or not.
    pub fn any_for(&self, provider: Provider) -> bool {
        self.credentials.iter().any(|c| c.provider == provider)
    }

    /// Mutable access by secret — the secret is the identity within a set.
    pub fn find_mut(&mut self, secret: &str) -> Option<&mut Credential> {
        self.credentials.iter_mut().find(|c| c.secret == secret)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_credential_is_usable() {
        let cred = Credential::new("sk-test-abcd", Provider::OpenAi);
        assert!(cred.is_usable_at(Utc::now()));
        assert_eq!(cred.last_used, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_future_exhaustion_blocks_selection() {
        let now = Utc::now();
        let mut cred = Credential::new("sk-test-abcd", Provider::OpenAi);
        cred.exhausted_until = Some(now + Duration::seconds(10));
        assert!(!cred.is_usable_at(now));
        // Usable again once the gate has passed
        assert!(cred.is_usable_at(now + Duration::seconds(10)));
        assert!(cred.is_usable_at(now + Duration::seconds(11)));
    }

    #[test]
    fn test_redacted_shows_last_four() {
        let cred = Credential::new("sk-or-v1-0123456789", Provider::OpenRouter);
        assert_eq!(cred.redacted(), "...6789");
    }

    #[test]
    fn test_usable_for_filters_provider_and_cooldown() {
        let now = Utc::now();
        let mut set = CredentialSet::new();
        set.push(Credential::new("a", Provider::OpenAi));
        set.push(Credential::new("b", Provider::Gemini));
        let mut cooling = Credential::new("c", Provider::OpenAi);
        cooling.exhausted_until = Some(now + Duration::minutes(5));
        set.push(cooling);

        let usable = set.usable_for(Provider::OpenAi, now);
        assert_eq!(usable.len(), 1);
        assert_eq!(usable[0].secret, "a");
    }

    #[test]
    fn test_any_for_counts_cooling_credentials() {
        let now = Utc::now();
        let mut set = CredentialSet::new();
        let mut cooling = Credential::new("c", Provider::Hub);
        cooling.exhausted_until = Some(now + Duration::hours(1));
        set.push(cooling);

        assert!(set.usable_for(Provider::Hub, now).is_empty());
        assert!(set.any_for(Provider::Hub));
        assert!(!set.any_for(Provider::OpenAi));
    }

    #[test]
    fn test_find_mut_by_secret() {
        let mut set = CredentialSet::new();
        set.push(Credential::new("a", Provider::OpenAi));
        set.push(Credential::new("b", Provider::OpenAi));

        let now = Utc::now();
        set.find_mut("b").unwrap().last_used = now;
        assert_eq!(set.iter().nth(1).unwrap().last_used, now);
        assert!(set.find_mut("missing").is_none());
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut set = CredentialSet::new();
        set.push(Credential::new("a", Provider::OpenAi));
        assert!(set.remove(5).is_none());
        assert_eq!(set.remove(0).unwrap().secret, "a");
        assert!(set.is_empty());
    }

    #[test]
    fn test_serde_round_trip_camel_case() {
        let mut cred = Credential::new("sk-test", Provider::OpenRouter);
        cred.exhausted_until = Some(Utc::now() + Duration::seconds(60));
        let mut set = CredentialSet::new();
        set.push(cred);

        let json = serde_json::to_value(&set).unwrap();
        // Transparent: the set serializes as a bare list
        assert!(json.is_array());
        assert!(json[0].get("exhaustedUntil").is_some());
        assert!(json[0].get("lastUsed").is_some());

        let back: CredentialSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_deserialize_defaults_missing_metadata() {
        // A record saved before any use carries only secret + provider
        let json = serde_json::json!([{ "secret": "sk-x", "provider": "hub" }]);
        let set: CredentialSet = serde_json::from_value(json).unwrap();
        let cred = set.iter().next().unwrap();
        assert_eq!(cred.last_used, DateTime::UNIX_EPOCH);
        assert!(cred.exhausted_until.is_none());
    }
}
