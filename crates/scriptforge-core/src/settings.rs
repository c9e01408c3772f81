//! Per-provider settings, persisted through the key-value store.
//!
//! Stored as plain JSON blobs (camelCase keys) under provider-specific keys.
//! Corrupt or missing blobs fall back to defaults.
//!
//! The Hub endpoint is stored WITHOUT the `/chat/completions` sub-path; the
//! adapter appends it at call time rather than trusting the stored value.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::kv::KvStore;
use crate::types::Provider;

const HUB_SETTINGS_KEY: &str = "hub-settings";
const OPENROUTER_SETTINGS_KEY: &str = "openrouter-settings";
const GEMINI_SETTINGS_KEY: &str = "gemini-settings";
const OPENAI_SETTINGS_KEY: &str = "openai-settings";

// ─────────────────────────────────────────────
// Per-provider settings blobs
// ─────────────────────────────────────────────

/// Settings for the user-configurable gateway.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HubSettings {
    /// Base URL up to (but not including) the call sub-path.
    pub endpoint: String,
    pub model: String,
}

impl Default for HubSettings {
    fn default() -> Self {
        HubSettings {
            endpoint: "https://onehub.aivnd.com/v1".to_string(),
            model: "gpt-4o".to_string(),
        }
    }
}

/// Settings for OpenRouter.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenRouterSettings {
    pub model: String,
}

impl Default for OpenRouterSettings {
    fn default() -> Self {
        OpenRouterSettings {
            model: "anthropic/claude-3.5-sonnet".to_string(),
        }
    }
}

/// Settings for Gemini.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GeminiSettings {
    pub model: String,
    /// Base URL override (proxies, tests). `None` uses the public API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        GeminiSettings {
            model: "gemini-2.5-flash".to_string(),
            api_base: None,
        }
    }
}

/// Settings for OpenAI.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenAiSettings {
    pub model: String,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        OpenAiSettings {
            model: "gpt-4o-mini".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Resolved call-time view
// ─────────────────────────────────────────────

/// Settings resolved for one call: the default model plus, where relevant,
/// the user-configured or override base URL.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderSettings {
    pub model: String,
    pub api_base: Option<String>,
}

// ─────────────────────────────────────────────
// SettingsStore
// ─────────────────────────────────────────────

/// Loads and saves the per-provider settings blobs.
pub struct SettingsStore {
    kv: Arc<dyn KvStore>,
}

impl SettingsStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        SettingsStore { kv }
    }

    pub fn hub(&self) -> HubSettings {
        self.load_or_default(HUB_SETTINGS_KEY)
    }

    pub fn save_hub(&self, settings: &HubSettings) {
        self.save_json(HUB_SETTINGS_KEY, settings);
    }

    pub fn openrouter(&self) -> OpenRouterSettings {
        self.load_or_default(OPENROUTER_SETTINGS_KEY)
    }

    pub fn save_openrouter(&self, settings: &OpenRouterSettings) {
        self.save_json(OPENROUTER_SETTINGS_KEY, settings);
    }

    pub fn gemini(&self) -> GeminiSettings {
        self.load_or_default(GEMINI_SETTINGS_KEY)
    }

    pub fn save_gemini(&self, settings: &GeminiSettings) {
        self.save_json(GEMINI_SETTINGS_KEY, settings);
    }

    pub fn openai(&self) -> OpenAiSettings {
        self.load_or_default(OPENAI_SETTINGS_KEY)
    }

    pub fn save_openai(&self, settings: &OpenAiSettings) {
        self.save_json(OPENAI_SETTINGS_KEY, settings);
    }

    /// Resolve the call-time settings for a provider.
    pub fn resolved(&self, provider: Provider) -> ProviderSettings {
        match provider {
            Provider::Gemini => {
                let s = self.gemini();
                ProviderSettings {
                    model: s.model,
                    api_base: s.api_base,
                }
            }
            Provider::Hub => {
                let s = self.hub();
                ProviderSettings {
                    model: s.model,
                    api_base: Some(s.endpoint),
                }
            }
            Provider::OpenAi => ProviderSettings {
                model: self.openai().model,
                api_base: None,
            },
            Provider::OpenRouter => ProviderSettings {
                model: self.openrouter().model,
                api_base: None,
            },
        }
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let Some(raw) = self.kv.get(key) else {
            return T::default();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key, error = %e, "settings blob unreadable, using defaults");
            T::default()
        })
    }

    fn save_json<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "failed to encode settings");
                return;
            }
        };
        if let Err(e) = self.kv.set(key, &json) {
            warn!(key, error = %e, "failed to save settings");
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
