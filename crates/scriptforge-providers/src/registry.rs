//! Provider registry — static specs for the closed provider set.
//!
//! Each [`ProviderSpec`] describes how to reach one backend: the fixed API
//! base (or none, when the base comes from user settings) and whether the
//! referer/title header pair is required.

use scriptforge_core::Provider;

use crate::chat::ChatCompletionAdapter;
use crate::gemini::GeminiAdapter;
use crate::traits::ProviderAdapter;

/// Static specification describing one provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    pub provider: Provider,
    /// Internal name, matching `Provider::name`.
    pub name: &'static str,
    /// Human-readable name for logs.
    pub display_name: &'static str,
    /// Fixed API base URL. `None` means the base comes from settings
    /// (the Hub endpoint) and the adapter appends the call sub-path itself.
    pub default_api_base: Option<&'static str>,
    /// Whether the `HTTP-Referer`/`X-Title` header pair is sent.
    pub referer_headers: bool,
}

/// All supported providers, in `Provider::ALL` order.
pub static SPECS: &[ProviderSpec] = &[
    ProviderSpec {
        provider: Provider::Gemini,
        name: "gemini",
        display_name: "Gemini",
        default_api_base: Some("https://generativelanguage.googleapis.com"),
        referer_headers: false,
    },
    ProviderSpec {
        provider: Provider::Hub,
        name: "hub",
        display_name: "Hub",
        default_api_base: None,
        referer_headers: true,
    },
    ProviderSpec {
        provider: Provider::OpenAi,
        name: "openai",
        display_name: "OpenAI",
        default_api_base: Some("https://api.openai.com/v1"),
        referer_headers: false,
    },
    ProviderSpec {
        provider: Provider::OpenRouter,
        name: "openrouter",
        display_name: "OpenRouter",
        default_api_base: Some("https://openrouter.ai/api/v1"),
        referer_headers: true,
    },
];

/// Look up the spec for a provider.
pub fn spec_for(provider: Provider) -> &'static ProviderSpec {
    match provider {
        Provider::Gemini => &SPECS[0],
        Provider::Hub => &SPECS[1],
        Provider::OpenAi => &SPECS[2],
        Provider::OpenRouter => &SPECS[3],
    }
}

static GEMINI_ADAPTER: GeminiAdapter = GeminiAdapter;
static HUB_ADAPTER: ChatCompletionAdapter = ChatCompletionAdapter::new(Provider::Hub);
static OPENAI_ADAPTER: ChatCompletionAdapter = ChatCompletionAdapter::new(Provider::OpenAi);
static OPENROUTER_ADAPTER: ChatCompletionAdapter = ChatCompletionAdapter::new(Provider::OpenRouter);

/// Look up the adapter for a provider.
pub fn adapter_for(provider: Provider) -> &'static dyn ProviderAdapter {
    match provider {
        Provider::Gemini => &GEMINI_ADAPTER,
        Provider::Hub => &HUB_ADAPTER,
        Provider::OpenAi => &OPENAI_ADAPTER,
        Provider::OpenRouter => &OPENROUTER_ADAPTER,
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specs_match_provider_order() {
        for (spec, provider) in SPECS.iter().zip(Provider::ALL) {
            assert_eq!(spec.provider, provider);
            assert_eq!(spec.name, provider.name());
            assert_eq!(spec.display_name, provider.display_name());
        }
    }

    #[test]
    fn test_spec_for_resolves_all() {
        for provider in Provider::ALL {
            assert_eq!(spec_for(provider).provider, provider);
        }
    }

    #[test]
    fn test_only_hub_has_settings_driven_base() {
        for spec in SPECS {
            if spec.provider == Provider::Hub {
                assert!(spec.default_api_base.is_none());
            } else {
                assert!(spec.default_api_base.is_some());
            }
        }
    }

    #[test]
    fn test_referer_headers_for_gateways_only() {
        assert!(spec_for(Provider::Hub).referer_headers);
        assert!(spec_for(Provider::OpenRouter).referer_headers);
        assert!(!spec_for(Provider::OpenAi).referer_headers);
        assert!(!spec_for(Provider::Gemini).referer_headers);
    }
}
