//! Generic adapter for OpenAI-compatible `/chat/completions` endpoints.
//!
//! Covers Hub, OpenAI, and OpenRouter. The only differences between them are
//! the base URL source and whether the referer/title header pair is sent —
//! both read from the registry spec.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};
use tracing::warn;

use scriptforge_core::settings::ProviderSettings;
use scriptforge_core::types::{ChatMessage, ChatResponse};
use scriptforge_core::{FailureKind, GenerationParams, Prompt, Provider};

use crate::classify::classify_failure;
use crate::registry::spec_for;
use crate::traits::{PreparedRequest, ProviderAdapter, RawFailure};

const REFERER: &str = "https://scriptforge.dev/";
const TITLE: &str = "ScriptForge";

/// One adapter instance per chat-completion provider.
pub struct ChatCompletionAdapter {
    provider: Provider,
}

impl ChatCompletionAdapter {
    pub const fn new(provider: Provider) -> Self {
        ChatCompletionAdapter { provider }
    }

    /// Build the full chat completions URL.
    ///
    /// The stored Hub endpoint never includes the call sub-path; it is
    /// appended here rather than trusting the stored value.
    fn completions_url(&self, settings: &ProviderSettings) -> String {
        let spec = spec_for(self.provider);
        let base = settings
            .api_base
            .as_deref()
            .or(spec.default_api_base)
            .unwrap_or("https://api.openai.com/v1");
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }

    fn headers(&self, secret: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&format!("Bearer {}", secret)) {
            Ok(value) => {
                headers.insert(AUTHORIZATION, value);
            }
            Err(_) => warn!(
                provider = spec_for(self.provider).display_name,
                "secret not representable as a header value"
            ),
        }
        if spec_for(self.provider).referer_headers {
            headers.insert("HTTP-Referer", HeaderValue::from_static(REFERER));
            headers.insert("X-Title", HeaderValue::from_static(TITLE));
        }
        headers
    }
}

impl ProviderAdapter for ChatCompletionAdapter {
    fn build_request(
        &self,
        prompt: &Prompt,
        model: &str,
        secret: &str,
        params: &GenerationParams,
        settings: &ProviderSettings,
    ) -> PreparedRequest {
        let messages = match prompt {
            Prompt::Simple(text) => vec![ChatMessage::user(text.clone())],
            Prompt::SystemUser { system, user } => vec![
                ChatMessage::system(system.clone()),
                ChatMessage::user(user.clone()),
            ],
        };

        let mut body = json!({
            "model": model,
            "messages": messages,
        });
        if let Some(max_tokens) = params.max_tokens {
            body["max_tokens"] = max_tokens.into();
        }
        if let Some(temperature) = params.temperature {
            body["temperature"] = temperature.into();
        }

        PreparedRequest {
            url: self.completions_url(settings),
            headers: self.headers(secret),
            body,
        }
    }

    fn parse_success(&self, body: &Value) -> Option<String> {
        serde_json::from_value::<ChatResponse>(body.clone())
            .ok()
            .and_then(|response| response.choices.into_iter().next())
            .and_then(|choice| choice.message.content)
    }

    fn classify(&self, failure: &RawFailure) -> FailureKind {
        classify_failure(failure)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(api_base: Option<&str>) -> ProviderSettings {
        ProviderSettings {
            model: "gpt-4o".to_string(),
            api_base: api_base.map(String::from),
        }
    }

    fn build(adapter: &ChatCompletionAdapter, prompt: &Prompt, s: &ProviderSettings) -> PreparedRequest {
        adapter.build_request(prompt, "gpt-4o", "sk-test-1234", &GenerationParams::default(), s)
    }

    #[test]
    fn test_hub_url_appends_sub_path() {
        let adapter = ChatCompletionAdapter::new(Provider::Hub);
        let request = build(
            &adapter,
            &Prompt::simple("Hi"),
            &settings(Some("https://onehub.aivnd.com/v1")),
        );
        assert_eq!(request.url, "https://onehub.aivnd.com/v1/chat/completions");
    }

    #[test]
    fn test_hub_url_trailing_slash() {
        let adapter = ChatCompletionAdapter::new(Provider::Hub);
        let request = build(
            &adapter,
            &Prompt::simple("Hi"),
            &settings(Some("https://onehub.aivnd.com/v1/")),
        );
        assert_eq!(request.url, "https://onehub.aivnd.com/v1/chat/completions");
    }

    #[test]
    fn test_openai_uses_fixed_base() {
        let adapter = ChatCompletionAdapter::new(Provider::OpenAi);
        let request = build(&adapter, &Prompt::simple("Hi"), &settings(None));
        assert_eq!(request.url, "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_openrouter_uses_fixed_base() {
        let adapter = ChatCompletionAdapter::new(Provider::OpenRouter);
        let request = build(&adapter, &Prompt::simple("Hi"), &settings(None));
        assert_eq!(request.url, "https://openrouter.ai/api/v1/chat/completions");
    }

    #[test]
    fn test_bearer_auth_header() {
        let adapter = ChatCompletionAdapter::new(Provider::OpenAi);
        let request = build(&adapter, &Prompt::simple("Hi"), &settings(None));
        assert_eq!(
            request.headers.get(AUTHORIZATION).unwrap(),
            "Bearer sk-test-1234"
        );
    }

    #[test]
    fn test_referer_headers_for_gateways() {
        let adapter = ChatCompletionAdapter::new(Provider::OpenRouter);
        let request = build(&adapter, &Prompt::simple("Hi"), &settings(None));
        assert_eq!(request.headers.get("HTTP-Referer").unwrap(), REFERER);
        assert_eq!(request.headers.get("X-Title").unwrap(), TITLE);

        let adapter = ChatCompletionAdapter::new(Provider::OpenAi);
        let request = build(&adapter, &Prompt::simple("Hi"), &settings(None));
        assert!(request.headers.get("HTTP-Referer").is_none());
    }

    #[test]
    fn test_simple_prompt_is_one_user_message() {
        let adapter = ChatCompletionAdapter::new(Provider::OpenAi);
        let request = build(&adapter, &Prompt::simple("Tell me a story"), &settings(None));
        let messages = request.body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "Tell me a story");
    }

    #[test]
    fn test_system_user_prompt_is_two_messages() {
        let adapter = ChatCompletionAdapter::new(Provider::OpenAi);
        let prompt = Prompt::system_user("You are a storyteller.", "Write part 1.");
        let request = build(&adapter, &prompt, &settings(None));
        let messages = request.body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "You are a storyteller.");
        assert_eq!(messages[1]["role"], "user");
    }

    #[test]
    fn test_params_omitted_by_default() {
        let adapter = ChatCompletionAdapter::new(Provider::OpenAi);
        let request = build(&adapter, &Prompt::simple("Hi"), &settings(None));
        assert!(request.body.get("max_tokens").is_none());
        assert!(request.body.get("temperature").is_none());
    }

    #[test]
    fn test_max_tokens_included_when_set() {
        let adapter = ChatCompletionAdapter::new(Provider::OpenAi);
        let params = GenerationParams {
            max_tokens: Some(1),
            ..Default::default()
        };
        let request = adapter.build_request(
            &Prompt::simple("Hi"),
            "gpt-4o-mini",
            "sk",
            &params,
            &settings(None),
        );
        assert_eq!(request.body["max_tokens"], 1);
        assert_eq!(request.body["model"], "gpt-4o-mini");
    }

    #[test]
    fn test_parse_success() {
        let adapter = ChatCompletionAdapter::new(Provider::OpenAi);
        let body = json!({
            "choices": [{ "message": { "content": "Once upon a time." } }]
        });
        assert_eq!(
            adapter.parse_success(&body).as_deref(),
            Some("Once upon a time.")
        );
    }

    #[test]
    fn test_parse_success_missing_content() {
        let adapter = ChatCompletionAdapter::new(Provider::OpenAi);
        assert!(adapter.parse_success(&json!({ "choices": [] })).is_none());
        assert!(adapter
            .parse_success(&json!({ "choices": [{ "message": {} }] }))
            .is_none());
        assert!(adapter.parse_success(&json!({})).is_none());
    }

    #[test]
    fn test_classify_delegates_to_shared_matchers() {
        let adapter = ChatCompletionAdapter::new(Provider::Hub);
        assert_eq!(
            adapter.classify(&RawFailure::http(401, "bad key")),
            FailureKind::AuthInvalid
        );
        assert_eq!(
            adapter.classify(&RawFailure::http(429, "Rate limit exceeded")),
            FailureKind::RateLimited
        );
    }
}
