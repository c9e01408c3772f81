//! Adapter for Gemini's `generateContent` endpoint.
//!
//! Structurally different from the chat-completion shape: the system half of
//! a prompt travels in a dedicated `systemInstruction` field rather than a
//! message array, auth is a header instead of a bearer token, and sampling
//! parameters nest under `generationConfig`.

use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::warn;

use scriptforge_core::settings::ProviderSettings;
use scriptforge_core::{FailureKind, GenerationParams, Prompt};

use crate::classify::classify_failure;
use crate::traits::{PreparedRequest, ProviderAdapter, RawFailure};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiAdapter;

impl GeminiAdapter {
    fn generate_url(&self, model: &str, settings: &ProviderSettings) -> String {
        let base = settings.api_base.as_deref().unwrap_or(DEFAULT_API_BASE);
        format!(
            "{}/v1beta/models/{}:generateContent",
            base.trim_end_matches('/'),
            model
        )
    }
}

impl ProviderAdapter for GeminiAdapter {
    fn build_request(
        &self,
        prompt: &Prompt,
        model: &str,
        secret: &str,
        params: &GenerationParams,
        settings: &ProviderSettings,
    ) -> PreparedRequest {
        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt.user_text() }] }],
        });
        if let Some(system) = prompt.system_text() {
            body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }
        if !params.is_empty() {
            body["generationConfig"] = generation_config(params);
        }

        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(secret) {
            Ok(value) => {
                headers.insert("x-goog-api-key", value);
            }
            Err(_) => warn!("secret not representable as a header value"),
        }

        PreparedRequest {
            url: self.generate_url(model, settings),
            headers,
            body,
        }
    }

    fn parse_success(&self, body: &Value) -> Option<String> {
        let response: GenerateContentResponse = serde_json::from_value(body.clone()).ok()?;
        let content = response.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn classify(&self, failure: &RawFailure) -> FailureKind {
        classify_failure(failure)
    }
}

fn generation_config(params: &GenerationParams) -> Value {
    let mut config = Map::new();
    if let Some(temperature) = params.temperature {
        config.insert("temperature".to_string(), temperature.into());
    }
    if let Some(top_p) = params.top_p {
        config.insert("topP".to_string(), top_p.into());
    }
    if let Some(top_k) = params.top_k {
        config.insert("topK".to_string(), top_k.into());
    }
    if let Some(max_tokens) = params.max_tokens {
        config.insert("maxOutputTokens".to_string(), max_tokens.into());
    }
    Value::Object(config)
}

// ─────────────────────────────────────────────
// Response wire format
// ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
