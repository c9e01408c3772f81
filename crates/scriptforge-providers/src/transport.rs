//! Shared request execution — one network attempt, one normalized outcome.
//!
//! Both the dispatcher and the validation probe go through [`execute`], so a
//! failure is shaped and classified identically no matter who asked.

use tracing::debug;

use crate::traits::{PreparedRequest, ProviderAdapter, RawFailure};

/// Issue one prepared request and normalize the outcome.
///
/// `Ok` carries the parsed response text — possibly blank, which the caller
/// must treat as a failure of its own. `Err` carries the status (when one
/// exists) and the best message that could be recovered from the body.
pub async fn execute(
    client: &reqwest::Client,
    adapter: &dyn ProviderAdapter,
    request: PreparedRequest,
) -> Result<String, RawFailure> {
    debug!(url = %request.url, "issuing provider call");

    let response = match client
        .post(&request.url)
        .headers(request.headers)
        .json(&request.body)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => return Err(RawFailure::transport(e.to_string())),
    };

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "failed to read error body".to_string());
        return Err(RawFailure::http(status.as_u16(), extract_error_message(&body)));
    }

    let body: serde_json::Value = match response.json().await {
        Ok(body) => body,
        Err(e) => {
            return Err(RawFailure::transport(format!(
                "failed to parse response body: {}",
                e
            )))
        }
    };

    Ok(adapter.parse_success(&body).unwrap_or_default())
}

/// Prefer the structured `error.message` field; fall back to the raw body.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.pointer("/error/message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
        return value.to_string();
    }
    if body.trim().is_empty() {
        "server returned no error detail".to_string()
    } else {
        body.to_string()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatCompletionAdapter;
    use scriptforge_core::settings::ProviderSettings;
    use scriptforge_core::{GenerationParams, Prompt, Provider};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter() -> ChatCompletionAdapter {
        ChatCompletionAdapter::new(Provider::Hub)
    }

    fn settings(base: &str) -> ProviderSettings {
        ProviderSettings {
            model: "gpt-4o".to_string(),
            api_base: Some(base.to_string()),
        }
    }

    fn prepared(base: &str) -> crate::traits::PreparedRequest {
        adapter().build_request(
            &Prompt::simple("Hi"),
            "gpt-4o",
            "sk-test",
            &GenerationParams::default(),
            &settings(base),
        )
    }

    #[tokio::test]
    async fn test_execute_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": "hello there" } }]
            })))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let result = execute(&client, &adapter(), prepared(&server.uri())).await;
        assert_eq!(result.unwrap(), "hello there");
    }

    #[tokio::test]
    async fn test_execute_missing_content_is_blank_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "choices": [{ "message": {} }] })),
            )
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let result = execute(&client, &adapter(), prepared(&server.uri())).await;
        assert_eq!(result.unwrap(), "");
    }

    #[tokio::test]
    async fn test_execute_structured_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "message": "Rate limit exceeded", "type": "rate_limit_error" }
            })))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let failure = execute(&client, &adapter(), prepared(&server.uri()))
            .await
            .unwrap_err();
        assert_eq!(failure.status, Some(429));
        assert_eq!(failure.message, "Rate limit exceeded");
    }

    #[tokio::test]
    async fn test_execute_plain_text_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let failure = execute(&client, &adapter(), prepared(&server.uri()))
            .await
            .unwrap_err();
        assert_eq!(failure.status, Some(502));
        assert_eq!(failure.message, "upstream unavailable");
    }

    #[tokio::test]
    async fn test_execute_transport_error_has_no_status() {
        // Nothing listens on port 1
        let client = reqwest::Client::new();
        let failure = execute(&client, &adapter(), prepared("http://127.0.0.1:1"))
            .await
            .unwrap_err();
        assert!(failure.status.is_none());
        assert!(!failure.message.is_empty());
    }

    #[test]
    fn test_extract_error_message_variants() {
        assert_eq!(
            extract_error_message(r#"{"error":{"message":"bad key"}}"#),
            "bad key"
        );
        // JSON without the expected field falls back to the whole value
        assert_eq!(extract_error_message(r#"{"detail":"x"}"#), r#"{"detail":"x"}"#);
        assert_eq!(extract_error_message("plain text"), "plain text");
        assert_eq!(extract_error_message("  "), "server returned no error detail");
    }
}
