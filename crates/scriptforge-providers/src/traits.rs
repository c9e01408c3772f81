//! The per-provider capability set.

use reqwest::header::HeaderMap;
use serde_json::Value;

use scriptforge_core::settings::ProviderSettings;
use scriptforge_core::{FailureKind, GenerationParams, Prompt};

/// A fully assembled request, ready to be posted by the transport.
#[derive(Debug)]
pub struct PreparedRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: Value,
}

/// The normalized shape of any failed attempt: the HTTP status when one
/// exists, and whatever message text could be recovered. Transport-level
/// errors (DNS, refused connection, thrown client errors) carry no status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl RawFailure {
    /// A failure with no HTTP status (transport or client-library error).
    pub fn transport(message: impl Into<String>) -> Self {
        RawFailure {
            status: None,
            message: message.into(),
        }
    }

    /// A non-2xx HTTP response.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        RawFailure {
            status: Some(status),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for RawFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "[{}] {}", status, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Per-provider knowledge: request assembly, success parsing, and failure
/// classification.
///
/// Implementations are stateless; everything call-specific arrives as
/// arguments so one static adapter instance serves every request.
pub trait ProviderAdapter: Send + Sync {
    /// Assemble the full request for one attempt.
    fn build_request(
        &self,
        prompt: &Prompt,
        model: &str,
        secret: &str,
        params: &GenerationParams,
        settings: &ProviderSettings,
    ) -> PreparedRequest;

    /// Extract the response text from a 2xx body. `None` when the body
    /// carries no content — the dispatcher treats that as a failure.
    fn parse_success(&self, body: &Value) -> Option<String>;

    /// Map a failure onto the shared taxonomy. The dispatcher's retry loop
    /// never inspects raw error text itself.
    fn classify(&self, failure: &RawFailure) -> FailureKind;
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
