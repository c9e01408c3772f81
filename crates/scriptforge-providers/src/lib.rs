//! Provider adapter layer for ScriptForge.
//!
//! Each supported backend gets one adapter: it knows how to assemble the
//! request, pull the text out of a success body, and map a failure onto the
//! shared [`FailureKind`](scriptforge_core::FailureKind) taxonomy. The
//! dispatcher never inspects provider wire formats or raw error text itself.
//!
//! # Architecture
//!
//! - [`traits::ProviderAdapter`] — the per-provider capability set
//! - [`registry`] — static specs + adapter lookup for the closed provider set
//! - [`chat::ChatCompletionAdapter`] — OpenAI-compatible `/chat/completions`
//! - [`gemini::GeminiAdapter`] — Gemini's `generateContent` shape
//! - [`transport::execute`] — one attempt, normalized outcome

pub mod chat;
pub mod classify;
pub mod gemini;
pub mod registry;
pub mod traits;
pub mod transport;

// Re-export main types for convenience
pub use chat::ChatCompletionAdapter;
pub use gemini::GeminiAdapter;
pub use registry::{adapter_for, spec_for, ProviderSpec, SPECS};
pub use traits::{PreparedRequest, ProviderAdapter, RawFailure};
pub use transport::execute;
