//! Shared types — provider identity, prompt variants, and wire formats.
//!
//! The engine speaks two request shapes: the OpenAI-style chat completions
//! format (Hub, OpenAI, OpenRouter) and Gemini's `generateContent` format.
//! The chat wire types live here; the Gemini ones are private to its adapter.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Provider identity
// ─────────────────────────────────────────────

/// The fixed, closed set of supported LLM backends.
///
/// Each variant maps to exactly one adapter in `scriptforge-providers`.
/// `Hub` is the OpenAI-compatible gateway whose base URL the user configures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    Hub,
    OpenAi,
    OpenRouter,
}

impl Provider {
    /// All providers, in display order.
    pub const ALL: [Provider; 4] = [
        Provider::Gemini,
        Provider::Hub,
        Provider::OpenAi,
        Provider::OpenRouter,
    ];

    /// Stable lowercase name, used in store keys and CLI arguments.
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::Hub => "hub",
            Provider::OpenAi => "openai",
            Provider::OpenRouter => "openrouter",
        }
    }

    /// Human-readable name for logs and CLI output.
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::Hub => "Hub",
            Provider::OpenAi => "OpenAI",
            Provider::OpenRouter => "OpenRouter",
        }
    }

    /// Parse a provider from its lowercase name.
    pub fn from_name(name: &str) -> Option<Provider> {
        match name.to_lowercase().as_str() {
            "gemini" => Some(Provider::Gemini),
            "hub" => Some(Provider::Hub),
            "openai" => Some(Provider::OpenAi),
            "openrouter" => Some(Provider::OpenRouter),
            _ => None,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

// ─────────────────────────────────────────────
// Prompt
// ─────────────────────────────────────────────

/// A logical request payload.
///
/// Chat providers expand `SystemUser` into a two-message array; Gemini maps
/// the system half onto its dedicated `systemInstruction` field.
#[derive(Clone, Debug, PartialEq)]
pub enum Prompt {
    /// A single user-role text.
    Simple(String),
    /// A system/user pair.
    SystemUser { system: String, user: String },
}

impl Prompt {
    /// Create a single-text prompt.
    pub fn simple(text: impl Into<String>) -> Self {
        Prompt::Simple(text.into())
    }

    /// Create a system/user prompt pair.
    pub fn system_user(system: impl Into<String>, user: impl Into<String>) -> Self {
        Prompt::SystemUser {
            system: system.into(),
            user: user.into(),
        }
    }

    /// The user-facing text, regardless of variant.
    pub fn user_text(&self) -> &str {
        match self {
            Prompt::Simple(text) => text,
            Prompt::SystemUser { user, .. } => user,
        }
    }

    /// The system text, if this prompt carries one.
    pub fn system_text(&self) -> Option<&str> {
        match self {
            Prompt::Simple(_) => None,
            Prompt::SystemUser { system, .. } => Some(system),
        }
    }
}

// ─────────────────────────────────────────────
// Generation parameters
// ─────────────────────────────────────────────

/// Sampling parameters forwarded to providers that accept them.
///
/// All fields are optional; chat-completion bodies omit anything unset,
/// and Gemini folds the set fields into its `generationConfig`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationParams {
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub top_k: Option<u32>,
    pub max_tokens: Option<u32>,
}

impl GenerationParams {
    /// Convenience constructor for the common temperature/top_p/top_k triple.
    pub fn sampling(temperature: f64, top_p: f64, top_k: u32) -> Self {
        GenerationParams {
            temperature: Some(temperature),
            top_p: Some(top_p),
            top_k: Some(top_k),
            max_tokens: None,
        }
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.top_p.is_none()
            && self.top_k.is_none()
            && self.max_tokens.is_none()
    }
}

// ─────────────────────────────────────────────
// Chat completions wire format
// ─────────────────────────────────────────────

/// One role/content message in a chat request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Response body from a chat completions endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

/// A single choice in a chat response.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

/// The assistant message within a choice.
#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    pub content: Option<String>,
}

// ─────────────────────────────────────────────
// Story types
// ─────────────────────────────────────────────

/// One section of a generated story outline.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutlineSection {
    pub title: String,
    /// Target like `~800 words`.
    pub word_target: String,
    /// Target like `~35 paragraphs`.
    pub paragraph_target: String,
    pub description: String,
}

impl OutlineSection {
    /// Numeric word target, falling back to 800 when unparseable.
    pub fn word_count(&self) -> u32 {
        parse_digits(&self.word_target).unwrap_or(800)
    }

    /// Numeric paragraph target, falling back to 35 when unparseable.
    pub fn paragraph_count(&self) -> u32 {
        parse_digits(&self.paragraph_target).unwrap_or(35)
    }
}

fn parse_digits(s: &str) -> Option<u32> {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// A completed script part.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScriptPart {
    pub content: String,
}

impl ScriptPart {
    pub fn new(content: impl Into<String>) -> Self {
        ScriptPart {
            content: content.into(),
        }
    }
}

/// Optional protagonist traits folded into prompts.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterProfile {
    pub nationality: String,
    pub age: String,
    pub skin_color: String,
    pub hair_length: String,
    pub hair_color: String,
    pub shirt: String,
    pub pants: String,
}

impl CharacterProfile {
    /// Non-empty traits as a `label: value` list, or `None` when all blank.
    pub fn summary(&self) -> Option<String> {
        let fields = [
            ("nationality", &self.nationality),
            ("age", &self.age),
            ("skin color", &self.skin_color),
            ("hair length", &self.hair_length),
            ("hair color", &self.hair_color),
            ("shirt", &self.shirt),
            ("pants", &self.pants),
        ];
        let parts: Vec<String> = fields
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(label, value)| format!("{}: {}", label, value.trim()))
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
