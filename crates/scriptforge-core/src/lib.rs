//! Core types and persistence for ScriptForge.
//!
//! - [`types`] — provider identity, prompt variants, and wire types
//! - [`credential`] — credentials and the credential set
//! - [`store`] — generic key-value store + credential blob persistence
//! - [`settings`] — per-provider settings blobs
//! - [`error`] — the failure taxonomy shared by adapters and the dispatcher

pub mod credential;
pub mod error;
pub mod settings;
pub mod store;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use credential::{Credential, CredentialSet};
pub use error::FailureKind;
pub use settings::{
    GeminiSettings, HubSettings, OpenAiSettings, OpenRouterSettings, ProviderSettings,
    SettingsStore,
};
pub use store::{CredentialStore, FileKvStore, KvStore, MemoryKvStore};
pub use types::{CharacterProfile, GenerationParams, OutlineSection, Prompt, Provider, ScriptPart};
