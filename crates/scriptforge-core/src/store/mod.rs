//! Persistence — the generic key-value store and the credential blob on top.

pub mod credentials;
pub mod kv;

pub use credentials::CredentialStore;
pub use kv::{FileKvStore, KvStore, MemoryKvStore};
