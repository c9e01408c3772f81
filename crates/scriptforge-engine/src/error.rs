//! Dispatcher-level errors.
//!
//! Per-credential failures are classified and absorbed inside the retry
//! loop; only these aggregate outcomes reach the caller, each rendering as
//! one descriptive string.

use scriptforge_core::Provider;

/// Terminal outcome of a dispatch that produced no text.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum DispatchError {
    /// No credential for this provider exists at all.
    #[error("no credentials configured for {provider}; add one before generating")]
    NoCredentialsConfigured { provider: Provider },

    /// Credentials exist but every one is cooling down or out of quota.
    #[error("all credentials for {provider} are cooling down or out of quota; retry later")]
    AllCredentialsExhausted { provider: Provider },

    /// Every usable credential was tried once and failed.
    #[error("all credentials for {provider} failed:\n- {}", .attempts.join("\n- "))]
    AllAttemptsFailed {
        provider: Provider,
        /// One redacted line per attempted credential.
        attempts: Vec<String>,
    },
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_credentials_message() {
        let err = DispatchError::NoCredentialsConfigured {
            provider: Provider::Gemini,
        };
        assert!(err.to_string().contains("no credentials configured for Gemini"));
    }

    #[test]
    fn test_exhausted_message() {
        let err = DispatchError::AllCredentialsExhausted {
            provider: Provider::Hub,
        };
        assert!(err.to_string().contains("cooling down or out of quota"));
    }

    #[test]
    fn test_aggregate_lists_every_attempt() {
        let err = DispatchError::AllAttemptsFailed {
            provider: Provider::OpenAi,
            attempts: vec![
                "...abcd: rate limited ([429] slow down)".to_string(),
                "...wxyz: invalid or revoked credential ([401] bad key)".to_string(),
            ],
        };
        let rendered = err.to_string();
        assert!(rendered.contains("...abcd"));
        assert!(rendered.contains("...wxyz"));
        assert_eq!(rendered.matches("\n- ").count(), 2);
    }
}
