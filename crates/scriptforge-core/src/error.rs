//! Failure taxonomy for provider calls.
//!
//! Classification is derived from status codes and message pattern matching
//! rather than structured error codes — upstream APIs are not required to
//! supply any. The taxonomy drives the cooldown policy: certainly-dead
//! credentials sit out for a long time, maybe-transient ones barely at all.

use chrono::Duration;

/// Classified outcome of one failed provider attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Credential rejected or revoked; permanent without user action.
    AuthInvalid,
    /// Temporary rate limit.
    RateLimited,
    /// Quota or billing exhaustion.
    QuotaExhausted,
    /// HTTP success carrying no usable content.
    EmptyResponse,
    /// Anything else; the credential stays in rotation.
    Transient,
}

impl FailureKind {
    /// How long the credential should sit out after this failure.
    ///
    /// `None` leaves the cooldown state untouched.
    pub fn cooldown(&self) -> Option<Duration> {
        match self {
            FailureKind::AuthInvalid => Some(Duration::days(365)),
            FailureKind::RateLimited => Some(Duration::seconds(60)),
            FailureKind::QuotaExhausted => Some(Duration::hours(24)),
            FailureKind::EmptyResponse | FailureKind::Transient => None,
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FailureKind::AuthInvalid => "invalid or revoked credential",
            FailureKind::RateLimited => "rate limited",
            FailureKind::QuotaExhausted => "quota exhausted",
            FailureKind::EmptyResponse => "empty response",
            FailureKind::Transient => "transient error",
        };
        f.write_str(label)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_cooldown_is_a_year() {
        assert_eq!(
            FailureKind::AuthInvalid.cooldown(),
            Some(Duration::days(365))
        );
    }

    #[test]
    fn test_rate_limit_cooldown_is_a_minute() {
        let cooldown = FailureKind::RateLimited.cooldown().unwrap();
        assert_eq!(cooldown, Duration::seconds(60));
        assert!(cooldown < Duration::days(1));
    }

    #[test]
    fn test_quota_cooldown_is_a_day() {
        assert_eq!(
            FailureKind::QuotaExhausted.cooldown(),
            Some(Duration::hours(24))
        );
    }

    #[test]
    fn test_soft_failures_leave_cooldown_alone() {
        assert!(FailureKind::Transient.cooldown().is_none());
        assert!(FailureKind::EmptyResponse.cooldown().is_none());
    }
}
