//! Shared failure matchers.
//!
//! Upstream APIs return errors as free text more often than as structured
//! codes, so classification is pattern matching over the status code and
//! message. The CJK alternatives cover token-state messages emitted by
//! OpenAI-compatible gateway deployments.
//!
//! Precedence: auth, then rate limit, then quota. A message that mentions
//! both a rate limit and quota terms is a rate limit — a 429 is usually
//! momentary, and misreading it as quota exhaustion would bench a healthy
//! credential for a day.

use std::sync::OnceLock;

use regex::Regex;

use scriptforge_core::FailureKind;

use crate::traits::RawFailure;

fn auth_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)401|unauthorized|invalid api key|令牌状态不可用|该令牌已过期")
            .expect("auth pattern must compile")
    })
}

fn rate_limit_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)429|rate limit").expect("rate limit pattern must compile"))
}

fn quota_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)quota|billing|insufficient_quota|resource_exhausted")
            .expect("quota pattern must compile")
    })
}

/// Classify one failed attempt.
pub fn classify_failure(failure: &RawFailure) -> FailureKind {
    let message = &failure.message;

    if failure.status == Some(401) || auth_pattern().is_match(message) {
        return FailureKind::AuthInvalid;
    }
    if failure.status == Some(429) || rate_limit_pattern().is_match(message) {
        return FailureKind::RateLimited;
    }
    if quota_pattern().is_match(message) {
        return FailureKind::QuotaExhausted;
    }
    FailureKind::Transient
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_401_status_is_auth() {
        let f = RawFailure::http(401, "nope");
        assert_eq!(classify_failure(&f), FailureKind::AuthInvalid);
    }

    #[test]
    fn test_auth_message_without_status() {
        let f = RawFailure::transport("Invalid API key provided");
        assert_eq!(classify_failure(&f), FailureKind::AuthInvalid);
    }

    #[test]
    fn test_gateway_token_messages_are_auth() {
        let f = RawFailure::http(400, "该令牌已过期");
        assert_eq!(classify_failure(&f), FailureKind::AuthInvalid);
        let f = RawFailure::http(400, "令牌状态不可用");
        assert_eq!(classify_failure(&f), FailureKind::AuthInvalid);
    }

    #[test]
    fn test_429_status_is_rate_limited() {
        let f = RawFailure::http(429, "slow down");
        assert_eq!(classify_failure(&f), FailureKind::RateLimited);
    }

    #[test]
    fn test_rate_limit_message() {
        let f = RawFailure::transport("Rate limit reached for requests");
        assert_eq!(classify_failure(&f), FailureKind::RateLimited);
    }

    #[test]
    fn test_rate_limit_wins_over_quota_terms() {
        // "You exceeded your current quota" plus a rate-limit mention is
        // still a rate limit, not a day-long quota bench.
        let f = RawFailure::http(429, "rate limit: quota exceeded for this minute");
        assert_eq!(classify_failure(&f), FailureKind::RateLimited);
    }

    #[test]
    fn test_quota_message() {
        let f = RawFailure::http(403, "insufficient_quota: check your billing");
        assert_eq!(classify_failure(&f), FailureKind::QuotaExhausted);
    }

    #[test]
    fn test_resource_exhausted_is_quota() {
        let f = RawFailure::transport("RESOURCE_EXHAUSTED: daily limit reached");
        assert_eq!(classify_failure(&f), FailureKind::QuotaExhausted);
    }

    #[test]
    fn test_anything_else_is_transient() {
        let f = RawFailure::http(500, "internal server error");
        assert_eq!(classify_failure(&f), FailureKind::Transient);
        let f = RawFailure::transport("connection reset by peer");
        assert_eq!(classify_failure(&f), FailureKind::Transient);
    }
}
