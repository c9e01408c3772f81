//! Small helpers — data paths, filenames, secret redaction.

use std::path::PathBuf;

/// Get the ScriptForge data directory (e.g. `~/.scriptforge/`).
pub fn get_data_path() -> PathBuf {
    let home = home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".scriptforge")
}

/// Sanitize a string for use as a filename.
pub fn safe_filename(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Last four characters of a secret, for logs: `...abcd`.
pub fn redact_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let start = chars.len().saturating_sub(4);
    let tail: String = chars[start..].iter().collect();
    format!("...{}", tail)
}

/// Truncate a string to `max_len` characters, adding "..." if truncated.
/// Unicode-safe.
pub fn truncate_message(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Helper to get home directory.
fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("USERPROFILE").ok().map(PathBuf::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_long_secret() {
        assert_eq!(redact_secret("sk-or-v1-0123456789"), "...6789");
    }

    #[test]
    fn test_redact_short_secret() {
        assert_eq!(redact_secret("ab"), "...ab");
    }

    #[test]
    fn test_safe_filename() {
        assert_eq!(safe_filename("hub-settings"), "hub-settings");
        assert_eq!(safe_filename("a/b c"), "a_b_c");
    }

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate_message("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        let result = truncate_message("hello world, this is a long string", 15);
        assert_eq!(result, "hello world,...");
    }

    #[test]
    fn test_data_path_ends_with_scriptforge() {
        assert!(get_data_path().ends_with(".scriptforge"));
    }
}
