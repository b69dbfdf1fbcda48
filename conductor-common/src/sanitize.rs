//! Scrubbing of free-form provider text before it reaches a health message

use regex::Regex;
use std::sync::OnceLock;

/// Longest sanitized message, in characters
pub const MAX_SANITIZED_LEN: usize = 200;

const REDACTED: &str = "[REDACTED]";

fn patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"sk-[A-Za-z0-9_\-]{8,}",
            r"(?i)bearer\s+[A-Za-z0-9._\-]+",
            r#"(?i)(api[_-]?key|token|secret|password)\s*[=:]\s*[^\s,;"']+"#,
        ]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
    })
}

/// Redact credential-shaped substrings and bound the length
///
/// Callers still must not put credential values into messages; this only
/// catches accidents in text that came from external tools.
pub fn sanitize_message(message: &str) -> String {
    let mut cleaned = message.trim().to_string();
    for pattern in patterns() {
        cleaned = pattern.replace_all(&cleaned, REDACTED).into_owned();
    }
    if cleaned.chars().count() > MAX_SANITIZED_LEN {
        cleaned = cleaned.chars().take(MAX_SANITIZED_LEN).collect::<String>() + "...";
    }
    cleaned
}
