//! Log Redaction Layer
//!
//! Scrubs API keys and access tokens from strings prior to logging or
//! returning them to a calling agent.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9\-_]{16,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)|(AIza[0-9A-Za-z\-_]{30,})").unwrap()
});
static QUERY_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([?&](?:key|api_key|access_token)=)[^&\s]+").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    QUERY_KEY_RE
        .replace_all(&redacted, "${1}[REDACTED_TOKEN]")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction() {
        let raw = "OpenAI vision returned 401: bad key sk-abcdefghijklmnopqrstuvwxyz123456 with Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("sk-abcdefghijklmnopqrstuvwxyz123456"));
        assert!(!clean.contains("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
        assert!(clean.starts_with("OpenAI vision returned 401"));
    }

    #[test]
    fn test_query_key_redaction() {
        let raw = "error sending request for url (https://example.com/v1/models/x:generateContent?key=secret123&alt=json)";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("secret123"));
        assert!(clean.contains("?key=[REDACTED_TOKEN]&alt=json"));
    }

    #[test]
    fn test_plain_text_untouched() {
        let raw = "Technical Error processing video file: could not open video";
        assert_eq!(redact_sensitive_data(raw), raw);
    }
}
