//! External AI provider clients.
//!
//! ARCHITECTURAL RULE: each provider has exactly one client module here and no
//! other module may call that provider's API directly. Failures are surfaced
//! immediately to the caller; there is no retry/backoff layer.

use thiserror::Error;

pub mod deepgram;
pub mod groq;
pub mod openai;

/// Connect/read timeout applied to every provider HTTP client.
pub const PROVIDER_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Provider returned empty content")]
    EmptyContent,
}

/// Extracts the first top-level JSON array from free-form model output.
/// Models occasionally wrap JSON in prose or code fences; slicing from the
/// first `[` to the last `]` recovers the payload.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Extracts the first top-level JSON object from free-form model output.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_array_from_prose() {
        let input = "Here are your questions:\n[{\"id\": \"q1\"}]\nEnjoy!";
        assert_eq!(extract_json_array(input), Some("[{\"id\": \"q1\"}]"));
    }

    #[test]
    fn test_extract_array_inside_fences() {
        let input = "```json\n[1, 2, 3]\n```";
        assert_eq!(extract_json_array(input), Some("[1, 2, 3]"));
    }

    #[test]
    fn test_extract_array_missing() {
        assert_eq!(extract_json_array("no json here"), None);
    }

    #[test]
    fn test_extract_object_from_prose() {
        let input = "Sure: {\"courseTitle\": \"Rust 101\"} done";
        assert_eq!(
            extract_json_object(input),
            Some("{\"courseTitle\": \"Rust 101\"}")
        );
    }

    #[test]
    fn test_extract_object_mismatched_braces() {
        assert_eq!(extract_json_object("} {"), None);
    }
}
