//! Helpers for sanitizing data before it enters tracing span attributes
//! or LLM prompts.
//!
//! Logs are safe to share for debugging; these functions ensure no full
//! paths or oversized document bodies leak into spans.

use std::path::Path;

/// Returns only the filename component of a path (no directory).
///
/// Safe for span fields: reveals file name without exposing the full path.
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Returns at most `max_chars` characters of `text`, never splitting a
/// UTF-8 code point.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Returns a short prefix of a fingerprint for log correlation.
pub fn short_hash(fingerprint: &str) -> &str {
    preview(fingerprint, 12)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_path_returns_filename() {
        assert_eq!(
            redact_path(Path::new("/home/user/Documents/invoice.pdf")),
            "invoice.pdf"
        );
    }

    #[test]
    fn test_redact_path_no_filename() {
        assert_eq!(redact_path(Path::new("/")), "<unknown>");
    }

    #[test]
    fn test_preview_shorter_than_limit() {
        assert_eq!(preview("abc", 10), "abc");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("héllo wörld", 4), "héll");
        assert_eq!(preview("ääää", 2), "ää");
    }

    #[test]
    fn test_preview_zero() {
        assert_eq!(preview("abc", 0), "");
    }

    #[test]
    fn test_short_hash() {
        let fp = "0123456789abcdef0123";
        assert_eq!(short_hash(fp), "0123456789ab");
    }
}
