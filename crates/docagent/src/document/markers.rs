//! Out-of-band tags that upstream loaders embed in document content.
//!
//! Markers are ground truth: they take precedence over any classifier.

/// Leading tag on content produced by audio transcription.
pub const AUDIO_TRANSCRIPT: &str = "[METADATA: AUDIO_TRANSCRIPT]";

/// Opening delimiter of an embedded base64 image.
pub const IMAGE_BASE64_START: &str = "[METADATA: IMAGE_Base64_START]";

/// Closing delimiter of an embedded base64 image.
pub const IMAGE_BASE64_END: &str = "[METADATA: IMAGE_Base64_END]";

/// True when content starts with the audio tag (leading whitespace ignored).
pub fn is_audio_transcript(content: &str) -> bool {
    content.trim_start().starts_with(AUDIO_TRANSCRIPT)
}

/// Content with the leading audio tag removed, trimmed.
pub fn strip_audio_marker(content: &str) -> &str {
    let trimmed = content.trim_start();
    trimmed
        .strip_prefix(AUDIO_TRANSCRIPT)
        .unwrap_or(trimmed)
        .trim()
}

pub fn tag_audio_transcript(transcript: &str) -> String {
    format!("{}\n{}", AUDIO_TRANSCRIPT, transcript.trim())
}

/// True when both image delimiters are present, in order.
pub fn has_image_payload(content: &str) -> bool {
    image_payload(content).is_some()
}

/// The trimmed text between the image delimiters, if both are present in order.
pub fn image_payload(content: &str) -> Option<&str> {
    let start = content.find(IMAGE_BASE64_START)? + IMAGE_BASE64_START.len();
    let end = content[start..].find(IMAGE_BASE64_END)? + start;
    Some(content[start..end].trim())
}

pub fn wrap_image_payload(base64: &str) -> String {
    format!("{}{}{}", IMAGE_BASE64_START, base64, IMAGE_BASE64_END)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_marker_detection() {
        assert!(is_audio_transcript("[METADATA: AUDIO_TRANSCRIPT] hello"));
        assert!(is_audio_transcript("\n  [METADATA: AUDIO_TRANSCRIPT]hello"));
        assert!(!is_audio_transcript("hello [METADATA: AUDIO_TRANSCRIPT]"));
    }

    #[test]
    fn test_strip_audio_marker() {
        assert_eq!(
            strip_audio_marker("[METADATA: AUDIO_TRANSCRIPT]\n Call mom tomorrow. "),
            "Call mom tomorrow."
        );
        assert_eq!(strip_audio_marker("no marker"), "no marker");
    }

    #[test]
    fn test_tag_then_detect() {
        let tagged = tag_audio_transcript("  meeting notes ");
        assert!(is_audio_transcript(&tagged));
        assert_eq!(strip_audio_marker(&tagged), "meeting notes");
    }

    #[test]
    fn test_image_payload_extraction() {
        let content = "prefix [METADATA: IMAGE_Base64_START]AAAA[METADATA: IMAGE_Base64_END] suffix";
        assert_eq!(image_payload(content), Some("AAAA"));
        assert!(has_image_payload(content));
    }

    #[test]
    fn test_image_payload_requires_both_delimiters_in_order() {
        assert_eq!(image_payload("[METADATA: IMAGE_Base64_START]AAAA"), None);
        assert_eq!(
            image_payload("[METADATA: IMAGE_Base64_END]AAAA[METADATA: IMAGE_Base64_START]"),
            None
        );
    }

    #[test]
    fn test_wrap_image_payload() {
        assert_eq!(image_payload(&wrap_image_payload("iVBOR")), Some("iVBOR"));
    }
}
