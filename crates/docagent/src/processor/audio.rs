use std::path::Path;

use crate::config::DocumentFormat;
use crate::error::LoadError;
use crate::processor::{file_name, read_bytes, DocumentProcessor, Payload, ProcessedContent};

/// Reads audio bytes for transcription.
pub struct AudioProcessor;

impl AudioProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AudioProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentProcessor for AudioProcessor {
    fn process(&self, path: &Path) -> Result<ProcessedContent, LoadError> {
        Ok(ProcessedContent {
            filename: file_name(path, "audio"),
            format: DocumentFormat::Audio,
            payload: Payload::Audio(read_bytes(path)?),
        })
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        matches!(format, DocumentFormat::Audio)
    }
}
