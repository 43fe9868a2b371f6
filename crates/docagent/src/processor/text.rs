use std::path::Path;

use crate::config::DocumentFormat;
use crate::error::LoadError;
use crate::processor::{file_name, read_bytes, DocumentProcessor, Payload, ProcessedContent};

pub struct TextProcessor;

impl TextProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentProcessor for TextProcessor {
    fn process(&self, path: &Path) -> Result<ProcessedContent, LoadError> {
        let bytes = read_bytes(path)?;
        let text = String::from_utf8(bytes).map_err(|_| LoadError::InvalidText {
            path: path.to_path_buf(),
        })?;

        Ok(ProcessedContent {
            filename: file_name(path, "document.txt"),
            format: DocumentFormat::Text,
            payload: Payload::Text(text),
        })
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        matches!(format, DocumentFormat::Text)
    }
}
