use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

use crate::config::DocumentFormat;
use crate::document::markers::wrap_image_payload;
use crate::error::LoadError;
use crate::processor::{file_name, read_bytes, DocumentProcessor, Payload, ProcessedContent};

/// Embeds the raw image bytes as base64. Text is recovered later by the
/// vision capability, not here.
pub struct ImageProcessor;

impl ImageProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentProcessor for ImageProcessor {
    fn process(&self, path: &Path) -> Result<ProcessedContent, LoadError> {
        let _span = tracing::info_span!("processor.image").entered();

        let image_data = read_bytes(path)?;
        let encoded = STANDARD.encode(&image_data);

        Ok(ProcessedContent {
            filename: file_name(path, "image"),
            format: DocumentFormat::Image,
            payload: Payload::Text(wrap_image_payload(&encoded)),
        })
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        matches!(format, DocumentFormat::Image)
    }
}
