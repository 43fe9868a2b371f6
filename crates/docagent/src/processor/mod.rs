//! Turns files on disk into content strings the decision loop understands.
//!
//! Text and PDF become plain text. Images are embedded as base64 between
//! the image markers. Audio is transcribed and tagged with the audio marker.

pub mod audio;
pub mod image;
pub mod pdf;
pub mod text;

use std::path::Path;

use crate::capability::Transcriber;
use crate::config::DocumentFormat;
use crate::document::markers;
use crate::error::{CapabilityError, LoadError};
use crate::sanitize;

/// What a processor read from disk, before any capability is involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Audio(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct ProcessedContent {
    pub filename: String,
    pub format: DocumentFormat,
    pub payload: Payload,
}

pub trait DocumentProcessor: Send + Sync {
    fn process(&self, path: &Path) -> Result<ProcessedContent, LoadError>;
    fn supports(&self, format: DocumentFormat) -> bool;
}

/// A document ready for ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub filename: String,
    pub content: String,
}

pub struct ProcessorRegistry {
    processors: Vec<Box<dyn DocumentProcessor>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self {
            processors: vec![
                Box::new(text::TextProcessor::new()),
                Box::new(pdf::PdfProcessor::new()),
                Box::new(image::ImageProcessor::new()),
                Box::new(audio::AudioProcessor::new()),
            ],
        }
    }

    pub fn process(&self, path: &Path) -> Result<ProcessedContent, LoadError> {
        let format = DocumentFormat::from_path(path).ok_or_else(|| {
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            LoadError::UnsupportedFormat(extension.to_string())
        })?;

        for processor in &self.processors {
            if processor.supports(format) {
                return processor.process(path);
            }
        }

        Err(LoadError::UnsupportedFormat(format!("{:?}", format)))
    }

    /// Reads `path` and produces its content string, transcribing audio.
    pub async fn load(
        &self,
        path: &Path,
        transcriber: Option<&dyn Transcriber>,
    ) -> Result<LoadedDocument, LoadError> {
        let processed = self.process(path)?;
        let content = match processed.payload {
            Payload::Text(text) => text,
            Payload::Audio(bytes) => {
                let transcriber = transcriber.ok_or_else(|| {
                    CapabilityError::Unavailable("no transcriber configured".to_string())
                })?;
                let transcript = transcriber.transcribe(&bytes, &processed.filename).await?;
                markers::tag_audio_transcript(&transcript)
            }
        };

        tracing::debug!(
            filename = %sanitize::redact_path(path),
            format = ?processed.format,
            chars = content.chars().count(),
            "Loaded document"
        );

        Ok(LoadedDocument {
            filename: processed.filename,
            content,
        })
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// File name for display and storage, without the directory.
pub(crate) fn file_name(path: &Path, fallback: &str) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(fallback)
        .to_string()
}

pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|e| LoadError::ReadDocument {
        path: path.to_path_buf(),
        source: e,
    })
}
