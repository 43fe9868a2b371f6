use std::path::Path;

use crate::config::DocumentFormat;
use crate::error::LoadError;
use crate::processor::{file_name, read_bytes, DocumentProcessor, Payload, ProcessedContent};

/// Extracts the embedded text layer. Pages without text are skipped.
pub struct PdfProcessor;

impl PdfProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentProcessor for PdfProcessor {
    fn process(&self, path: &Path) -> Result<ProcessedContent, LoadError> {
        let _span = tracing::info_span!("processor.pdf").entered();

        let pdf_bytes = read_bytes(path)?;
        let doc = lopdf::Document::load_mem(&pdf_bytes)
            .map_err(|e| LoadError::PdfProcessing(format!("Failed to load PDF: {}", e)))?;

        let text = extract_text_from_pdf(&doc);
        if text.trim().is_empty() {
            tracing::warn!(
                filename = %crate::sanitize::redact_path(path),
                "PDF has no extractable text layer"
            );
        }

        Ok(ProcessedContent {
            filename: file_name(path, "document.pdf"),
            format: DocumentFormat::Pdf,
            payload: Payload::Text(text),
        })
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        matches!(format, DocumentFormat::Pdf)
    }
}

fn extract_text_from_pdf(doc: &lopdf::Document) -> String {
    let mut pages = Vec::new();
    for (page_num, _) in doc.get_pages() {
        match doc.extract_text(&[page_num]) {
            Ok(page_text) if !page_text.trim().is_empty() => pages.push(page_text),
            Ok(_) => {}
            Err(e) => tracing::debug!(page_num, error = %e, "Skipping unreadable PDF page"),
        }
    }
    pages.join("\n")
}
