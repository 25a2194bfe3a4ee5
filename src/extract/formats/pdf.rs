// src/extract/formats/pdf.rs
use crate::error::{AnalyzerError, Result};
use crate::extract::types::{TextExtractor, UploadedDocument};

/// PDF text extraction via `pdf-extract`, with `lopdf` supplying document
/// structure for sanity logging. Scanned PDFs with no text layer come back
/// empty; that is not an error here, since the parser degrades and the
/// detector pads generic issues downstream.
pub struct PdfExtractor;

#[async_trait::async_trait]
impl TextExtractor for PdfExtractor {
    async fn extract(&self, doc: &UploadedDocument) -> Result<String> {
        // Structure check first: page count for telemetry, and an early
        // rejection of files that only pretend to be PDFs.
        match lopdf::Document::load_mem(&doc.bytes) {
            Ok(d) => {
                let pages = d.get_pages().len();
                tracing::debug!(pages, file = %doc.file_name, "pdf structure loaded");
            }
            Err(e) => {
                tracing::warn!(error = %e, file = %doc.file_name, "lopdf could not read structure");
            }
        }

        let bytes = doc.bytes.clone();
        // pdf-extract is CPU-bound; keep it off the async worker.
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes)
        })
        .await
        .map_err(|e| AnalyzerError::PdfExtraction(format!("extraction task failed: {e}")))?
        .map_err(|e| AnalyzerError::PdfExtraction(e.to_string()))?;

        if text.trim().is_empty() {
            tracing::warn!(file = %doc.file_name, "pdf has no text layer; returning empty text");
        }
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "pdf"
    }
}
