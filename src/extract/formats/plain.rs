// src/extract/formats/plain.rs
use crate::error::Result;
use crate::extract::types::{TextExtractor, UploadedDocument};

/// Plain text reports pass through as-is (lossy UTF-8 for stray bytes).
pub struct PlainTextExtractor;

#[async_trait::async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, doc: &UploadedDocument) -> Result<String> {
        Ok(String::from_utf8_lossy(&doc.bytes).into_owned())
    }

    fn name(&self) -> &'static str {
        "plain"
    }
}
