// src/extract/types.rs
use crate::error::Result;

/// Upload formats we accept. Detection cross-checks the file extension
/// against content signatures; a mismatch is rejected before extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Csv,
    Html,
    Plain,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Csv => "csv",
            DocumentKind::Html => "html",
            DocumentKind::Plain => "plain",
        }
    }
}

/// A validated upload, ready for text extraction.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

#[async_trait::async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, doc: &UploadedDocument) -> Result<String>;
    fn name(&self) -> &'static str;
}
