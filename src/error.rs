//! Typed errors for the analysis pipeline.
//!
//! The HTTP layer maps these onto status codes; most pipeline stages prefer
//! degraded output (empty fields, padded issues, fallback letters) over
//! returning an error at all, so the surface here is small.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("upload exceeds the {limit_mb} MB limit ({actual} bytes)")]
    TooLarge { limit_mb: u64, actual: u64 },

    #[error("unsupported or mismatched upload format: {0}")]
    UnsupportedFormat(String),

    #[error("pdf text extraction failed: {0}")]
    PdfExtraction(String),

    #[error("csv parse failed: {0}")]
    CsvParse(String),

    #[error("letter template error: {0}")]
    Template(String),

    #[error("unknown session: {0}")]
    UnknownSession(String),

    #[error("unknown letter: {0}")]
    UnknownLetter(String),

    #[error("invalid letter status transition: {from} -> {to}")]
    InvalidStatusTransition { from: String, to: String },
}
