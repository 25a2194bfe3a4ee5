// src/extract/formats/mod.rs
pub mod csv;
pub mod html;
pub mod pdf;
pub mod plain;

use crate::extract::types::{DocumentKind, TextExtractor};

/// Pick the extractor for a validated upload.
pub fn extractor_for(kind: DocumentKind) -> Box<dyn TextExtractor> {
    match kind {
        DocumentKind::Pdf => Box::new(pdf::PdfExtractor),
        DocumentKind::Csv => Box::new(csv::CsvExtractor),
        DocumentKind::Html => Box::new(html::HtmlExtractor),
        DocumentKind::Plain => Box::new(plain::PlainTextExtractor),
    }
}
