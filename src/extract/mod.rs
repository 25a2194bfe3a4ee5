// src/extract/mod.rs
pub mod formats;
pub mod types;

use crate::error::{AnalyzerError, Result};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use types::{DocumentKind, UploadedDocument};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("extract_accepted_total", "Uploads accepted after validation.");
        describe_counter!(
            "extract_rejected_total",
            "Uploads rejected by size/format validation."
        );
        describe_counter!(
            "extract_empty_total",
            "Accepted uploads that produced empty text."
        );
        describe_histogram!("extract_ms", "Text extraction time in milliseconds.");
    });
}

/// Hard cap on normalized text size fed to the parser (characters).
const MAX_TEXT_CHARS: usize = 2_000_000;

/// Extension allow-list plus content signature cross-check: a ".pdf"
/// without the `%PDF-` magic, or PDF bytes smuggled under a text extension,
/// never reaches an extractor.
pub fn detect_kind(file_name: &str, bytes: &[u8]) -> Result<DocumentKind> {
    let ext = file_name
        .rsplit('.')
        .next()
        .filter(|e| *e != file_name)
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let is_pdf_content = bytes.starts_with(b"%PDF-");

    let kind = match ext.as_str() {
        "pdf" => {
            if !is_pdf_content {
                return Err(AnalyzerError::UnsupportedFormat(
                    "pdf extension without PDF signature".into(),
                ));
            }
            DocumentKind::Pdf
        }
        "csv" => DocumentKind::Csv,
        "html" | "htm" => DocumentKind::Html,
        "txt" | "text" => DocumentKind::Plain,
        other => {
            return Err(AnalyzerError::UnsupportedFormat(format!(
                "extension '{other}' is not allowed"
            )))
        }
    };

    // Content smuggled under a text-family extension.
    if kind != DocumentKind::Pdf {
        if is_pdf_content {
            return Err(AnalyzerError::UnsupportedFormat(
                "PDF content under a text extension".into(),
            ));
        }
        if bytes.iter().take(4096).any(|b| *b == 0) {
            return Err(AnalyzerError::UnsupportedFormat(
                "binary content under a text extension".into(),
            ));
        }
    }

    Ok(kind)
}

/// Validate an upload: size cap and format allow-list.
pub fn validate_upload(file_name: &str, bytes: Vec<u8>, max_bytes: u64) -> Result<UploadedDocument> {
    ensure_metrics_described();

    if bytes.is_empty() {
        counter!("extract_rejected_total").increment(1);
        return Err(AnalyzerError::UnsupportedFormat("empty upload".into()));
    }
    if bytes.len() as u64 > max_bytes {
        counter!("extract_rejected_total").increment(1);
        return Err(AnalyzerError::TooLarge {
            limit_mb: max_bytes / (1024 * 1024),
            actual: bytes.len() as u64,
        });
    }

    match detect_kind(file_name, &bytes) {
        Ok(kind) => {
            counter!("extract_accepted_total").increment(1);
            Ok(UploadedDocument {
                file_name: file_name.to_string(),
                kind,
                bytes,
            })
        }
        Err(e) => {
            counter!("extract_rejected_total").increment(1);
            Err(e)
        }
    }
}

/// Normalize extracted text for the parser. Line structure is load-bearing
/// (section headers and account blocks are line-oriented), so whitespace is
/// collapsed within lines, never across them.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode (cheap no-op for non-HTML sources)
    let decoded = html_escape::decode_html_entities(s);

    // 2) Normalize “ ” ‘ ’ « » to ASCII quotes
    let quoted = decoded
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 3) Per-line: strip control chars, collapse inner whitespace, trim
    let mut lines: Vec<String> = Vec::new();
    for line in quoted.lines() {
        let clean: String = line
            .chars()
            .filter(|c| !c.is_control() || *c == '\t')
            .collect();
        lines.push(clean.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    // 4) Collapse runs of blank lines into one (block separators survive)
    let mut out = String::with_capacity(s.len().min(MAX_TEXT_CHARS));
    let mut last_blank = false;
    for line in &lines {
        if line.is_empty() {
            if !last_blank && !out.is_empty() {
                out.push('\n');
            }
            last_blank = true;
        } else {
            out.push_str(line);
            out.push('\n');
            last_blank = false;
        }
    }

    // 5) Size cap
    if out.chars().count() > MAX_TEXT_CHARS {
        out = out.chars().take(MAX_TEXT_CHARS).collect();
    }

    out.trim_end().to_string()
}

/// Run extraction for a validated upload and normalize the result.
pub async fn extract_text(doc: &UploadedDocument) -> Result<String> {
    ensure_metrics_described();

    let started = std::time::Instant::now();
    let extractor = formats::extractor_for(doc.kind);
    let raw = extractor.extract(doc).await?;
    histogram!("extract_ms").record(started.elapsed().as_millis() as f64);

    let text = normalize_text(&raw);
    if text.is_empty() {
        counter!("extract_empty_total").increment(1);
        tracing::warn!(
            format = extractor.name(),
            doc = %crate::redact::anon_hash(&doc.file_name),
            "extraction produced empty text"
        );
    }
    Ok(text)
}
