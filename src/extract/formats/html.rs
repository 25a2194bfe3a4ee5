// src/extract/formats/html.rs
use crate::error::Result;
use crate::extract::types::{TextExtractor, UploadedDocument};
use once_cell::sync::Lazy;
use regex::Regex;

/// Saved bureau web pages. Script/style bodies are dropped, block-level tags
/// become line breaks so section headers stay on their own lines, then all
/// remaining markup is stripped and entities decoded.
pub struct HtmlExtractor;

static RE_SCRIPT_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)>").expect("script regex"));
static RE_BLOCK_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(br\s*/?|/p|/div|/tr|/li|/h[1-6]|/table)>").expect("break regex")
});
static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));

#[async_trait::async_trait]
impl TextExtractor for HtmlExtractor {
    async fn extract(&self, doc: &UploadedDocument) -> Result<String> {
        let raw = String::from_utf8_lossy(&doc.bytes);
        let no_scripts = RE_SCRIPT_STYLE.replace_all(&raw, "");
        let with_breaks = RE_BLOCK_BREAK.replace_all(&no_scripts, "\n");
        let no_tags = RE_TAGS.replace_all(&with_breaks, " ");
        Ok(html_escape::decode_html_entities(no_tags.as_ref()).into_owned())
    }

    fn name(&self) -> &'static str {
        "html"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::types::DocumentKind;

    fn doc(data: &str) -> UploadedDocument {
        UploadedDocument {
            file_name: "report.html".into(),
            kind: DocumentKind::Html,
            bytes: data.as_bytes().to_vec(),
        }
    }

    #[tokio::test]
    async fn strips_markup_and_keeps_section_lines() {
        let html = "<html><head><style>.x{color:red}</style></head><body>\
                    <h2>PERSONAL INFORMATION</h2><p>Name: JOHN Q CONSUMER</p>\
                    <script>alert('x')</script></body></html>";
        let text = HtmlExtractor.extract(&doc(html)).await.unwrap();
        assert!(text.contains("PERSONAL INFORMATION"));
        assert!(text.contains("Name: JOHN Q CONSUMER"));
        assert!(!text.contains("alert"));
        assert!(!text.contains("color:red"));
    }

    #[tokio::test]
    async fn decodes_entities() {
        let text = HtmlExtractor
            .extract(&doc("<p>Smith &amp; Sons &nbsp; $1,200</p>"))
            .await
            .unwrap();
        assert!(text.contains("Smith & Sons"));
    }
}
