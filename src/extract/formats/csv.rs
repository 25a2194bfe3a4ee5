// src/extract/formats/csv.rs
use crate::error::{AnalyzerError, Result};
use crate::extract::types::{TextExtractor, UploadedDocument};

/// Tabular report exports. Rows are re-serialized into the labeled-line form
/// the report parser already understands ("Account Name: ...", one block per
/// row), under an ACCOUNTS header when the columns look like tradelines.
pub struct CsvExtractor;

const ACCOUNT_HEADER_HINTS: [&str; 6] = [
    "account",
    "creditor",
    "balance",
    "status",
    "opened",
    "bureau",
];

#[async_trait::async_trait]
impl TextExtractor for CsvExtractor {
    async fn extract(&self, doc: &UploadedDocument) -> Result<String> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(doc.bytes.as_slice());

        let headers = reader
            .headers()
            .map_err(|e| AnalyzerError::CsvParse(e.to_string()))?
            .clone();

        let looks_like_accounts = headers.iter().any(|h| {
            let h = h.to_ascii_lowercase();
            ACCOUNT_HEADER_HINTS.iter().any(|hint| h.contains(hint))
        });

        let mut out = String::new();
        if looks_like_accounts {
            out.push_str("ACCOUNTS\n\n");
        }

        for record in reader.records() {
            let record = record.map_err(|e| AnalyzerError::CsvParse(e.to_string()))?;
            for (header, value) in headers.iter().zip(record.iter()) {
                if !value.is_empty() {
                    out.push_str(&format!("{}: {}\n", label_for(header), value));
                }
            }
            out.push('\n');
        }

        Ok(out)
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}

/// Map common export column names onto the labels the parser's labeled-line
/// pass matches. Unknown columns keep their own name.
fn label_for(header: &str) -> String {
    let h = header.trim().to_ascii_lowercase().replace(['_', '-'], " ");
    match h.as_str() {
        "account" | "account name" | "creditor" | "creditor name" => "Account Name".into(),
        "account number" | "acct" | "acct number" | "number" => "Account Number".into(),
        "balance" | "current balance" | "amount" => "Balance".into(),
        "status" | "payment status" | "pay status" => "Payment Status".into(),
        "opened" | "date opened" | "open date" => "Date Opened".into(),
        "last activity" | "last reported" | "date of last activity" => "Last Activity".into(),
        "bureau" | "source" => "Bureau".into(),
        _ => header.trim().to_string(),
    }
}
