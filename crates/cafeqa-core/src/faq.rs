//! Loader for the curated FAQ file: a JSON list of `{question, answer}` objects.

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::types::QaRecord;

pub const DEFAULT_QA_LIMIT: usize = 10;

/// Read and validate the FAQ file at `path`. See [`parse_faq`] for the row rules.
pub fn load_faq(path: &Path, limit: Option<usize>) -> Result<Vec<QaRecord>> {
    let raw = fs::read_to_string(path)?;
    let source = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let records = parse_faq(&raw, &source, limit)?;
    info!(path = %path.display(), rows = records.len(), "loaded FAQ");
    Ok(records)
}

/// Parse FAQ JSON into records tagged with `source`.
///
/// Rows whose trimmed question or answer is empty, missing or not a string are
/// skipped. Collection stops at `limit` valid rows. With a limit, having fewer
/// than `min(limit, total_rows)` valid rows is an error.
pub fn parse_faq(raw: &str, source: &str, limit: Option<usize>) -> Result<Vec<QaRecord>> {
    let data: Value = serde_json::from_str(raw)?;
    let Value::Array(rows) = data else {
        return Err(Error::MalformedSource(format!("Expected a list of QA records in {source}")));
    };

    let mut records = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        if limit.is_some_and(|l| records.len() >= l) {
            break;
        }
        let question = field(row, "question");
        let answer = field(row, "answer");
        if question.is_empty() || answer.is_empty() {
            warn!(row = idx + 1, "skipping malformed FAQ row");
            continue;
        }
        records.push(QaRecord {
            id: format!("qa-{:03}", idx + 1),
            question: question.to_string(),
            answer: answer.to_string(),
            source: source.to_string(),
        });
    }

    if let Some(limit) = limit {
        if records.len() < limit.min(rows.len()) {
            return Err(Error::InsufficientData(format!(
                "Only {} valid QA pairs found, expected at least {}",
                records.len(),
                limit
            )));
        }
    }
    Ok(records)
}

fn field<'a>(row: &'a Value, key: &str) -> &'a str {
    row.get(key).and_then(Value::as_str).map_or("", str::trim)
}
