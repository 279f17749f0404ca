//! Domain types shared by the retrievers, the answer composer and the dataset.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub type EntryId = String;

/// A dataset row viewed as a generic field map (for summaries and diagnostics).
pub type Record = BTreeMap<&'static str, MetaValue>;

/// Scalar display value carried by entry metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Text(String),
    Integer(i64),
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Text(s) => f.write_str(s),
            MetaValue::Integer(i) => write!(f, "{i}"),
        }
    }
}

/// Display data attached to a corpus entry, one schema per corpus kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Metadata {
    Faq { question: String, answer: String, source: String },
    Document { text: String, source: String, page: u32 },
}

impl Metadata {
    pub fn source(&self) -> &str {
        match self {
            Metadata::Faq { source, .. } | Metadata::Document { source, .. } => source,
        }
    }

    /// Stored FAQ answer; `None` for document metadata.
    pub fn answer(&self) -> Option<&str> {
        match self {
            Metadata::Faq { answer, .. } => Some(answer),
            Metadata::Document { .. } => None,
        }
    }

    /// Chunk text; `None` for FAQ metadata.
    pub fn text(&self) -> Option<&str> {
        match self {
            Metadata::Document { text, .. } => Some(text),
            Metadata::Faq { .. } => None,
        }
    }
}

/// An item indexed by a retriever.
///
/// - `id`: unique within its corpus
/// - `content`: the text that gets vectorized
/// - `metadata`: display data, never indexed
///
/// Fields are private so an entry cannot change after it has been indexed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusEntry {
    id: EntryId,
    content: String,
    metadata: Metadata,
}

impl CorpusEntry {
    pub fn new(id: impl Into<EntryId>, content: impl Into<String>, metadata: Metadata) -> Self {
        Self { id: id.into(), content: content.into(), metadata }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

/// A scored match borrowed from the retriever that produced it.
///
/// `score` is the cosine similarity against the query; higher is better.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrieverHit<'a> {
    pub entry: &'a CorpusEntry,
    pub score: f32,
}

/// One curated question/answer pair from the FAQ file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaRecord {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub source: String,
}

impl QaRecord {
    pub fn to_record(&self) -> Record {
        Record::from([
            ("id", MetaValue::Text(self.id.clone())),
            ("question", MetaValue::Text(self.question.clone())),
            ("answer", MetaValue::Text(self.answer.clone())),
            ("source", MetaValue::Text(self.source.clone())),
        ])
    }
}

impl From<&QaRecord> for CorpusEntry {
    fn from(r: &QaRecord) -> Self {
        CorpusEntry::new(
            r.id.clone(),
            format!("{} {}", r.question, r.answer),
            Metadata::Faq { question: r.question.clone(), answer: r.answer.clone(), source: r.source.clone() },
        )
    }
}

/// A window of words cut from one page of the pricing document.
///
/// `id` is `pdf-PPP-CC` (1-based page and chunk-within-page), `source` is
/// `<file>#page=<P>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: String,
    pub page: u32,
    pub text: String,
    pub source: String,
}

impl DocumentChunk {
    pub fn to_record(&self) -> Record {
        Record::from([
            ("id", MetaValue::Text(self.id.clone())),
            ("page", MetaValue::Integer(i64::from(self.page))),
            ("text", MetaValue::Text(self.text.clone())),
            ("source", MetaValue::Text(self.source.clone())),
        ])
    }
}

impl From<&DocumentChunk> for CorpusEntry {
    fn from(c: &DocumentChunk) -> Self {
        CorpusEntry::new(
            c.id.clone(),
            c.text.clone(),
            Metadata::Document { text: c.text.clone(), source: c.source.clone(), page: c.page },
        )
    }
}
