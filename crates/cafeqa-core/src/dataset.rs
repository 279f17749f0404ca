//! The two named record collections the pipeline indexes: `qa` and `documents`.

use std::path::Path;
use tracing::info;

use crate::data_processor::{ChunkingConfig, DataProcessor};
use crate::error::Result;
use crate::faq::load_faq;
use crate::traits::PageSource;
use crate::types::{DocumentChunk, QaRecord, Record};

pub const QA_SPLIT: &str = "qa";
pub const DOCUMENTS_SPLIT: &str = "documents";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    qa: Vec<QaRecord>,
    documents: Vec<DocumentChunk>,
}

/// Read-only view of one named split.
#[derive(Debug, Clone, Copy)]
pub enum Split<'a> {
    Qa(&'a [QaRecord]),
    Documents(&'a [DocumentChunk]),
}

impl Split<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Split::Qa(_) => QA_SPLIT,
            Split::Documents(_) => DOCUMENTS_SPLIT,
        }
    }

    pub fn num_rows(&self) -> usize {
        match self {
            Split::Qa(rows) => rows.len(),
            Split::Documents(rows) => rows.len(),
        }
    }

    pub fn row(&self, index: usize) -> Option<Record> {
        match self {
            Split::Qa(rows) => rows.get(index).map(QaRecord::to_record),
            Split::Documents(rows) => rows.get(index).map(DocumentChunk::to_record),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = Record> + '_ {
        (0..self.num_rows()).filter_map(move |i| self.row(i))
    }
}

impl Dataset {
    pub fn new(qa: Vec<QaRecord>, documents: Vec<DocumentChunk>) -> Self {
        Self { qa, documents }
    }

    pub fn qa(&self) -> &[QaRecord] { &self.qa }
    pub fn documents(&self) -> &[DocumentChunk] { &self.documents }

    pub fn split(&self, name: &str) -> Option<Split<'_>> {
        match name {
            QA_SPLIT => Some(Split::Qa(&self.qa)),
            DOCUMENTS_SPLIT => Some(Split::Documents(&self.documents)),
            _ => None,
        }
    }

    pub fn splits(&self) -> [Split<'_>; 2] {
        [Split::Qa(&self.qa), Split::Documents(&self.documents)]
    }
}

/// Load the FAQ file and chunk the document pages into a [`Dataset`].
pub fn build_dataset(
    faq_path: &Path,
    pages: &dyn PageSource,
    qa_limit: Option<usize>,
    chunking: ChunkingConfig,
    show_progress: bool,
) -> Result<Dataset> {
    let qa = load_faq(faq_path, qa_limit)?;
    let documents = DataProcessor::new(chunking).with_progress(show_progress).process_pages(pages)?;
    info!(qa = qa.len(), documents = documents.len(), "dataset ready");
    Ok(Dataset::new(qa, documents))
}
