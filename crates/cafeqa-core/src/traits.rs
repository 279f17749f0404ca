use crate::error::Result;
use crate::types::{CorpusEntry, RetrieverHit};

/// A fitted, read-only index over a fixed corpus.
pub trait Retriever: Send + Sync {
    /// Up to `top_k` entries ranked by similarity to `query`, best first.
    fn search(&self, query: &str, top_k: usize) -> Vec<RetrieverHit<'_>>;
    fn entries(&self) -> &[CorpusEntry];
}

/// Supplies the raw text of a paginated document.
pub trait PageSource {
    /// Short name used when tagging chunks (`<label>#page=<n>`).
    fn label(&self) -> String;
    /// Raw text per page, in page order. Unreadable pages come back empty.
    fn pages(&self) -> Result<Vec<String>>;
}
