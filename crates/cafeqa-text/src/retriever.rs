use std::time::Instant;
use tracing::debug;

use cafeqa_core::error::{Error, Result};
use cafeqa_core::traits::Retriever;
use cafeqa_core::types::{CorpusEntry, RetrieverHit};

use crate::vectorizer::{cosine, SparseVector, TfidfOptions, TfidfVectorizer};

/// In-memory TF-IDF index over a fixed corpus, ranked by cosine similarity.
///
/// The vector space is fitted once in [`TfidfRetriever::new`]; there is no way
/// to add or re-weight entries afterwards.
pub struct TfidfRetriever {
	corpus: Vec<CorpusEntry>,
	vectorizer: TfidfVectorizer,
	matrix: Vec<SparseVector>,
}

impl TfidfRetriever {
	pub fn new(corpus: Vec<CorpusEntry>, options: TfidfOptions) -> Result<Self> {
		if corpus.is_empty() { return Err(Error::EmptyCorpus); }
		let contents: Vec<&str> = corpus.iter().map(CorpusEntry::content).collect();
		let (vectorizer, matrix) = TfidfVectorizer::fit_transform(&contents, options)?;
		debug!(entries = corpus.len(), vocabulary = vectorizer.vocabulary_len(), "fitted tf-idf index");
		Ok(Self { corpus, vectorizer, matrix })
	}

	pub fn corpus(&self) -> impl Iterator<Item = &CorpusEntry> { self.corpus.iter() }

	pub fn len(&self) -> usize { self.corpus.len() }

	/// Always false: construction rejects empty corpora.
	pub fn is_empty(&self) -> bool { self.corpus.is_empty() }

	pub fn vocabulary_len(&self) -> usize { self.vectorizer.vocabulary_len() }

	/// Rank the corpus against `query` and keep the best `top_k` (at least one).
	///
	/// Blank queries return no hits. Scores that come out `NaN` (a query with no
	/// known terms) count as zero. Equal scores keep corpus order.
	pub fn search(&self, query: &str, top_k: usize) -> Vec<RetrieverHit<'_>> {
		if query.trim().is_empty() { return Vec::new(); }
		let start = Instant::now();
		let top_k = top_k.max(1);
		let query_vec = self.vectorizer.transform(query);

		#[allow(clippy::cast_possible_truncation)]
		let mut scored: Vec<(usize, f32)> = self.matrix.iter().enumerate()
			.map(|(i, row)| { let s = cosine(&query_vec, row) as f32; (i, if s.is_nan() { 0.0 } else { s }) })
			.collect();
		scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
		scored.truncate(top_k);

		debug!(query_terms = query_vec.len(), hits = scored.len(), elapsed_us = start.elapsed().as_micros() as u64, "tf-idf search");
		scored.into_iter().map(|(i, score)| RetrieverHit { entry: &self.corpus[i], score }).collect()
	}
}

impl Retriever for TfidfRetriever {
	fn search(&self, query: &str, top_k: usize) -> Vec<RetrieverHit<'_>> { Self::search(self, query, top_k) }
	fn entries(&self) -> &[CorpusEntry] { &self.corpus }
}
