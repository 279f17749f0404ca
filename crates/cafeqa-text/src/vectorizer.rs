//! TF-IDF vector space: vocabulary fitting, smoothed IDF, L2-normalized sparse rows.

use std::collections::{BTreeMap, HashMap, HashSet};

use cafeqa_core::error::{Error, Result};

use crate::tantivy_utils::{build_analyzer, ngrams, strip_accents, tokenize};

/// `(column, weight)` pairs sorted by column.
pub type SparseVector = Vec<(usize, f64)>;

#[derive(Debug, Clone, PartialEq)]
pub struct TfidfOptions {
	/// Inclusive n-gram lengths, e.g. `(1, 2)` for unigrams and bigrams.
	pub ngram_range: (usize, usize),
	/// Minimum number of documents a term must appear in.
	pub min_df: usize,
	/// Maximum fraction of documents a term may appear in, in `(0, 1]`.
	pub max_df: f64,
	pub lowercase: bool,
	pub strip_accents: bool,
}

impl Default for TfidfOptions {
	fn default() -> Self {
		Self { ngram_range: (1, 2), min_df: 1, max_df: 1.0, lowercase: true, strip_accents: true }
	}
}

impl TfidfOptions {
	pub fn validate(&self) -> Result<()> {
		let (min_n, max_n) = self.ngram_range;
		if min_n == 0 || min_n > max_n {
			return Err(Error::InvalidConfig(format!("invalid ngram_range ({min_n}, {max_n})")));
		}
		if self.min_df == 0 {
			return Err(Error::InvalidConfig("min_df must be at least 1".into()));
		}
		if !(self.max_df > 0.0 && self.max_df <= 1.0) {
			return Err(Error::InvalidConfig(format!("max_df must be in (0, 1], got {}", self.max_df)));
		}
		Ok(())
	}
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
	options: TfidfOptions,
	vocabulary: HashMap<String, usize>,
	idf: Vec<f64>,
}

impl TfidfVectorizer {
	/// Learn vocabulary and IDF from `docs` and return the weighted document rows.
	pub fn fit_transform<S: AsRef<str>>(docs: &[S], options: TfidfOptions) -> Result<(Self, Vec<SparseVector>)> {
		options.validate()?;
		if docs.is_empty() {
			return Err(Error::EmptyCorpus);
		}
		let n_docs = docs.len();
		let counts: Vec<HashMap<String, u32>> = docs.iter().map(|d| term_counts(&options, d.as_ref())).collect();

		let mut df: BTreeMap<&str, usize> = BTreeMap::new();
		for doc in &counts {
			for term in doc.keys() {
				*df.entry(term.as_str()).or_default() += 1;
			}
		}

		#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
		let max_doc_count = (options.max_df * n_docs as f64).floor() as usize;
		if max_doc_count < options.min_df {
			return Err(Error::InvalidConfig("max_df corresponds to < documents than min_df".into()));
		}

		// BTreeMap iteration is lexicographic, so columns come out sorted by term
		let mut vocabulary = HashMap::new();
		let mut idf = Vec::new();
		for (term, &freq) in &df {
			if freq < options.min_df || freq > max_doc_count { continue; }
			vocabulary.insert((*term).to_string(), idf.len());
			idf.push(smoothed_idf(n_docs, freq));
		}
		if vocabulary.is_empty() {
			return Err(Error::InvalidConfig("empty vocabulary; documents contain no indexable terms after pruning".into()));
		}

		let vectorizer = Self { options, vocabulary, idf };
		let rows = counts.iter().map(|c| vectorizer.weigh(c)).collect();
		Ok((vectorizer, rows))
	}

	/// Project `text` into the fitted space. Unknown terms are ignored.
	pub fn transform(&self, text: &str) -> SparseVector {
		self.weigh(&term_counts(&self.options, text))
	}

	pub fn vocabulary_len(&self) -> usize { self.vocabulary.len() }

	pub fn column(&self, term: &str) -> Option<usize> { self.vocabulary.get(term).copied() }

	pub fn idf(&self, column: usize) -> Option<f64> { self.idf.get(column).copied() }

	fn weigh(&self, counts: &HashMap<String, u32>) -> SparseVector {
		let mut row: SparseVector = counts
			.iter()
			.filter_map(|(term, &tf)| self.vocabulary.get(term).map(|&col| (col, f64::from(tf) * self.idf[col])))
			.collect();
		row.sort_unstable_by_key(|&(col, _)| col);
		l2_normalize(&mut row);
		row
	}
}

/// `ln((1 + n) / (1 + df)) + 1`: never zero, even for terms in every document.
fn smoothed_idf(n_docs: usize, df: usize) -> f64 {
	#[allow(clippy::cast_precision_loss)]
	let (n, df) = (n_docs as f64, df as f64);
	((1.0 + n) / (1.0 + df)).ln() + 1.0
}

fn term_counts(options: &TfidfOptions, text: &str) -> HashMap<String, u32> {
	let text = if options.strip_accents { strip_accents(text) } else { text.into() };
	let mut analyzer = build_analyzer(options.lowercase);
	let tokens = tokenize(&mut analyzer, &text);
	let mut counts = HashMap::new();
	for term in ngrams(&tokens, options.ngram_range) {
		*counts.entry(term).or_insert(0) += 1;
	}
	counts
}

fn l2_normalize(row: &mut SparseVector) {
	let norm = norm(row);
	if norm > 0.0 {
		for (_, w) in row.iter_mut() { *w /= norm; }
	}
}

pub fn norm(v: &[(usize, f64)]) -> f64 {
	v.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
}

/// Dot product of two column-sorted sparse vectors.
pub fn dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
	let (mut i, mut j, mut sum) = (0, 0, 0.0);
	while i < a.len() && j < b.len() {
		match a[i].0.cmp(&b[j].0) {
			std::cmp::Ordering::Less => i += 1,
			std::cmp::Ordering::Greater => j += 1,
			std::cmp::Ordering::Equal => {
				sum += a[i].1 * b[j].1;
				i += 1;
				j += 1;
			}
		}
	}
	sum
}

/// Cosine similarity; `NaN` when either side has zero norm.
pub fn cosine(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
	dot(a, b) / (norm(a) * norm(b))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn fit(docs: &[&str], options: TfidfOptions) -> (TfidfVectorizer, Vec<SparseVector>) {
		TfidfVectorizer::fit_transform(docs, options).unwrap()
	}

	#[test]
	fn idf_uses_add_one_smoothing() {
		let (v, _) = fit(&["cafe leche", "cafe solo"], TfidfOptions::default());
		let cafe = v.column("cafe").unwrap();
		let leche = v.column("leche").unwrap();
		assert!((v.idf(cafe).unwrap() - 1.0).abs() < 1e-12);
		assert!((v.idf(leche).unwrap() - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
	}

	#[test]
	fn columns_are_lexicographic_and_include_bigrams() {
		let (v, _) = fit(&["zumo de naranja"], TfidfOptions::default());
		assert_eq!(v.vocabulary_len(), 5);
		assert_eq!(v.column("de"), Some(0));
		assert_eq!(v.column("de naranja"), Some(1));
		assert_eq!(v.column("zumo de"), Some(4));
	}

	#[test]
	fn rows_are_unit_length() {
		let (_, rows) = fit(&["cafe cafe leche", "te verde", "te rojo te"], TfidfOptions::default());
		for row in &rows {
			assert!((norm(row) - 1.0).abs() < 1e-9);
			assert!(row.windows(2).all(|w| w[0].0 < w[1].0));
		}
	}

	#[test]
	fn term_frequency_raises_weight() {
		let (v, rows) = fit(&["cafe cafe leche"], TfidfOptions { ngram_range: (1, 1), ..TfidfOptions::default() });
		let cafe = v.column("cafe").unwrap();
		let leche = v.column("leche").unwrap();
		let w = |c: usize| rows[0].iter().find(|(col, _)| *col == c).unwrap().1;
		assert!((w(cafe) / w(leche) - 2.0).abs() < 1e-9);
	}

	#[test]
	fn max_df_prunes_ubiquitous_terms() {
		let opts = TfidfOptions { ngram_range: (1, 1), max_df: 0.5, ..TfidfOptions::default() };
		let (v, _) = fit(&["menu cafe", "menu te", "menu zumo", "menu agua"], opts);
		assert!(v.column("menu").is_none());
		assert!(v.column("cafe").is_some());
	}

	#[test]
	fn min_df_prunes_rare_terms() {
		let opts = TfidfOptions { ngram_range: (1, 1), min_df: 2, ..TfidfOptions::default() };
		let (v, _) = fit(&["menu cafe", "menu te"], opts);
		assert_eq!(v.vocabulary_len(), 1);
	}

	#[test]
	fn unknown_query_terms_project_to_zero() {
		let (v, _) = fit(&["cafe leche"], TfidfOptions::default());
		assert!(v.transform("pizza margarita").is_empty());
		assert!(cosine(&v.transform("pizza"), &v.transform("cafe")).is_nan());
	}

	#[test]
	fn invalid_options_are_rejected() {
		let bad = [
			TfidfOptions { ngram_range: (0, 1), ..TfidfOptions::default() },
			TfidfOptions { ngram_range: (3, 2), ..TfidfOptions::default() },
			TfidfOptions { min_df: 0, ..TfidfOptions::default() },
			TfidfOptions { max_df: 0.0, ..TfidfOptions::default() },
			TfidfOptions { max_df: 1.5, ..TfidfOptions::default() },
		];
		for opts in bad {
			assert!(matches!(TfidfVectorizer::fit_transform(&["cafe"], opts), Err(Error::InvalidConfig(_))));
		}
		let crossed = TfidfOptions { min_df: 3, max_df: 0.5, ..TfidfOptions::default() };
		assert!(TfidfVectorizer::fit_transform(&["a b", "c d"], crossed).is_err());
	}

	#[test]
	fn documents_without_terms_fail_fitting() {
		let err = TfidfVectorizer::fit_transform(&["¿?", "a y o"], TfidfOptions::default()).unwrap_err();
		assert!(matches!(err, Error::InvalidConfig(_)));
		let empty: [&str; 0] = [];
		assert!(matches!(TfidfVectorizer::fit_transform(&empty, TfidfOptions::default()), Err(Error::EmptyCorpus)));
	}

	#[test]
	fn dot_merges_sparse_columns() {
		assert!((dot(&[(0, 1.0), (3, 2.0), (5, 1.0)], &[(3, 4.0), (4, 9.0), (5, 0.5)]) - 8.5).abs() < 1e-12);
	}
}
