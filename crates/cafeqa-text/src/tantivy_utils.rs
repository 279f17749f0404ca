use std::borrow::Cow;

use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, TextAnalyzer, TokenStream};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Tokens shorter than this (in chars) never enter the vocabulary.
const MIN_TOKEN_CHARS: usize = 2;

/// Word tokenizer: splits on non-alphanumeric chars, optionally lowercasing.
pub fn build_analyzer(lowercase: bool) -> TextAnalyzer {
	if lowercase {
		TextAnalyzer::builder(SimpleTokenizer::default()).filter(LowerCaser).build()
	} else {
		TextAnalyzer::builder(SimpleTokenizer::default()).build()
	}
}

/// NFKD-decompose and drop combining marks (`café` → `cafe`, `Ñ` → `N`).
///
/// Must run before tokenizing: a detached accent is not alphanumeric and
/// would otherwise split the word it belongs to.
pub fn strip_accents(text: &str) -> Cow<'_, str> {
	if text.is_ascii() {
		return Cow::Borrowed(text);
	}
	Cow::Owned(text.nfkd().filter(|c| !is_combining_mark(*c)).collect())
}

pub fn tokenize(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
	let mut tokens = Vec::new();
	let mut stream = analyzer.token_stream(text);
	while stream.advance() {
		let token = stream.token();
		if token.text.chars().count() >= MIN_TOKEN_CHARS { tokens.push(token.text.clone()); }
	}
	tokens
}

/// All n-grams for `n` in `min..=max`, words joined by a single space.
pub fn ngrams(tokens: &[String], (min, max): (usize, usize)) -> Vec<String> {
	let mut out = Vec::new();
	for n in min..=max {
		if n == 0 || n > tokens.len() { continue; }
		out.extend(tokens.windows(n).map(|w| w.join(" ")));
	}
	out
}
