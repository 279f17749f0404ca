//! cafeqa-text
//!
//! Lexical retrieval: tantivy analyzers for tokenization, a TF-IDF vector
//! space fitted in memory, and [`TfidfRetriever`] ranking corpus entries by
//! cosine similarity.

pub mod tantivy_utils;
pub mod vectorizer;
pub mod retriever;

pub use retriever::TfidfRetriever;
pub use vectorizer::{TfidfOptions, TfidfVectorizer};
