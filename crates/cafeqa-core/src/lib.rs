//! cafeqa-core
//!
//! Shared domain types, error taxonomy, configuration, the text chunker and
//! the FAQ / document loaders that feed the retrievers.

pub mod config;
pub mod data_processor;
pub mod dataset;
pub mod error;
pub mod faq;
pub mod sources;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
