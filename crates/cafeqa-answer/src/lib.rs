//! cafeqa-answer
//!
//! Turns a question into an [`Answer`]: FAQ lookup first, document fragments
//! as fallback. [`CafeteriaRag`] wires dataset loading, both retrievers and the
//! composer together.

pub mod answer;
pub mod composer;
pub mod pipeline;

pub use answer::{preview, Answer, AnswerKind};
pub use composer::AnswerComposer;
pub use pipeline::CafeteriaRag;
