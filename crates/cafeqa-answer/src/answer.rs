use std::fmt;

use cafeqa_core::types::{Metadata, RetrieverHit};

/// Characters of a document fragment shown under each evidence hit.
pub const EVIDENCE_PREVIEW_CHARS: usize = 240;

/// Which branch of the answer policy produced the response text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerKind {
    Faq,
    Document,
    NotFound,
}

/// Result of one question. Borrows its hits from the retrievers that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer<'a> {
    pub question: String,
    pub response: String,
    pub kind: AnswerKind,
    /// Best FAQ hit, kept even when it scored under the threshold.
    pub faq_match: Option<RetrieverHit<'a>>,
    pub evidence: Vec<RetrieverHit<'a>>,
}

impl Answer<'_> {
    pub fn render(&self) -> String {
        let mut lines = vec![self.response.clone()];

        if let Some(hit) = &self.faq_match {
            let (question, answer) = match hit.entry.metadata() {
                Metadata::Faq { question, answer, .. } => (question.as_str(), answer.as_str()),
                Metadata::Document { .. } => (hit.entry.content(), hit.entry.content()),
            };
            lines.push(String::new());
            lines.push("Coincidencia en la FAQ:".to_string());
            lines.push(format!("- Pregunta: {question}"));
            lines.push(format!("- Respuesta: {answer}"));
            lines.push(format!("- Score: {:.3}", hit.score));
        }

        if !self.evidence.is_empty() {
            lines.push(String::new());
            lines.push("Fragmentos relevantes del PDF:".to_string());
            for hit in &self.evidence {
                let meta = hit.entry.metadata();
                lines.push(format!("- {} | score={:.3}", meta.source(), hit.score));
                let text = meta.text().unwrap_or_else(|| hit.entry.content());
                if !text.is_empty() {
                    lines.push(format!("  {}", preview(text, EVIDENCE_PREVIEW_CHARS)));
                }
            }
        }

        lines.join("\n")
    }
}

impl fmt::Display for Answer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// First `max_chars` chars of `text`, with `...` appended when something was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
