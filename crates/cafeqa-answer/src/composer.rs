use tracing::debug;

use cafeqa_core::error::{Error, Result};
use cafeqa_core::traits::Retriever;
use cafeqa_core::types::RetrieverHit;

use crate::answer::{Answer, AnswerKind};

pub const DEFAULT_FAQ_THRESHOLD: f32 = 0.25;
pub const DEFAULT_TOP_K_DOCS: usize = 3;

pub const NOT_FOUND_MESSAGE: &str =
    "No encontré información relevante en la FAQ ni en el PDF. Prueba reformulando la pregunta.";

/// Answers from the FAQ when its best hit is trusted, otherwise from the best
/// document fragment.
pub struct AnswerComposer<F, D> where F: Retriever, D: Retriever {
    faq: F,
    documents: D,
    faq_threshold: f32,
    top_k_docs: usize,
}

impl<F, D> AnswerComposer<F, D> where F: Retriever, D: Retriever {
    pub fn new(faq: F, documents: D) -> Self {
        Self { faq, documents, faq_threshold: DEFAULT_FAQ_THRESHOLD, top_k_docs: DEFAULT_TOP_K_DOCS }
    }

    /// Minimum FAQ score (inclusive) for the stored answer to be returned as-is.
    pub fn with_faq_threshold(mut self, threshold: f32) -> Self { self.faq_threshold = threshold; self }

    pub fn with_top_k_docs(mut self, top_k_docs: usize) -> Self { self.top_k_docs = top_k_docs; self }

    pub fn faq_threshold(&self) -> f32 { self.faq_threshold }
    pub fn top_k_docs(&self) -> usize { self.top_k_docs }
    pub fn faq(&self) -> &F { &self.faq }
    pub fn documents(&self) -> &D { &self.documents }

    /// Answer with the configured number of document fragments.
    pub fn ask(&self, question: &str) -> Result<Answer<'_>> { self.answer(question, self.top_k_docs) }

    pub fn answer(&self, question: &str, top_k_docs: usize) -> Result<Answer<'_>> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::InvalidInput("question must not be empty".into()));
        }
        if top_k_docs == 0 {
            return Err(Error::InvalidInput("top_k_docs must be at least 1".into()));
        }

        let faq_match = self.faq.search(question, 1).into_iter().next();
        let evidence = self.documents.search(question, top_k_docs);

        let (kind, response) = match (faq_match, evidence.first()) {
            (Some(hit), _) if hit.score >= self.faq_threshold => (AnswerKind::Faq, faq_answer(&hit)),
            (_, None) => (AnswerKind::NotFound, NOT_FOUND_MESSAGE.to_string()),
            (_, Some(best)) => (AnswerKind::Document, document_answer(best)),
        };
        debug!(
            ?kind,
            faq_score = faq_match.map(|h| h.score),
            doc_hits = evidence.len(),
            "composed answer"
        );

        Ok(Answer { question: question.to_string(), response, kind, faq_match, evidence })
    }
}

fn faq_answer(hit: &RetrieverHit<'_>) -> String {
    hit.entry.metadata().answer().unwrap_or_else(|| hit.entry.content()).to_string()
}

fn document_answer(hit: &RetrieverHit<'_>) -> String {
    let meta = hit.entry.metadata();
    let text = meta.text().unwrap_or_else(|| hit.entry.content());
    format!(
        "No encontré una respuesta exacta en la FAQ, pero este fragmento del PDF puede ayudarte:\n- Fuente: {}\n- Contenido: {}",
        meta.source(),
        text
    )
}
