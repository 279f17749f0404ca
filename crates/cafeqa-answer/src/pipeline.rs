use tracing::info;

use cafeqa_core::config::{RetrieverSettings, Settings};
use cafeqa_core::dataset::{build_dataset, Dataset};
use cafeqa_core::error::Result;
use cafeqa_core::sources::TextDirPages;
use cafeqa_core::traits::PageSource;
use cafeqa_core::types::CorpusEntry;
use cafeqa_text::{TfidfOptions, TfidfRetriever};

use crate::answer::Answer;
use crate::composer::AnswerComposer;

/// Dataset plus one fitted retriever per split, ready to answer questions.
pub struct CafeteriaRag {
    dataset: Dataset,
    composer: AnswerComposer<TfidfRetriever, TfidfRetriever>,
}

impl CafeteriaRag {
    /// Load the FAQ and the configured page source, then fit both retrievers.
    pub fn build(settings: &Settings) -> Result<Self> { Self::build_with_progress(settings, false) }

    pub fn build_with_progress(settings: &Settings, show_progress: bool) -> Result<Self> {
        settings.validate()?;
        let pages = page_source(settings)?;
        info!(faq = %settings.faq_path().display(), pages = %pages.label(), "building dataset");
        let dataset = build_dataset(&settings.faq_path(), pages.as_ref(), settings.ingest.qa_limit, settings.chunking()?, show_progress)?;
        Self::from_dataset(dataset, settings)
    }

    pub fn from_dataset(dataset: Dataset, settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let options = tfidf_options(&settings.retriever);
        let faq_corpus: Vec<CorpusEntry> = dataset.qa().iter().map(CorpusEntry::from).collect();
        let doc_corpus: Vec<CorpusEntry> = dataset.documents().iter().map(CorpusEntry::from).collect();

        let faq = TfidfRetriever::new(faq_corpus, options.clone())?;
        let documents = TfidfRetriever::new(doc_corpus, options)?;
        info!(
            faq_entries = faq.len(),
            faq_vocabulary = faq.vocabulary_len(),
            doc_entries = documents.len(),
            doc_vocabulary = documents.vocabulary_len(),
            "retrievers ready"
        );

        let composer = AnswerComposer::new(faq, documents)
            .with_faq_threshold(settings.answer.faq_threshold)
            .with_top_k_docs(settings.answer.top_k_docs);
        Ok(Self { dataset, composer })
    }

    pub fn answer(&self, question: &str, top_k_docs: usize) -> Result<Answer<'_>> {
        self.composer.answer(question, top_k_docs)
    }

    pub fn ask(&self, question: &str) -> Result<Answer<'_>> { self.composer.ask(question) }

    pub fn dataset(&self) -> &Dataset { &self.dataset }

    pub fn composer(&self) -> &AnswerComposer<TfidfRetriever, TfidfRetriever> { &self.composer }
}

pub fn tfidf_options(settings: &RetrieverSettings) -> TfidfOptions {
    TfidfOptions {
        ngram_range: (settings.ngram_min, settings.ngram_max),
        min_df: settings.min_df,
        max_df: settings.max_df,
        lowercase: settings.lowercase,
        strip_accents: settings.strip_accents,
    }
}

/// A text page directory when `data.pages_dir` is set, the PDF otherwise.
fn page_source(settings: &Settings) -> Result<Box<dyn PageSource>> {
    if let Some(dir) = settings.pages_dir() {
        return Ok(Box::new(TextDirPages::new(dir)));
    }
    #[cfg(feature = "pdf")]
    {
        Ok(Box::new(cafeqa_core::sources::PdfPages::new(settings.pdf_path())))
    }
    #[cfg(not(feature = "pdf"))]
    {
        Err(cafeqa_core::error::Error::InvalidConfig(
            "data.pages_dir is empty and PDF support is disabled".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cafeqa_core::error::Error;
    use cafeqa_core::types::{DocumentChunk, QaRecord};

    fn dataset() -> Dataset {
        let qa = [("¿Cuánto cuesta un café?", "El café cuesta 1,20 €."), ("¿Venden zumo natural?", "Sí, a 2,50 €.")]
            .iter()
            .enumerate()
            .map(|(i, (q, a))| QaRecord { id: format!("qa-{:03}", i + 1), question: q.to_string(), answer: a.to_string(), source: "cafeteria.json".into() })
            .collect();
        let docs = vec![
            DocumentChunk { id: "pdf-001-01".into(), page: 1, text: "Bocadillo de tortilla 3,20 €".into(), source: "precios.pdf#page=1".into() },
            DocumentChunk { id: "pdf-001-02".into(), page: 1, text: "Menú del día con bebida 6,50 €".into(), source: "precios.pdf#page=1".into() },
        ];
        Dataset::new(qa, docs)
    }

    #[test]
    fn retriever_options_follow_settings() {
        let o = tfidf_options(&RetrieverSettings { ngram_max: 3, max_df: 0.8, ..RetrieverSettings::default() });
        assert_eq!(o.ngram_range, (1, 3));
        assert!((o.max_df - 0.8).abs() < f64::EPSILON);
        assert_eq!(tfidf_options(&RetrieverSettings::default()), TfidfOptions::default());
    }

    #[test]
    fn from_dataset_applies_answer_settings() {
        let mut settings = Settings::default();
        settings.answer.top_k_docs = 1;
        settings.answer.faq_threshold = 0.5;
        let rag = CafeteriaRag::from_dataset(dataset(), &settings).unwrap();
        assert_eq!(rag.composer().top_k_docs(), 1);
        assert_eq!(rag.composer().faq_threshold(), 0.5);
        assert_eq!(rag.dataset().qa().len(), 2);
        assert_eq!(rag.ask("menú del día").unwrap().evidence.len(), 1);
    }

    #[test]
    fn empty_split_cannot_be_indexed() {
        let ds = Dataset::new(vec![], dataset().documents().to_vec());
        assert!(matches!(CafeteriaRag::from_dataset(ds, &Settings::default()), Err(Error::EmptyCorpus)));
    }
}
