use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::traits::PageSource;
use crate::types::DocumentChunk;

pub const DEFAULT_CHUNK_SIZE: usize = 450;
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

/// Word-window sizing. Construct through [`ChunkingConfig::new`] to get the checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl ChunkingConfig {
    /// Takes signed sizes because they usually come straight from user config.
    pub fn new(chunk_size: i64, chunk_overlap: i64) -> Result<Self> {
        if chunk_size <= 0 {
            return Err(Error::InvalidConfig("chunk_size must be positive".into()));
        }
        if chunk_overlap < 0 {
            return Err(Error::InvalidConfig("chunk_overlap cannot be negative".into()));
        }
        if chunk_overlap >= chunk_size {
            return Err(Error::InvalidConfig("chunk_overlap must be smaller than chunk_size".into()));
        }
        let to_usize = |v: i64| usize::try_from(v).map_err(|_| Error::InvalidConfig(format!("chunk sizing out of range: {v}")));
        Ok(Self { chunk_size: to_usize(chunk_size)?, chunk_overlap: to_usize(chunk_overlap)? })
    }

    pub fn chunk_size(&self) -> usize { self.chunk_size }
    pub fn chunk_overlap(&self) -> usize { self.chunk_overlap }
    fn step(&self) -> usize { self.chunk_size - self.chunk_overlap }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE, chunk_overlap: DEFAULT_CHUNK_OVERLAP }
    }
}

/// Undo extraction artifacts: glue hyphenated line breaks, flatten tabs and
/// newlines, collapse whitespace runs, trim.
pub fn normalize_text(text: &str) -> String {
    let joined = text.replace("-\r\n", "").replace("-\n", "");
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Overlapping word windows over a text. Single pass; not restartable.
#[derive(Debug)]
pub struct Chunks<'a> {
    words: Vec<&'a str>,
    start: usize,
    size: usize,
    step: usize,
    done: bool,
}

impl Iterator for Chunks<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done || self.start >= self.words.len() {
            return None;
        }
        let end = (self.start + self.size).min(self.words.len());
        let chunk = self.words[self.start..end].join(" ");
        if end >= self.words.len() {
            self.done = true;
        } else {
            self.start += self.step;
        }
        Some(chunk)
    }
}

pub fn chunk_text<'a>(text: &'a str, config: &ChunkingConfig) -> Chunks<'a> {
    Chunks {
        words: text.split_whitespace().collect(),
        start: 0,
        size: config.chunk_size,
        step: config.step(),
        done: false,
    }
}

#[derive(Debug, Default)]
pub struct DataProcessor {
    chunking_config: ChunkingConfig,
    show_progress: bool,
}

impl DataProcessor {
    pub fn new(chunking_config: ChunkingConfig) -> Self {
        Self { chunking_config, show_progress: false }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn chunking_config(&self) -> &ChunkingConfig { &self.chunking_config }

    /// Normalize and chunk every page of `source`, tagging chunks with page provenance.
    ///
    /// Fails with [`Error::InsufficientData`] when no page yields any text.
    pub fn process_pages(&self, source: &dyn PageSource) -> Result<Vec<DocumentChunk>> {
        let label = source.label();
        let pages = source.pages()?;
        let pb = if self.show_progress { ProgressBar::new(pages.len() as u64) } else { ProgressBar::hidden() };
        if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages ({percent}%) {msg}") {
            pb.set_style(style.progress_chars("#>-"));
        }

        let mut all_chunks = Vec::new();
        for (page_index, raw) in pages.iter().enumerate() {
            let page = u32::try_from(page_index + 1).unwrap_or(u32::MAX);
            let chunks = self.chunk_page(raw, page, &label);
            debug!(page, chunks = chunks.len(), "chunked page");
            all_chunks.extend(chunks);
            pb.inc(1);
        }
        pb.finish_and_clear();

        if all_chunks.is_empty() {
            return Err(Error::InsufficientData(format!("No textual content could be extracted from {label}")));
        }
        info!(source = %label, pages = pages.len(), chunks = all_chunks.len(), "processed document");
        Ok(all_chunks)
    }

    fn chunk_page(&self, raw: &str, page: u32, label: &str) -> Vec<DocumentChunk> {
        let clean = normalize_text(raw);
        chunk_text(&clean, &self.chunking_config)
            .enumerate()
            .map(|(i, text)| DocumentChunk {
                id: format!("pdf-{:03}-{:02}", page, i + 1),
                page,
                text,
                source: format!("{label}#page={page}"),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn normalize_joins_hyphenated_breaks_and_collapses_space() {
        let raw = "  Pre-\ncios de\tla   cafe-\r\nteria\n\n2025 ";
        assert_eq!(normalize_text(raw), "Precios de la cafeteria 2025");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_text("a -\nb\t\tc\n d-\ne");
        assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn rejects_bad_sizing() {
        assert!(matches!(ChunkingConfig::new(0, 0), Err(Error::InvalidConfig(_))));
        assert!(matches!(ChunkingConfig::new(-3, 0), Err(Error::InvalidConfig(_))));
        assert!(matches!(ChunkingConfig::new(10, -1), Err(Error::InvalidConfig(_))));
        assert!(matches!(ChunkingConfig::new(10, 10), Err(Error::InvalidConfig(_))));
        assert!(ChunkingConfig::new(10, 9).is_ok());
    }

    #[test]
    fn empty_text_yields_nothing() {
        let cfg = ChunkingConfig::new(5, 2).unwrap();
        assert_eq!(chunk_text("", &cfg).count(), 0);
        assert_eq!(chunk_text("   ", &cfg).count(), 0);
    }

    #[test]
    fn windows_respect_size_and_overlap() {
        let text = words(23);
        let cfg = ChunkingConfig::new(10, 3).unwrap();
        let chunks: Vec<String> = chunk_text(&text, &cfg).collect();
        // starts at 0, 7, 14; the window at 14 reaches the end
        assert_eq!(chunks.len(), 3);
        for c in &chunks {
            assert!(c.split_whitespace().count() <= 10);
        }
        for pair in chunks.windows(2) {
            let a: Vec<&str> = pair[0].split_whitespace().collect();
            let b: Vec<&str> = pair[1].split_whitespace().collect();
            assert_eq!(&a[a.len() - 3..], &b[..3]);
        }
        assert!(chunks[2].ends_with("w22"));
    }

    #[test]
    fn text_shorter_than_window_is_one_chunk() {
        let cfg = ChunkingConfig::new(450, 100).unwrap();
        let chunks: Vec<String> = chunk_text("café con leche", &cfg).collect();
        assert_eq!(chunks, vec!["café con leche".to_string()]);
    }

    #[test]
    fn exact_fit_stops_without_a_trailing_window() {
        let text = words(10);
        let cfg = ChunkingConfig::new(10, 4).unwrap();
        assert_eq!(chunk_text(&text, &cfg).count(), 1);
    }

    struct Pages(Vec<&'static str>);
    impl PageSource for Pages {
        fn label(&self) -> String { "precios.pdf".into() }
        fn pages(&self) -> Result<Vec<String>> { Ok(self.0.iter().map(|s| s.to_string()).collect()) }
    }

    #[test]
    fn process_pages_tags_page_and_chunk() {
        let processor = DataProcessor::new(ChunkingConfig::new(3, 1).unwrap());
        let chunks = processor.process_pages(&Pages(vec!["uno dos tres cuatro", "", "cinco"])).unwrap();
        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["pdf-001-01", "pdf-001-02", "pdf-003-01"]);
        assert_eq!(chunks[1].text, "tres cuatro");
        assert_eq!(chunks[2].page, 3);
        assert_eq!(chunks[2].source, "precios.pdf#page=3");
    }

    #[test]
    fn process_pages_without_text_is_insufficient() {
        let processor = DataProcessor::default();
        let err = processor.process_pages(&Pages(vec!["", "  \n "])).unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));
    }
}
