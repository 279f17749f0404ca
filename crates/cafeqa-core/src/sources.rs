//! Document page sources. Text extraction itself is delegated; these only
//! hand back raw per-page strings.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::traits::PageSource;

/// Every `*.txt` file under a directory is one page, ordered by path.
pub struct TextDirPages {
    root: PathBuf,
}

impl TextDirPages {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    fn list_txt_files(&self) -> Vec<PathBuf> {
        let mut txt_files: Vec<PathBuf> = walkdir::WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("txt"))
            .collect();
        txt_files.sort();
        txt_files
    }
}

impl PageSource for TextDirPages {
    fn label(&self) -> String { file_label(&self.root) }

    fn pages(&self) -> Result<Vec<String>> {
        self.list_txt_files()
            .iter()
            .map(|p| match fs::read_to_string(p) {
                Ok(content) => Ok(content),
                Err(_) => Ok(String::from_utf8_lossy(&fs::read(p)?).into_owned()),
            })
            .collect()
    }
}

/// Text of each page of a PDF file.
#[cfg(feature = "pdf")]
pub struct PdfPages {
    path: PathBuf,
}

#[cfg(feature = "pdf")]
impl PdfPages {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }
}

#[cfg(feature = "pdf")]
impl PageSource for PdfPages {
    fn label(&self) -> String { file_label(&self.path) }

    fn pages(&self) -> Result<Vec<String>> {
        let doc = lopdf::Document::load(&self.path).map_err(|e| {
            crate::error::Error::MalformedSource(format!("Failed to load PDF {}: {}", self.path.display(), e))
        })?;
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        Ok(page_numbers
            .iter()
            .map(|&n| {
                doc.extract_text(&[n]).unwrap_or_else(|e| {
                    tracing::warn!(page = n, error = %e, "could not extract page text");
                    String::new()
                })
            })
            .collect())
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
