//! Layered configuration and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys separated by `__`, e.g. `APP_ANSWER__TOP_K_DOCS=5`). Every
//! setting has a default, so running without any config file works.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::data_processor::{ChunkingConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::error::{Error, Result};
use crate::faq::DEFAULT_QA_LIMIT;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("."), &env_name)
    }

    /// Same layering as [`Config::load`] but rooted at `dir` with an explicit env name.
    ///
    /// Fails on an unknown env name or on settings that do not validate.
    pub fn load_from(dir: &Path, env_name: &str) -> Result<Self> {
        let config = Self::from_figment(Self::layered(dir, env_name));
        config.validate_for_env(env_name)?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    fn layered(dir: &Path, env_name: &str) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment.merge(Env::prefixed("APP_").split("__"))
    }

    fn validate_for_env(&self, env_name: &str) -> Result<()> {
        match env_name {
            "dev" | "development" | "prod" | "production" | "test" | "testing" => {}
            other => return Err(Error::InvalidConfig(format!("unknown RUST_ENV '{other}'"))),
        }
        self.settings().map(|_| ())
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{key}': {e}")))
    }

    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(format!("Failed to read settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub ingest: IngestSettings,
    pub retriever: RetrieverSettings,
    pub answer: AnswerSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub dir: String,
    pub faq_file: String,
    pub pdf_file: String,
    /// When non-empty, pages are read from `*.txt` files here instead of the PDF.
    pub pages_dir: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    pub qa_limit: Option<usize>,
    pub chunk_size: i64,
    pub chunk_overlap: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrieverSettings {
    pub ngram_min: usize,
    pub ngram_max: usize,
    pub min_df: usize,
    pub max_df: f64,
    pub lowercase: bool,
    pub strip_accents: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerSettings {
    pub faq_threshold: f32,
    pub top_k_docs: usize,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dir: "data".to_string(),
            faq_file: "cafeteria.json".to_string(),
            pdf_file: "Precios_Cafeterías_2025_signed.pdf".to_string(),
            pages_dir: String::new(),
        }
    }
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            qa_limit: Some(DEFAULT_QA_LIMIT),
            chunk_size: DEFAULT_CHUNK_SIZE as i64,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP as i64,
        }
    }
}

impl Default for RetrieverSettings {
    fn default() -> Self {
        Self { ngram_min: 1, ngram_max: 2, min_df: 1, max_df: 1.0, lowercase: true, strip_accents: true }
    }
}

impl Default for AnswerSettings {
    fn default() -> Self {
        Self { faq_threshold: 0.25, top_k_docs: 3 }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.chunking()?;
        if self.answer.top_k_docs == 0 {
            return Err(Error::InvalidConfig("answer.top_k_docs must be at least 1".into()));
        }
        if !self.answer.faq_threshold.is_finite() {
            return Err(Error::InvalidConfig("answer.faq_threshold must be a finite number".into()));
        }
        Ok(())
    }

    pub fn chunking(&self) -> Result<ChunkingConfig> {
        ChunkingConfig::new(self.ingest.chunk_size, self.ingest.chunk_overlap)
    }

    pub fn data_dir(&self) -> PathBuf {
        expand_path(&self.data.dir)
    }

    pub fn faq_path(&self) -> PathBuf {
        resolve_with_base(&self.data_dir(), &self.data.faq_file)
    }

    pub fn pdf_path(&self) -> PathBuf {
        resolve_with_base(&self.data_dir(), &self.data.pdf_file)
    }

    pub fn pages_dir(&self) -> Option<PathBuf> {
        (!self.data.pages_dir.trim().is_empty()).then(|| resolve_with_base(&self.data_dir(), &self.data.pages_dir))
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
