//! Immutable per-language reason sets.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use thiserror::Error;

use crate::observability::metrics;
use crate::reasons::languages::{self, Language, LANGUAGES};

/// Error raised while building a [`ReasonStore`]. Always fatal at startup.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read reason file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("reason file {path} is not a JSON array of strings: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("language `{0}` has no reasons")]
    Empty(String),
    #[error("language `{0}` is not in the language directory")]
    UnknownLanguage(String),
    #[error("default language `{0}` has no reason set")]
    MissingDefault(String),
}

/// A reason chosen for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection<'a> {
    pub reason: &'a str,
    pub lang: &'static str,
}

/// Read-only reason sets keyed by language code.
///
/// Every set is non-empty and the default language is always present, so
/// lookups never fail once a store exists.
#[derive(Debug)]
pub struct ReasonStore {
    default_language: &'static Language,
    sets: HashMap<&'static str, Vec<String>>,
}

impl ReasonStore {
    /// Load `<dir>/<code>.json` for every language in the directory.
    pub fn load(dir: &Path, default_language: &str) -> Result<Self, StoreError> {
        let mut sets = Vec::with_capacity(LANGUAGES.len());
        for lang in LANGUAGES {
            let path = dir.join(format!("{}.json", lang.code));
            let content = fs::read_to_string(&path).map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?;
            let reasons: Vec<String> = serde_json::from_str(&content)
                .map_err(|source| StoreError::Parse { path, source })?;
            sets.push((lang.code, reasons));
        }

        let store = Self::from_sets(default_language, sets)?;
        for lang in store.languages() {
            let count = store.sets.get(lang.code).map_or(0, Vec::len);
            metrics::record_reasons_loaded(lang.code, count);
            tracing::info!(lang = lang.code, count, "Loaded reasons");
        }
        Ok(store)
    }

    /// Build a store from in-memory sets.
    pub fn from_sets<I, S>(default_language: &str, sets: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (S, Vec<String>)>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for (code, reasons) in sets {
            let code = code.as_ref();
            let lang =
                languages::find(code).ok_or_else(|| StoreError::UnknownLanguage(code.to_string()))?;
            if reasons.is_empty() {
                return Err(StoreError::Empty(code.to_string()));
            }
            map.insert(lang.code, reasons);
        }

        let default_language = languages::find(default_language)
            .filter(|lang| map.contains_key(lang.code))
            .ok_or_else(|| StoreError::MissingDefault(default_language.to_string()))?;

        Ok(Self {
            default_language,
            sets: map,
        })
    }

    /// The language used for fallback.
    pub fn default_language(&self) -> &'static Language {
        self.default_language
    }

    /// Loaded languages, in directory order.
    pub fn languages(&self) -> impl Iterator<Item = &'static Language> + '_ {
        LANGUAGES
            .iter()
            .filter(move |lang| self.sets.contains_key(lang.code))
    }

    /// Map a client selector to a loaded language code, falling back to the default.
    pub fn resolve(&self, selector: Option<&str>) -> &'static str {
        selector
            .map(languages::normalize)
            .and_then(|code| self.sets.get_key_value(code.as_str()).map(|(k, _)| *k))
            .unwrap_or(self.default_language.code)
    }

    /// Reasons for `code`, or the default set when it is not loaded.
    pub fn get(&self, code: &str) -> &[String] {
        self.sets
            .get(code)
            .or_else(|| self.sets.get(self.default_language.code))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Pick a reason uniformly at random.
    pub fn pick(&self, selector: Option<&str>) -> Rejection<'_> {
        self.pick_with(selector, &mut rand::thread_rng())
    }

    /// Pick a reason using the given random source.
    pub fn pick_with<R: Rng>(&self, selector: Option<&str>, rng: &mut R) -> Rejection<'_> {
        let lang = self.resolve(selector);
        // `resolve` only yields loaded codes and `from_sets` refuses empty sets.
        let reasons = &self.sets[lang];
        let reason = reasons[rng.gen_range(0..reasons.len())].as_str();
        Rejection { reason, lang }
    }
}
