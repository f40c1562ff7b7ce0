//! JSON response bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::reasons::{Language, Rejection};

/// Body of `GET /no`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RejectionResponse {
    pub reason: String,
    pub lang: String,
}

impl From<Rejection<'_>> for RejectionResponse {
    fn from(rejection: Rejection<'_>) -> Self {
        Self {
            reason: rejection.reason.to_string(),
            lang: rejection.lang.to_string(),
        }
    }
}

/// Body of `GET /languages`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguagesResponse {
    pub languages: Vec<String>,
    pub names: BTreeMap<String, String>,
}

impl<'a> FromIterator<&'a Language> for LanguagesResponse {
    fn from_iter<I: IntoIterator<Item = &'a Language>>(iter: I) -> Self {
        let mut languages = Vec::new();
        let mut names = BTreeMap::new();
        for lang in iter {
            languages.push(lang.code.to_string());
            names.insert(lang.code.to_string(), lang.name.to_string());
        }
        Self { languages, names }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub languages: usize,
}
