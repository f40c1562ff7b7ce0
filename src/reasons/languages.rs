//! Language directory: the supported codes and their display names.

/// A supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// Short code, also the reason file stem (`en` → `en.json`).
    pub code: &'static str,
    /// Name shown to users, in the language itself.
    pub name: &'static str,
}

/// Every language the service knows about, in listing order.
pub const LANGUAGES: &[Language] = &[
    Language { code: "en", name: "English" },
    Language { code: "es", name: "Español" },
    Language { code: "fr", name: "Français" },
    Language { code: "de", name: "Deutsch" },
    Language { code: "it", name: "Italiano" },
    Language { code: "pt", name: "Português" },
];

/// Look up a language by exact code.
pub fn find(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|lang| lang.code == code)
}

/// Whether `code` names a directory entry.
pub fn is_supported(code: &str) -> bool {
    find(code).is_some()
}

/// Reduce a client-supplied selector to a bare lowercase code.
///
/// `" PT-br "` becomes `"pt"`; region and script subtags are dropped.
pub fn normalize(selector: &str) -> String {
    selector
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}
