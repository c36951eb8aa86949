use std::fmt;

/// Code of the edition used whenever resolution is inconclusive.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Wikipedia edition code such as `en`, `es` or `zh-min-nan`.
///
/// Only ASCII alphanumerics and `-` are accepted because the code ends up in a
/// hostname and in a site-link key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn parse(raw: &str) -> Option<Self> {
        let code = raw.trim().to_ascii_lowercase();
        let valid = !code.is_empty()
            && !code.starts_with('-')
            && !code.ends_with('-')
            && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        valid.then_some(Self(code))
    }

    pub fn english() -> Self {
        Self(DEFAULT_LANGUAGE.to_string())
    }

    pub fn is_english(&self) -> bool {
        self.0 == DEFAULT_LANGUAGE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wikimedia site id for this edition, e.g. `eswiki` or `zh_min_nanwiki`.
    pub fn wiki_site(&self) -> String {
        format!("{}wiki", self.0.replace('-', "_"))
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
