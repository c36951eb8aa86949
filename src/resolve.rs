//! Title → original-language article resolution with English fallback.
//!
//! Clients return `Result<Option<_>, _>`; this module is the only place where
//! failures and absent data are turned into defaults.

use tracing::{error, warn};

use crate::language::LanguageCode;
use crate::wikidata::KnowledgeGraph;
use crate::wikipedia::{Encyclopedia, Page};

/// Returned by [`Resolver::fetch_text`] when no edition has the page.
pub const PAGE_NOT_FOUND: &str = "Wikipedia page not found.";

/// Language and localized title resolved for a work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub language: LanguageCode,
    pub title: String,
}

pub struct Resolver<K, E> {
    graph: K,
    encyclopedia: E,
}

impl<K: KnowledgeGraph, E: Encyclopedia> Resolver<K, E> {
    pub fn new(graph: K, encyclopedia: E) -> Self {
        Self {
            graph,
            encyclopedia,
        }
    }

    /// Original language of the work, `en` when unknown.
    pub async fn resolve_original_language(&self, title: &str) -> LanguageCode {
        match self.graph.original_language_qid(title).await {
            Ok(Some(qid)) => self.resolve_language_code(&qid).await,
            Ok(None) => {
                warn!(title, "no language found, defaulting to English");
                LanguageCode::english()
            }
            Err(e) => {
                error!(title, error = %e, "failed to retrieve language, defaulting to English");
                LanguageCode::english()
            }
        }
    }

    /// Edition code of the language entity `qid`, `en` when unknown.
    pub async fn resolve_language_code(&self, qid: &str) -> LanguageCode {
        match self.graph.iso_code(qid).await {
            Ok(Some(raw)) => LanguageCode::parse(&raw).unwrap_or_else(|| {
                warn!(qid, code = %raw, "unusable language code, defaulting to English");
                LanguageCode::english()
            }),
            Ok(None) => {
                warn!(qid, "no ISO code found, defaulting to English");
                LanguageCode::english()
            }
            Err(e) => {
                error!(qid, error = %e, "failed to resolve language QID, defaulting to English");
                LanguageCode::english()
            }
        }
    }

    /// Title of the `lang` edition article, or `title` itself when there is none.
    pub async fn localize_title(&self, title: &str, lang: &LanguageCode) -> String {
        match self.graph.sitelink_title(title, lang).await {
            Ok(Some(local)) => local,
            Ok(None) => title.to_string(),
            Err(e) => {
                error!(title, lang = %lang, error = %e, "failed to look up site links");
                title.to_string()
            }
        }
    }

    pub async fn resolve(&self, title: &str) -> Resolution {
        let language = self.resolve_original_language(title).await;
        let title = self.localize_title(title, &language).await;
        Resolution { language, title }
    }

    /// Text of `section_title` (or the whole page) in the work's original
    /// language, falling back to the English page for the untranslated title.
    pub async fn fetch_text(&self, title: &str, section_title: Option<&str>) -> String {
        let Resolution {
            language,
            title: local_title,
        } = self.resolve(title).await;

        if let Some(page) = self.existing_page(&language, &local_title).await {
            return section_title
                .and_then(|name| page.section_by_title(name))
                .map(|section| section.text.clone())
                .unwrap_or_else(|| page.text());
        }

        warn!(
            title = %local_title,
            lang = %language,
            "Wikipedia page not found, defaulting to English"
        );

        if !language.is_english()
            && let Some(page) = self.existing_page(&LanguageCode::english(), title).await
        {
            return page.text();
        }

        PAGE_NOT_FOUND.to_string()
    }

    async fn existing_page(&self, lang: &LanguageCode, title: &str) -> Option<Page> {
        match self.encyclopedia.page(lang, title).await {
            Ok(page) if page.exists => Some(page),
            Ok(_) => None,
            Err(e) => {
                error!(title, lang = %lang, error = %e, "failed to fetch Wikipedia page");
                None
            }
        }
    }
}
