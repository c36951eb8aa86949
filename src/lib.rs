//! Resolve a book title to its original-language Wikipedia article.
//!
//! The original language comes from Wikidata (P364, then P407, resolved to a
//! P424 code), the localized title from the entity's site links, and the text
//! from that edition's plain-text extract. When the localized page is missing
//! the English article for the original title is used instead.

pub mod config;
pub mod language;
pub mod resolve;
pub mod wikidata;
pub mod wikipedia;

pub use config::{Config, ConfigError};
pub use language::LanguageCode;
pub use resolve::{PAGE_NOT_FOUND, Resolution, Resolver};
pub use wikidata::{KnowledgeGraph, WikidataClient, WikidataError};
pub use wikipedia::{Encyclopedia, Page, Section, WikipediaClient, WikipediaError};

/// Builds a resolver backed by the live Wikidata and Wikipedia APIs.
pub fn connect(config: &Config) -> Result<Resolver<WikidataClient, WikipediaClient>, reqwest::Error> {
    let http = reqwest::Client::builder().timeout(config.timeout).build()?;
    Ok(Resolver::new(
        WikidataClient::new(http.clone(), config),
        WikipediaClient::new(http, config),
    ))
}
