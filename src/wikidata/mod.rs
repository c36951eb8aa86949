pub mod types;

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::language::LanguageCode;
use types::EntitiesResponse;

/// Original language of film or TV show / work.
pub const ORIGINAL_LANGUAGE: &str = "P364";
/// Language of work or name.
pub const LANGUAGE_OF_WORK: &str = "P407";
/// Wikimedia language code.
pub const LANGUAGE_CODE: &str = "P424";

/// Title lookups are resolved against the English Wikipedia.
const LOOKUP_SITE: &str = "enwiki";

#[derive(Debug, thiserror::Error)]
pub enum WikidataError {
    #[error("Title must not be empty")]
    EmptyTitle,

    #[error("Invalid QID: '{0}'")]
    InvalidQid(String),

    #[error("Invalid Wikidata endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Wikidata returned status {0}")]
    Status(u16),

    #[error("Entity {0} is missing from the Wikidata response")]
    MissingEntity(String),

    #[error("Wikidata API error ({code}): {info}")]
    Api { code: String, info: String },

    #[error("Malformed Wikidata response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Which part of an entity to request via `props=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityProps {
    Claims,
    Sitelinks,
}

impl EntityProps {
    fn as_str(self) -> &'static str {
        match self {
            EntityProps::Claims => "claims",
            EntityProps::Sitelinks => "sitelinks",
        }
    }
}

/// Read-only view of the knowledge graph used by the resolver.
/// Implemented by `WikidataClient` for production; fakes are used in tests.
#[allow(async_fn_in_trait)]
pub trait KnowledgeGraph {
    /// QID of the language the work titled `title` was written in.
    async fn original_language_qid(&self, title: &str) -> Result<Option<String>, WikidataError>;

    /// Raw language code claimed by the language entity `qid`.
    async fn iso_code(&self, qid: &str) -> Result<Option<String>, WikidataError>;

    /// Title of the `lang` edition article linked from the entity for `title`.
    async fn sitelink_title(
        &self,
        title: &str,
        lang: &LanguageCode,
    ) -> Result<Option<String>, WikidataError>;
}

/// HTTP client for the Wikidata `wbgetentities` API.
#[derive(Clone)]
pub struct WikidataClient {
    http: Client,
    user_agent: String,
    base_url: String,
}

impl WikidataClient {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            user_agent: config.user_agent.clone(),
            base_url: config.wikidata_api.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            user_agent: "wikilang-test".to_string(),
            base_url: base_url.to_string(),
        }
    }

    /// Entities linked from the English Wikipedia article `title`.
    pub async fn entities_by_title(
        &self,
        title: &str,
        props: EntityProps,
    ) -> Result<EntitiesResponse, WikidataError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(WikidataError::EmptyTitle);
        }
        let titles = title.replace(' ', "_");
        self.get_entities(&[
            ("titles", titles.as_str()),
            ("sites", LOOKUP_SITE),
            ("props", props.as_str()),
        ])
        .await
    }

    pub async fn entity_by_id(
        &self,
        qid: &str,
        props: EntityProps,
    ) -> Result<EntitiesResponse, WikidataError> {
        if !is_valid_qid(qid) {
            return Err(WikidataError::InvalidQid(qid.to_string()));
        }
        self.get_entities(&[("ids", qid), ("props", props.as_str())])
            .await
    }

    async fn get_entities(
        &self,
        params: &[(&str, &str)],
    ) -> Result<EntitiesResponse, WikidataError> {
        let mut url = Url::parse(&self.base_url)?;
        url.query_pairs_mut()
            .append_pair("action", "wbgetentities")
            .extend_pairs(params)
            .append_pair("format", "json");

        let response = self
            .http
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WikidataError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let mut parsed: EntitiesResponse = serde_json::from_str(&body)?;
        if let Some(err) = parsed.error.take() {
            return Err(WikidataError::Api {
                code: err.code.unwrap_or_else(|| "unknown".to_string()),
                info: err.info.unwrap_or_default(),
            });
        }

        debug!(entities = parsed.entities.len(), "wbgetentities complete");
        Ok(parsed)
    }
}

impl KnowledgeGraph for WikidataClient {
    async fn original_language_qid(&self, title: &str) -> Result<Option<String>, WikidataError> {
        let response = self.entities_by_title(title, EntityProps::Claims).await?;
        Ok(response.found().find_map(|entity| {
            [ORIGINAL_LANGUAGE, LANGUAGE_OF_WORK]
                .iter()
                .find_map(|prop| entity.first_entity_id(prop))
                .map(String::from)
        }))
    }

    async fn iso_code(&self, qid: &str) -> Result<Option<String>, WikidataError> {
        let response = self.entity_by_id(qid, EntityProps::Claims).await?;
        let entity = response
            .get(qid)
            .filter(|entity| !entity.is_missing())
            .ok_or_else(|| WikidataError::MissingEntity(qid.to_string()))?;
        Ok(entity.first_string(LANGUAGE_CODE).map(String::from))
    }

    async fn sitelink_title(
        &self,
        title: &str,
        lang: &LanguageCode,
    ) -> Result<Option<String>, WikidataError> {
        let response = self.entities_by_title(title, EntityProps::Sitelinks).await?;
        let site = lang.wiki_site();
        Ok(response
            .found()
            .find_map(|entity| entity.sitelink_title(&site))
            .map(String::from))
    }
}

fn is_valid_qid(qid: &str) -> bool {
    qid.strip_prefix('Q')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}
