mod page;

pub use page::{Page, Section};

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::{Config, LANG_PLACEHOLDER};
use crate::language::LanguageCode;

#[derive(Debug, thiserror::Error)]
pub enum WikipediaError {
    #[error("Title must not be empty")]
    EmptyTitle,

    #[error("Invalid Wikipedia endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Wikipedia returned status {0}")]
    Status(u16),

    #[error("Wikipedia API error ({code}): {info}")]
    Api { code: String, info: String },

    #[error("Malformed Wikipedia response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of encyclopedia pages used by the resolver.
/// Implemented by `WikipediaClient` for production; fakes are used in tests.
#[allow(async_fn_in_trait)]
pub trait Encyclopedia {
    async fn page(&self, lang: &LanguageCode, title: &str) -> Result<Page, WikipediaError>;
}

#[derive(Deserialize, Debug)]
struct QueryResponse {
    query: Option<Query>,
    error: Option<ApiError>,
}

#[derive(Deserialize, Debug)]
struct ApiError {
    code: Option<String>,
    info: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Query {
    #[serde(default)]
    pages: Vec<QueryPage>,
}

#[derive(Deserialize, Debug)]
struct QueryPage {
    title: Option<String>,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    extract: Option<String>,
}

/// HTTP client for the MediaWiki `prop=extracts` API of each Wikipedia edition.
#[derive(Clone)]
pub struct WikipediaClient {
    http: Client,
    user_agent: String,
    /// Endpoint template with a `{lang}` placeholder.
    api_template: String,
}

impl WikipediaClient {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            user_agent: config.user_agent.clone(),
            api_template: config.wikipedia_api.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, api_template: &str) -> Self {
        Self {
            http,
            user_agent: "wikilang-test".to_string(),
            api_template: api_template.to_string(),
        }
    }

    fn endpoint(&self, lang: &LanguageCode) -> Result<Url, url::ParseError> {
        Url::parse(&self.api_template.replace(LANG_PLACEHOLDER, lang.as_str()))
    }

    async fn query(&self, lang: &LanguageCode, title: &str) -> Result<QueryResponse, WikipediaError> {
        let mut url = self.endpoint(lang)?;
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("prop", "extracts")
            .append_pair("explaintext", "1")
            .append_pair("exsectionformat", "wiki")
            .append_pair("redirects", "1")
            .append_pair("titles", title)
            .append_pair("format", "json")
            .append_pair("formatversion", "2");

        let response = self
            .http
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WikipediaError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl Encyclopedia for WikipediaClient {
    async fn page(&self, lang: &LanguageCode, title: &str) -> Result<Page, WikipediaError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(WikipediaError::EmptyTitle);
        }

        let response = self.query(lang, title).await?;
        if let Some(err) = response.error {
            return Err(WikipediaError::Api {
                code: err.code.unwrap_or_else(|| "unknown".to_string()),
                info: err.info.unwrap_or_default(),
            });
        }

        let Some(found) = response
            .query
            .and_then(|q| q.pages.into_iter().next())
            .filter(|p| !p.missing && !p.invalid)
        else {
            debug!(lang = %lang, title, "page does not exist");
            return Ok(Page::missing(lang.clone(), title));
        };

        let resolved_title = found.title.unwrap_or_else(|| title.to_string());
        let extract = found.extract.unwrap_or_default();
        debug!(lang = %lang, title = %resolved_title, bytes = extract.len(), "page fetched");
        Ok(Page::from_extract(lang.clone(), resolved_title, &extract))
    }
}
