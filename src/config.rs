use std::env;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("wikilang/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_WIKIDATA_API: &str = "https://www.wikidata.org/w/api.php";
pub const DEFAULT_WIKIPEDIA_API: &str = "https://{lang}.wikipedia.org/w/api.php";
pub const LANG_PLACEHOLDER: &str = "{lang}";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("WIKIPEDIA_API_URL must contain a {{lang}} placeholder, got '{0}'")]
    MissingLangPlaceholder(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// Runtime settings shared by the Wikidata and Wikipedia clients.
///
/// Read from the environment: `WIKILANG_USER_AGENT` (falling back to
/// `USER_AGENT`), `WIKIDATA_API_URL`, `WIKIPEDIA_API_URL` and
/// `WIKILANG_TIMEOUT_SECS`. Blank values count as unset.
#[derive(Debug, Clone)]
pub struct Config {
    pub user_agent: String,
    pub wikidata_api: String,
    /// URL template; `{lang}` is replaced with the edition code.
    pub wikipedia_api: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            wikidata_api: DEFAULT_WIKIDATA_API.to_string(),
            wikipedia_api: DEFAULT_WIKIPEDIA_API.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();
        let user_agent = get("WIKILANG_USER_AGENT")
            .or_else(|| get("USER_AGENT"))
            .unwrap_or(defaults.user_agent);
        let wikidata_api = get("WIKIDATA_API_URL").unwrap_or(defaults.wikidata_api);
        let wikipedia_api = get("WIKIPEDIA_API_URL").unwrap_or(defaults.wikipedia_api);
        if !wikipedia_api.contains(LANG_PLACEHOLDER) {
            return Err(ConfigError::MissingLangPlaceholder(wikipedia_api));
        }

        let timeout = match get("WIKILANG_TIMEOUT_SECS") {
            Some(raw) => parse_timeout(&raw)?,
            None => defaults.timeout,
        };

        Ok(Self {
            user_agent,
            wikidata_api,
            wikipedia_api,
            timeout,
        })
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidValue {
            key: "WIKILANG_TIMEOUT_SECS",
            message: format!("expected a positive number of seconds, got '{raw}'"),
        }),
    }
}
