use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A single normalized news/content entry. Titles and URLs are required;
/// everything else is carried through as the source reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub source: String,
    pub title: String,
    pub url: String,
    /// Free-form publication date text as the source provided it.
    pub published: Option<String>,
    pub score: Option<i64>,
}

/// A named collection of items from one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub items: Vec<Item>,
}

/// The full structured output of one run. The serde view of this type is the
/// JSON dump schema; the generation timestamp is carried for callers but not
/// written to the dump.
#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    pub date: NaiveDate,
    pub format: DigestFormat,
    pub keywords: Vec<String>,
    pub since: Option<NaiveDate>,
    pub groups: Vec<Group>,
    #[serde(skip)]
    pub generated_at: DateTime<Utc>,
}

/// Output format for the rendered digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DigestFormat {
    Markdown,
    Discord,
    Slack,
}

impl DigestFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DigestFormat::Markdown => "md",
            DigestFormat::Discord | DigestFormat::Slack => "txt",
        }
    }
}

impl std::fmt::Display for DigestFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DigestFormat::Markdown => "markdown",
            DigestFormat::Discord => "discord",
            DigestFormat::Slack => "slack",
        };
        write!(f, "{name}")
    }
}

/// How a source's URL is fetched and decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchKind {
    /// Syndication feed (RSS/Atom) parsed from the response body.
    Feed,
    /// JSON search endpoint with a `hits` array. Hits without a URL link to
    /// `item_url_base` followed by the hit's object id.
    SearchApi { item_url_base: String },
}

/// One configured source: a display name, the URL to fetch, and the strategy
/// used to decode the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub name: String,
    pub url: String,
    pub kind: FetchKind,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "signal-digest/0.1".to_string(),
            timeout_seconds: 20,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Generation timed out after {0} seconds")]
    Timeout(u64),

    #[error("{0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, DigestError>;
