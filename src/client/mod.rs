pub mod providers;

pub use providers::{ProviderError, SemanticScholarProvider, SourceProvider};

use crate::config::SearchConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP client configuration for the upstream search service
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout duration
    pub timeout: Duration,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for HttpClientConfig {
    fn from(search: &SearchConfig) -> Self {
        Self {
            timeout: search.timeout(),
            connect_timeout: search.timeout().min(Duration::from_secs(10)),
            user_agent: search.user_agent.clone(),
        }
    }
}

/// Author entry as returned upstream, the name may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: Option<String>,
}

impl Author {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// A paper record retrieved from the search service, kept as received
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePaper {
    pub id: String,
    pub title: Option<String>,
    pub year: Option<u32>,
    pub abstract_text: Option<String>,
    pub venue: Option<String>,
    pub url: Option<String>,
    pub authors: Vec<Author>,
}

impl CandidatePaper {
    /// Create a candidate with just an identifier
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self {
            id,
            title: None,
            year: None,
            abstract_text: None,
            venue: None,
            url: None,
            authors: Vec::new(),
        }
    }

    /// A candidate is usable evidence when it carries a non-empty abstract
    #[must_use]
    pub fn has_usable_evidence(&self) -> bool {
        self.abstract_text.as_deref().is_some_and(|text| !text.is_empty())
    }
}
