use crate::client::CandidatePaper;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Search query parameters for a provider
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Query string, passed upstream verbatim
    pub query: String,
    /// Maximum results to return
    pub max_results: u32,
}

/// Context for search operations
#[derive(Debug, Clone)]
pub struct SearchContext {
    /// Timeout for the search operation
    pub timeout: Duration,
    /// Additional headers
    pub headers: HashMap<String, String>,
}

impl SearchContext {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        Self { timeout, headers }
    }
}

/// Result from a source provider
#[derive(Debug, Clone)]
pub struct ProviderResult {
    /// Papers in upstream relevance order
    pub papers: Vec<CandidatePaper>,
    /// Source that provided the results
    pub source: String,
    /// Total number of results available (if known)
    pub total_available: Option<u64>,
    /// Time taken to execute the search
    pub search_time: Duration,
}

/// Errors that can occur during provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Provider error: {0}")]
    Other(String),
}

impl ProviderError {
    /// Transport failures and non-success statuses, as opposed to bad payloads
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::Http { .. }
                | Self::RateLimit
                | Self::ServiceUnavailable(_)
                | Self::Timeout(_)
        )
    }

    /// The request never produced an HTTP response
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}

/// Trait for academic source providers
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Unique name/identifier for this provider
    fn name(&self) -> &str;

    /// Search for papers using this provider. One outbound call, no retries.
    async fn search(
        &self,
        query: &SearchQuery,
        context: &SearchContext,
    ) -> Result<ProviderResult, ProviderError>;
}
