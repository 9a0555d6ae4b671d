use super::traits::{ProviderError, ProviderResult, SearchContext, SearchQuery, SourceProvider};
use crate::client::{Author, CandidatePaper, HttpClientConfig};
use crate::config::DEFAULT_SEARCH_ENDPOINT;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, error, info};
use url::Url;

/// Field projection requested from the search endpoint
pub const SEARCH_FIELDS: &str = "title,year,abstract,url,venue,authors,paperId";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    data: Option<Vec<Option<PaperData>>>,
}

#[derive(Debug, Deserialize)]
struct PaperData {
    #[serde(rename = "paperId", default)]
    paper_id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    year: Option<u32>,
    #[serde(rename = "abstract", default)]
    abstract_text: Option<String>,
    #[serde(default)]
    venue: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    authors: Option<Vec<Option<AuthorData>>>,
}

#[derive(Debug, Deserialize)]
struct AuthorData {
    #[serde(default)]
    name: Option<String>,
}

impl From<PaperData> for CandidatePaper {
    fn from(data: PaperData) -> Self {
        let authors = data
            .authors
            .unwrap_or_default()
            .into_iter()
            .map(|author| Author {
                name: author.and_then(|a| a.name),
            })
            .collect();

        Self {
            id: data.paper_id.unwrap_or_default(),
            title: data.title,
            year: data.year,
            abstract_text: data.abstract_text,
            venue: data.venue,
            url: data.url,
            authors,
        }
    }
}

/// Semantic Scholar Graph API paper search
pub struct SemanticScholarProvider {
    client: Client,
    base_url: String,
}

impl SemanticScholarProvider {
    /// Create a provider against the public endpoint
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_endpoint(DEFAULT_SEARCH_ENDPOINT, &HttpClientConfig::default())
    }

    /// Create a provider against a specific search endpoint
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        http: &HttpClientConfig,
    ) -> Result<Self, ProviderError> {
        let base_url = endpoint.into();
        Url::parse(&base_url)
            .map_err(|e| ProviderError::Other(format!("Invalid base URL: {e}")))?;

        let client = Client::builder()
            .timeout(http.timeout)
            .connect_timeout(http.connect_timeout)
            .user_agent(http.user_agent.clone())
            .build()
            .map_err(|e| ProviderError::Other(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Build the search URL, the query goes upstream untouched
    fn build_search_url(&self, query: &SearchQuery) -> Result<String, ProviderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProviderError::Other(format!("Invalid base URL: {e}")))?;

        url.query_pairs_mut()
            .append_pair("query", &query.query)
            .append_pair("limit", &query.max_results.to_string())
            .append_pair("fields", SEARCH_FIELDS);

        Ok(url.to_string())
    }

    fn parse_response(response_text: &str) -> Result<(Vec<CandidatePaper>, Option<u64>), ProviderError> {
        let response: SearchResponse = serde_json::from_str(response_text)
            .map_err(|e| ProviderError::Parse(format!("Failed to parse search response: {e}")))?;

        let papers: Vec<CandidatePaper> = response
            .data
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .map(CandidatePaper::from)
            .collect();

        debug!("Parsed {} papers from Semantic Scholar response", papers.len());
        Ok((papers, response.total))
    }
}

#[async_trait]
impl SourceProvider for SemanticScholarProvider {
    fn name(&self) -> &str {
        "semantic_scholar"
    }

    async fn search(
        &self,
        query: &SearchQuery,
        context: &SearchContext,
    ) -> Result<ProviderResult, ProviderError> {
        let start_time = Instant::now();

        let url = self.build_search_url(query)?;
        debug!("Semantic Scholar search URL: {}", url);

        let mut request = self.client.get(&url);
        for (key, value) in &context.headers {
            request = request.header(key, value);
        }

        let response = request
            .timeout(context.timeout)
            .send()
            .await
            .map_err(|e| {
                error!("Semantic Scholar request failed: {}", e);
                if e.is_timeout() {
                    ProviderError::Timeout(context.timeout)
                } else if e.is_connect() {
                    ProviderError::Network(format!("Connection failed: {e}"))
                } else {
                    ProviderError::Network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                429 => ProviderError::RateLimit,
                503 => ProviderError::ServiceUnavailable(
                    "Semantic Scholar service temporarily unavailable".to_string(),
                ),
                code => ProviderError::Http {
                    status: code,
                    message: error_text,
                },
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(format!("Failed to read response: {e}")))?;

        let (papers, total_available) = Self::parse_response(&response_text)?;
        let search_time = start_time.elapsed();

        info!(
            "Semantic Scholar search completed: {} papers found in {:?}",
            papers.len(),
            search_time
        );

        Ok(ProviderResult {
            papers,
            source: "Semantic Scholar".to_string(),
            total_available,
            search_time,
        })
    }
}
