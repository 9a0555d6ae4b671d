use super::outcome::{ChatError, Question, SearchLimit};
use crate::client::providers::{SearchContext, SearchQuery};
use crate::client::{CandidatePaper, ProviderError, SourceProvider};
use crate::resilience::TimeoutExt;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Turns a question into raw candidate papers with one bounded upstream call
#[derive(Clone)]
pub struct Retriever {
    provider: Arc<dyn SourceProvider>,
    context: SearchContext,
    deadline: Duration,
}

impl fmt::Debug for Retriever {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retriever")
            .field("provider", &self.provider.name())
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl Retriever {
    pub fn new(provider: Arc<dyn SourceProvider>, deadline: Duration) -> Self {
        Self {
            provider,
            context: SearchContext::new(deadline),
            deadline,
        }
    }

    /// Candidates in upstream order, unfiltered. No retries.
    #[instrument(skip(self, question), fields(provider = self.provider.name(), limit = limit.get()))]
    pub async fn fetch_candidates(
        &self,
        question: &Question,
        limit: SearchLimit,
    ) -> Result<Vec<CandidatePaper>, ChatError> {
        debug!("Searching literature for: {}", question.as_str());

        let query = SearchQuery {
            query: question.as_str().to_string(),
            max_results: limit.get(),
        };

        let result = match self
            .provider
            .search(&query, &self.context)
            .with_timeout_duration(self.deadline)
            .await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.deadline)),
        };

        match result {
            Ok(result) => {
                info!(
                    "Retrieved {} candidates from {} in {:?}",
                    result.papers.len(),
                    result.source,
                    result.search_time
                );
                Ok(result.papers)
            }
            Err(err) => {
                warn!("Literature search failed: {}", err);
                Err(ChatError::from(err))
            }
        }
    }
}
