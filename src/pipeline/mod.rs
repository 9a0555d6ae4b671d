//! # Retrieval and synthesis pipeline
//!
//! A question flows through [`Retriever::fetch_candidates`] and then
//! [`Synthesizer::synthesize`]. Every failure is absorbed into a
//! [`ChatOutcome`], which the HTTP layer turns into a [`ResponseEnvelope`].

pub mod envelope;
pub mod outcome;
pub mod retriever;
pub mod synthesizer;
pub mod templates;

pub use envelope::{Reference, ResponseEnvelope, Year};
pub use outcome::{ChatError, ChatOutcome, DegradedReason, Question, SearchLimit};
pub use retriever::Retriever;
pub use synthesizer::{format_authors, Synthesizer};

use crate::client::{HttpClientConfig, SemanticScholarProvider};
use crate::{Config, Result};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Answers one question per call; holds no per-request state
#[derive(Debug, Clone)]
pub struct ChatService {
    retriever: Retriever,
    synthesizer: Synthesizer,
    limit: SearchLimit,
}

impl ChatService {
    pub const fn new(retriever: Retriever, synthesizer: Synthesizer, limit: SearchLimit) -> Self {
        Self {
            retriever,
            synthesizer,
            limit,
        }
    }

    /// Wire the Semantic Scholar provider from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = SemanticScholarProvider::with_endpoint(
            config.search.endpoint.clone(),
            &HttpClientConfig::from(&config.search),
        )?;

        Ok(Self::new(
            Retriever::new(Arc::new(provider), config.search.timeout()),
            Synthesizer::new(config.synthesis.clone()),
            SearchLimit::new(config.search.limit)?,
        ))
    }

    #[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
    pub async fn answer(&self, raw_question: &str) -> ChatOutcome {
        let question = match Question::parse(raw_question) {
            Ok(question) => question,
            Err(err) => {
                info!("Rejected request: {}", err);
                return err.into();
            }
        };

        let candidates = match self.retriever.fetch_candidates(&question, self.limit).await {
            Ok(candidates) => candidates,
            Err(err) => return err.into(),
        };

        let outcome = self.synthesizer.synthesize(candidates);
        match &outcome {
            ChatOutcome::Answered { references, .. } => {
                info!("Answered with {} references", references.len());
            }
            other => info!("Answered without references: {:?}", other),
        }
        outcome
    }
}
