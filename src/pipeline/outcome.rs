use super::envelope::{Reference, ResponseEnvelope};
use super::templates::{
    EMPTY_QUESTION_ANSWER, INTERNAL_ERROR_ANSWER, NO_EVIDENCE_ANSWER, UPSTREAM_UNAVAILABLE_ANSWER,
};
use crate::client::ProviderError;
use crate::config::SEARCH_LIMIT_RANGE;
use thiserror::Error;

/// Failures of a single chat request
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("question is empty")]
    EmptyQuestion,

    #[error("literature search unavailable: {0}")]
    UpstreamUnavailable(#[source] ProviderError),

    #[error("{0}")]
    Internal(String),
}

impl From<ProviderError> for ChatError {
    fn from(err: ProviderError) -> Self {
        if err.is_unavailable() {
            Self::UpstreamUnavailable(err)
        } else {
            Self::Internal(err.to_string())
        }
    }
}

/// A trimmed, non-empty question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question(String);

impl Question {
    pub fn parse(raw: &str) -> Result<Self, ChatError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ChatError::EmptyQuestion);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Number of candidates requested upstream, bounded by [`SEARCH_LIMIT_RANGE`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimit(u32);

impl SearchLimit {
    pub fn new(limit: u32) -> crate::Result<Self> {
        if !SEARCH_LIMIT_RANGE.contains(&limit) {
            return Err(crate::Error::invalid_input(
                "limit",
                format!(
                    "must be between {} and {}",
                    SEARCH_LIMIT_RANGE.start(),
                    SEARCH_LIMIT_RANGE.end()
                ),
            ));
        }
        Ok(Self(limit))
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradedReason {
    EmptyQuestion,
    UpstreamUnavailable,
    NoUsableEvidence,
}

impl DegradedReason {
    #[must_use]
    pub const fn answer(self) -> &'static str {
        match self {
            Self::EmptyQuestion => EMPTY_QUESTION_ANSWER,
            Self::UpstreamUnavailable => UPSTREAM_UNAVAILABLE_ANSWER,
            Self::NoUsableEvidence => NO_EVIDENCE_ANSWER,
        }
    }
}

/// Tagged result of the pipeline, flattened into an envelope only at the HTTP boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    Answered {
        answer: String,
        references: Vec<Reference>,
    },
    Degraded {
        reason: DegradedReason,
        /// Diagnostic for transport-level failures, never set for status-based ones
        detail: Option<String>,
    },
    Failed {
        detail: String,
    },
}

impl ChatOutcome {
    #[must_use]
    pub const fn degraded(reason: DegradedReason) -> Self {
        Self::Degraded {
            reason,
            detail: None,
        }
    }

    #[must_use]
    pub fn failed(detail: impl Into<String>) -> Self {
        Self::Failed {
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn into_envelope(self) -> ResponseEnvelope {
        match self {
            Self::Answered { answer, references } => ResponseEnvelope {
                answer,
                refs: references,
                detail: None,
            },
            Self::Degraded { reason, detail } => ResponseEnvelope {
                detail,
                ..ResponseEnvelope::without_refs(reason.answer())
            },
            Self::Failed { detail } => {
                let detail = if detail.trim().is_empty() {
                    "unknown error".to_string()
                } else {
                    detail
                };
                ResponseEnvelope {
                    detail: Some(detail),
                    ..ResponseEnvelope::without_refs(INTERNAL_ERROR_ANSWER)
                }
            }
        }
    }
}

impl From<ChatError> for ChatOutcome {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyQuestion => Self::degraded(DegradedReason::EmptyQuestion),
            ChatError::UpstreamUnavailable(cause) => Self::Degraded {
                reason: DegradedReason::UpstreamUnavailable,
                detail: cause.is_transport().then(|| cause.to_string()),
            },
            ChatError::Internal(detail) => Self::Failed { detail },
        }
    }
}
