use super::envelope::{Reference, ResponseEnvelope, Year};
use super::outcome::{ChatOutcome, DegradedReason};
use super::templates::{render_answer, NOT_AVAILABLE};
use crate::client::{Author, CandidatePaper};
use crate::config::{ReferenceFields, SynthesisConfig};
use tracing::debug;

const MAX_LISTED_AUTHORS: usize = 3;

/// Filters candidates to usable evidence and renders the templated answer.
/// Pure: the same candidates always produce the same answer text.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    config: SynthesisConfig,
}

impl Synthesizer {
    #[must_use]
    pub const fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn synthesize(&self, candidates: Vec<CandidatePaper>) -> ChatOutcome {
        let total = candidates.len();
        let evidence = select_evidence(candidates, self.config.max_references);
        debug!("{} of {} candidates carry usable evidence", evidence.len(), total);

        if evidence.is_empty() {
            return ChatOutcome::degraded(DegradedReason::NoUsableEvidence);
        }

        let references: Vec<Reference> = evidence
            .iter()
            .enumerate()
            .map(|(index, paper)| to_reference(index, paper))
            .map(|reference| match self.config.reference_fields {
                ReferenceFields::Full => reference,
                ReferenceFields::Compact => reference.compact(),
            })
            .collect();

        let labels: Vec<&str> = references.iter().map(|r| r.label.as_str()).collect();
        let answer = render_answer(&labels);

        ChatOutcome::Answered { answer, references }
    }

    #[must_use]
    pub fn build_response(&self, candidates: Vec<CandidatePaper>) -> ResponseEnvelope {
        self.synthesize(candidates).into_envelope()
    }
}

/// Usable candidates in their original order, at most `cap` of them
#[must_use]
pub fn select_evidence(candidates: Vec<CandidatePaper>, cap: usize) -> Vec<CandidatePaper> {
    candidates
        .into_iter()
        .filter(CandidatePaper::has_usable_evidence)
        .take(cap)
        .collect()
}

/// `REF-1` for the first retained paper
#[must_use]
pub fn reference_label(index: usize) -> String {
    format!("REF-{}", index + 1)
}

/// Up to three names joined by ", ", with " et al." when more names exist
#[must_use]
pub fn format_authors(authors: &[Author]) -> String {
    let names: Vec<&str> = authors
        .iter()
        .filter_map(|author| author.name.as_deref())
        .filter(|name| !name.is_empty())
        .collect();

    if names.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    let listed = names[..names.len().min(MAX_LISTED_AUTHORS)].join(", ");
    if names.len() > MAX_LISTED_AUTHORS {
        format!("{listed} et al.")
    } else {
        listed
    }
}

fn to_reference(index: usize, paper: &CandidatePaper) -> Reference {
    Reference {
        label: reference_label(index),
        title: paper
            .title
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        year: Year::from(paper.year),
        venue: paper.venue.clone().filter(|venue| !venue.is_empty()),
        authors: Some(format_authors(&paper.authors)),
        url: paper.url.clone(),
    }
}
