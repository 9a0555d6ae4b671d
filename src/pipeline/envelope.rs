use super::templates::NOT_AVAILABLE;
use serde::{Serialize, Serializer};
use std::fmt;

/// Publication year, serialized as a number or the not-available marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Year {
    Known(u32),
    Unknown,
}

impl From<Option<u32>> for Year {
    fn from(year: Option<u32>) -> Self {
        year.map_or(Self::Unknown, Self::Known)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(year) => write!(f, "{year}"),
            Self::Unknown => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for Year {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(year) => serializer.serialize_u32(*year),
            Self::Unknown => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

/// A numbered, citable view of one usable candidate paper
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    #[serde(rename = "ref")]
    pub label: String,
    pub title: String,
    pub year: Year,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Reference {
    /// Keep only ref, title, year and url
    #[must_use]
    pub fn compact(self) -> Self {
        Self {
            venue: None,
            authors: None,
            ..self
        }
    }
}

/// Wire payload returned for every chat request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseEnvelope {
    pub answer: String,
    pub refs: Vec<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ResponseEnvelope {
    pub fn without_refs(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            refs: Vec::new(),
            detail: None,
        }
    }
}
