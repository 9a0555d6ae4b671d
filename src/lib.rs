pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod resilience;
pub mod server;

pub use client::{CandidatePaper, SemanticScholarProvider, SourceProvider};
pub use config::{Config, ConfigOverrides};
pub use error::{Error, Result};
pub use pipeline::{ChatOutcome, ChatService, ResponseEnvelope, Retriever, Synthesizer};
pub use server::Server;
