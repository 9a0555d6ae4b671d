pub mod semantic_scholar;
pub mod traits;

pub use semantic_scholar::SemanticScholarProvider;
pub use traits::{ProviderError, ProviderResult, SearchContext, SearchQuery, SourceProvider};
