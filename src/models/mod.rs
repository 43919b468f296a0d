mod article;
mod candidate;
mod source;

pub use article::{Article, NewArticle, SavedArticle};
pub use candidate::{Candidate, ScoredCandidate};
pub use source::{SourceDescriptor, Strategy};
