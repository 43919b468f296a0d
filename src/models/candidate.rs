use super::Strategy;

/// An unpersisted headline proposed by a source probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub url: String,
    pub raw_content: String,
    pub source_name: String,
}

impl Candidate {
    pub fn new(title: impl Into<String>, url: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            raw_content: String::new(),
            source_name: source_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub trending_score: u32,
    pub origin_strategy: Strategy,
}
