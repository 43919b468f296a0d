use std::fmt;

use serde::{Deserialize, Serialize};

/// Which listing layout the fetcher should expect at a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    GoogleNews,
    #[serde(rename = "techcrunch")]
    TechCrunch,
    GoogleSearch,
    Generic,
    /// Synthesized when every source came up empty.
    Fallback,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::GoogleNews => "google_news",
            Strategy::TechCrunch => "techcrunch",
            Strategy::GoogleSearch => "google_search",
            Strategy::Generic => "generic",
            Strategy::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub name: String,
    pub endpoint: String,
    pub strategy: Strategy,
}

impl SourceDescriptor {
    pub fn new(name: &str, endpoint: &str, strategy: Strategy) -> Self {
        Self {
            name: name.to_string(),
            endpoint: endpoint.to_string(),
            strategy,
        }
    }
}
