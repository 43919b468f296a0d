use std::time::Duration;

use chrono::{DateTime, Local};
use rand::Rng;
use tracing::{debug, error, info, warn};

use crate::config::SelectionPolicy;
use crate::db::NewsStore;
use crate::models::{Candidate, NewArticle, SavedArticle, ScoredCandidate, SourceDescriptor, Strategy};
use crate::services::{FullPage, PageFetcher};
use crate::summary::SummarySynthesizer;
use crate::text::{normalize, truncate_chars};
use crate::trending::TrendingScorer;

/// Article text handed to the summarizer and the store.
pub const MAX_PIPELINE_CONTENT_CHARS: usize = 3000;

const FALLBACK_SOURCE: &str = "AI Update Service";

/// Randomized pause between outbound requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinkTime {
    min_ms: u64,
    max_ms: u64,
}

impl ThinkTime {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms,
        }
    }

    pub fn none() -> Self {
        Self::new(0, 0)
    }

    pub async fn pause(&self) {
        if self.max_ms == 0 {
            return;
        }
        let delay = rand::rng().random_range(self.min_ms..=self.max_ms);
        debug!(delay_ms = delay, "Pausing before next request");
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
}

/// Outcome of probing the sources.
#[derive(Debug, Clone)]
pub struct Selection {
    pub best: ScoredCandidate,
    /// True when no source produced a fresh candidate.
    pub fallback: bool,
    pub sources_probed: usize,
    pub fresh_seen: usize,
}

/// Everything the CLI reports after a discovery run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub title: String,
    pub url: String,
    pub source: String,
    pub found_via: String,
    pub strategy: Strategy,
    pub trending_score: u32,
    pub content_chars: usize,
    pub summary: String,
    pub fallback: bool,
    /// `None` when the final write failed; the error has been logged.
    pub saved: Option<SavedArticle>,
}

/// Probes sources in order, keeps the most trending unseen headline and
/// stores it with a synthesized summary. Always ends with exactly one
/// article, real or synthesized.
pub struct Orchestrator<F> {
    fetcher: F,
    store: NewsStore,
    scorer: TrendingScorer,
    synthesizer: SummarySynthesizer,
    policy: SelectionPolicy,
    think_time: ThinkTime,
}

impl<F: PageFetcher> Orchestrator<F> {
    pub fn new(fetcher: F, store: NewsStore, policy: SelectionPolicy, think_time: ThinkTime) -> Self {
        Self {
            fetcher,
            store,
            scorer: TrendingScorer::default(),
            synthesizer: SummarySynthesizer::default(),
            policy,
            think_time,
        }
    }

    pub fn with_scorer(mut self, scorer: TrendingScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn store(&self) -> &NewsStore {
        &self.store
    }

    pub async fn run(&self, sources: &[SourceDescriptor]) -> RunReport {
        let selection = self.select(sources).await;
        let ScoredCandidate {
            candidate,
            trending_score,
            origin_strategy,
        } = selection.best;

        info!(
            title = %truncate_chars(&candidate.title, 80),
            score = trending_score,
            fallback = selection.fallback,
            "Selected article"
        );

        let page = self.full_page(&candidate).await;
        let content = truncate_chars(&normalize(&page.content), MAX_PIPELINE_CONTENT_CHARS);
        let summary = self.synthesizer.summarize(&candidate.title, &content);

        if self.content_seen(&candidate.title, &content).await {
            info!("Article content is already stored, the existing row will be replaced");
        }

        let article = NewArticle {
            title: candidate.title.clone(),
            url: candidate.url.clone(),
            content: content.clone(),
            summary: summary.clone(),
            source: page.source_label.clone(),
        };

        let saved = match self.store.save(&article).await {
            Ok(saved) => Some(saved),
            Err(e) => {
                error!(error = %e, "Failed to save article");
                None
            }
        };

        RunReport {
            title: candidate.title,
            url: candidate.url,
            source: page.source_label,
            found_via: candidate.source_name,
            strategy: origin_strategy,
            trending_score,
            content_chars: content.chars().count(),
            summary,
            fallback: selection.fallback,
            saved,
        }
    }

    /// Probe sources in order and pick the highest scoring fresh candidate.
    /// Ties keep the candidate seen first.
    pub async fn select(&self, sources: &[SourceDescriptor]) -> Selection {
        let mut best: Option<ScoredCandidate> = None;
        let mut sources_probed = 0;
        let mut fresh_seen = 0;

        'sources: for (index, source) in sources.iter().enumerate() {
            sources_probed += 1;
            info!(source = %source.name, strategy = %source.strategy, "Probing source");

            match self.fetcher.fetch_listing(source).await {
                Err(e) => warn!(source = %source.name, error = %e, "Source failed, moving on"),
                Ok(candidates) if candidates.is_empty() => {
                    warn!(source = %source.name, "Source returned no candidates, moving on")
                }
                Ok(candidates) => {
                    for candidate in candidates {
                        if self.store.is_duplicate(&candidate.title, "").await {
                            debug!(title = %candidate.title, "Skipping already stored headline");
                            continue;
                        }
                        fresh_seen += 1;

                        let scored = self.rank(candidate, source.strategy);
                        let improves = best
                            .as_ref()
                            .map_or(true, |current| scored.trending_score > current.trending_score);
                        if improves {
                            info!(
                                score = scored.trending_score,
                                title = %truncate_chars(&scored.candidate.title, 80),
                                "New best candidate"
                            );
                            best = Some(scored);
                        }

                        if let SelectionPolicy::FirstFresh { threshold } = self.policy {
                            if fresh_seen >= threshold {
                                info!(fresh = fresh_seen, "Enough fresh candidates, stopping early");
                                break 'sources;
                            }
                        }
                    }
                }
            }

            if index + 1 < sources.len() {
                self.think_time.pause().await;
            }
        }

        match best {
            Some(best) => Selection {
                best,
                fallback: false,
                sources_probed,
                fresh_seen,
            },
            None => {
                warn!(sources = sources_probed, "No source produced a fresh candidate, using fallback");
                Selection {
                    best: self.fallback_candidate(Local::now()),
                    fallback: true,
                    sources_probed,
                    fresh_seen,
                }
            }
        }
    }

    /// Same fingerprint inputs `NewsStore::save` uses: normalized title plus
    /// the already cleaned content.
    async fn content_seen(&self, title: &str, content: &str) -> bool {
        self.store.is_duplicate(&normalize(title), content).await
    }

    fn rank(&self, candidate: Candidate, strategy: Strategy) -> ScoredCandidate {
        let trending_score = self.scorer.score(&candidate);
        ScoredCandidate {
            candidate,
            trending_score,
            origin_strategy: strategy,
        }
    }

    /// Date-stamped placeholder used when every source came up empty.
    pub fn fallback_candidate(&self, now: DateTime<Local>) -> ScoredCandidate {
        let candidate = Candidate::new(
            format!("AI Technology Update - {}", now.format("%B %d, %Y")),
            format!("https://ai-update.com/{}", now.format("%Y%m%d")),
            FALLBACK_SOURCE,
        );
        self.rank(candidate, Strategy::Fallback)
    }

    async fn full_page(&self, candidate: &Candidate) -> FullPage {
        match self.fetcher.fetch_full(&candidate.url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url = %candidate.url, error = %e, "Could not fetch article, using stand-in content");
                FullPage {
                    content: stand_in_content(&candidate.source_name),
                    source_label: candidate.source_name.clone(),
                }
            }
        }
    }
}

fn stand_in_content(source_name: &str) -> String {
    format!(
        "Fresh AI news from {source_name}. This article discusses the latest developments in \
         artificial intelligence technology, including new breakthroughs in machine learning, \
         natural language processing, and AI applications across various industries."
    )
}
