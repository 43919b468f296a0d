use crate::models::Candidate;

const URGENCY_KEYWORDS: &[&str] = &[
    "breaking",
    "just in",
    "latest",
    "new",
    "announces",
    "launches",
    "today",
    "this week",
    "now",
    "update",
    "development",
    "breakthrough",
    "major",
    "revolutionary",
    "game-changing",
];

const NOTABLE_ORGANIZATIONS: &[&str] = &[
    "openai",
    "google",
    "microsoft",
    "meta",
    "apple",
    "nvidia",
    "anthropic",
    "deepmind",
    "hugging face",
    "stability ai",
];

const HOT_TOPICS: &[&str] = &[
    "gpt",
    "chatgpt",
    "claude",
    "gemini",
    "llama",
    "copilot",
    "agi",
    "autonomous",
    "robotics",
    "ai safety",
    "regulation",
];

/// Source-name fragments and the flat bonus they earn. First match wins.
const SOURCE_BONUSES: &[(&str, u32)] = &[("google news", 15), ("techcrunch", 10)];

/// Keyword tables the scorer matches titles against.
#[derive(Debug, Clone, Copy)]
pub struct TrendingTables {
    pub urgency: &'static [&'static str],
    pub organizations: &'static [&'static str],
    pub hot_topics: &'static [&'static str],
    pub source_bonuses: &'static [(&'static str, u32)],
}

impl Default for TrendingTables {
    fn default() -> Self {
        Self {
            urgency: URGENCY_KEYWORDS,
            organizations: NOTABLE_ORGANIZATIONS,
            hot_topics: HOT_TOPICS,
            source_bonuses: SOURCE_BONUSES,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrendingScorer {
    tables: TrendingTables,
}

impl TrendingScorer {
    pub const URGENCY_POINTS: u32 = 20;
    pub const ORGANIZATION_POINTS: u32 = 15;
    pub const HOT_TOPIC_POINTS: u32 = 10;

    pub fn new(tables: TrendingTables) -> Self {
        Self { tables }
    }

    /// Additive newsworthiness score. Each keyword counts once no matter how
    /// often it appears.
    pub fn score(&self, candidate: &Candidate) -> u32 {
        let title = candidate.title.to_lowercase();
        let source = candidate.source_name.to_lowercase();

        let matches = |words: &[&str]| words.iter().filter(|w| title.contains(*w)).count() as u32;

        let keywords = matches(self.tables.urgency) * Self::URGENCY_POINTS
            + matches(self.tables.organizations) * Self::ORGANIZATION_POINTS
            + matches(self.tables.hot_topics) * Self::HOT_TOPIC_POINTS;

        let source_bonus = self
            .tables
            .source_bonuses
            .iter()
            .find(|(fragment, _)| source.contains(fragment))
            .map(|(_, bonus)| *bonus)
            .unwrap_or(0);

        keywords + source_bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, source: &str) -> Candidate {
        Candidate::new(title, "https://example.com/a", source)
    }

    #[test]
    fn richer_headline_outscores_plain_one() {
        let scorer = TrendingScorer::default();
        let rich = scorer.score(&candidate("Breaking: OpenAI announces GPT breakthrough", "Blog"));
        let plain = scorer.score(&candidate("OpenAI update", "Blog"));

        // breaking, announces, breakthrough (+60), openai (+15), gpt (+10)
        assert_eq!(rich, 85);
        // update (+20), openai (+15)
        assert_eq!(plain, 35);
        assert!(rich > plain);
    }

    #[test]
    fn repeated_keyword_counts_once() {
        let scorer = TrendingScorer::default();
        let once = scorer.score(&candidate("Nvidia earnings", "x"));
        let twice = scorer.score(&candidate("Nvidia earnings nvidia NVIDIA", "x"));
        assert_eq!(once, 15);
        assert_eq!(once, twice);
    }

    #[test]
    fn source_bonus_depends_on_source_name() {
        let scorer = TrendingScorer::default();
        let title = "Quiet earnings call";
        assert_eq!(scorer.score(&candidate(title, "Google News - AI Trending")), 15);
        assert_eq!(scorer.score(&candidate(title, "TechCrunch AI - Latest")), 10);
        assert_eq!(scorer.score(&candidate(title, "Some Blog")), 0);
    }

    #[test]
    fn empty_title_scores_only_source() {
        let scorer = TrendingScorer::default();
        assert_eq!(scorer.score(&candidate("", "techcrunch")), 10);
    }

    #[test]
    fn uses_injected_tables() {
        static URGENT: &[&str] = &["hot"];
        static ORGS: &[&str] = &["acme"];
        static TOPICS: &[&str] = &["widgets"];
        static BONUS: &[(&str, u32)] = &[("wire", 3)];

        let scorer = TrendingScorer::new(TrendingTables {
            urgency: URGENT,
            organizations: ORGS,
            hot_topics: TOPICS,
            source_bonuses: BONUS,
        });

        assert_eq!(scorer.score(&candidate("Hot: Acme widgets", "Acme Wire")), 20 + 15 + 10 + 3);
        assert_eq!(scorer.score(&candidate("Breaking OpenAI GPT", "Google News")), 0);
    }

    #[test]
    fn more_matches_never_lower_the_score() {
        let scorer = TrendingScorer::default();
        let titles = [
            "Model notes",
            "Latest model notes",
            "Latest Google model notes",
            "Latest Google Gemini model notes",
            "Latest Google Gemini model notes today",
        ];
        let scores: Vec<u32> = titles
            .iter()
            .map(|t| scorer.score(&candidate(t, "blog")))
            .collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]), "{scores:?}");
    }
}
