use std::fmt::{self, Write};

use crate::text::truncate_chars;

/// Upper bound on a summary, ellipsis included.
pub const MAX_SUMMARY_CHARS: usize = 200;

const ELLIPSIS: &str = "...";
const UNTITLED: &str = "AI News Update";

const DEFAULT_ORGANIZATION: &str = "A tech company";
const DEFAULT_ACTION: &str = "introduced";
const DEFAULT_TOPIC: &str = "AI technology";
const GENERIC_CLOSING: &str = "This development marks continued innovation in artificial intelligence.";

const ORGANIZATIONS: &[&str] = &[
    "openai",
    "google",
    "microsoft",
    "meta",
    "apple",
    "nvidia",
    "amazon",
    "anthropic",
    "deepmind",
    "tesla",
    "salesforce",
];

/// Proper nouns that plain capitalization would get wrong.
const ORGANIZATION_SPELLINGS: &[(&str, &str)] = &[("openai", "OpenAI"), ("deepmind", "DeepMind")];

const ACTIONS: &[&str] = &[
    "announce",
    "launch",
    "release",
    "develop",
    "create",
    "introduce",
    "unveil",
    "reveal",
    "debut",
    "rollout",
];

/// Past tenses spelled out explicitly rather than derived.
const IRREGULAR_PAST: &[(&str, &str)] = &[
    ("announce", "announced"),
    ("launch", "launched"),
    ("release", "released"),
];

/// Raw keyword to canonical topic phrase, checked in order. The bare "ai"
/// comes first, so it also wins for names like "OpenAI".
const TOPICS: &[(&str, &str)] = &[
    ("ai", "AI technology"),
    ("artificial intelligence", "AI technology"),
    ("gpt", "ChatGPT technology"),
    ("chatgpt", "ChatGPT technology"),
    ("machine learning", "machine learning capabilities"),
    ("neural", "AI technology"),
    ("llm", "AI technology"),
    ("generative ai", "AI technology"),
    ("automation", "automation solutions"),
    ("robotics", "robotics technology"),
];

const CLOSINGS: &[(&[&str], &str)] = &[
    (
        &["breakthrough", "revolutionary", "game-changing"],
        "This breakthrough could transform the tech industry.",
    ),
    (
        &["partnership", "collaboration", "deal"],
        "This partnership accelerates AI development progress.",
    ),
    (
        &["funding", "investment", "raises"],
        "This investment signals strong market confidence in AI.",
    ),
    (
        &["research", "study", "paper"],
        "This research advances our understanding of AI capabilities.",
    ),
];

#[derive(Debug, Clone, Copy)]
pub struct SummaryTables {
    pub organizations: &'static [&'static str],
    pub organization_spellings: &'static [(&'static str, &'static str)],
    pub actions: &'static [&'static str],
    pub irregular_past: &'static [(&'static str, &'static str)],
    pub topics: &'static [(&'static str, &'static str)],
    /// Checked in order against the title; the first group that matches
    /// picks the closing sentence.
    pub closings: &'static [(&'static [&'static str], &'static str)],
}

impl Default for SummaryTables {
    fn default() -> Self {
        Self {
            organizations: ORGANIZATIONS,
            organization_spellings: ORGANIZATION_SPELLINGS,
            actions: ACTIONS,
            irregular_past: IRREGULAR_PAST,
            topics: TOPICS,
            closings: CLOSINGS,
        }
    }
}

/// Builds the one-line "who did what" blurb stored next to each article.
#[derive(Debug, Clone, Default)]
pub struct SummarySynthesizer {
    tables: SummaryTables,
}

impl SummarySynthesizer {
    pub fn new(tables: SummaryTables) -> Self {
        Self { tables }
    }

    pub fn summarize(&self, title: &str, content: &str) -> String {
        let title = if title.trim().is_empty() { UNTITLED } else { title };

        match self.compose(title, content) {
            Ok(summary) => bound(summary),
            Err(e) => {
                tracing::error!(error = %e, "Summary composition failed");
                fallback_summary(title)
            }
        }
    }

    fn compose(&self, title: &str, content: &str) -> Result<String, fmt::Error> {
        let title_lower = title.to_lowercase();
        let content_lower = content.to_lowercase();
        let in_either = |word: &str| title_lower.contains(word) || content_lower.contains(word);

        let organization = self
            .tables
            .organizations
            .iter()
            .find(|org| in_either(**org))
            .map(|org| self.display_name(org))
            .unwrap_or_else(|| DEFAULT_ORGANIZATION.to_string());

        let action = self
            .tables
            .actions
            .iter()
            .find(|verb| title_lower.contains(*verb))
            .map(|verb| self.past_tense(verb))
            .unwrap_or_else(|| DEFAULT_ACTION.to_string());

        let topic = self
            .tables
            .topics
            .iter()
            .find(|(keyword, _)| in_either(*keyword))
            .map(|(_, phrase)| *phrase)
            .unwrap_or(DEFAULT_TOPIC);

        let closing = self
            .tables
            .closings
            .iter()
            .find(|(words, _)| words.iter().any(|w| title_lower.contains(w)))
            .map(|(_, sentence)| *sentence)
            .unwrap_or(GENERIC_CLOSING);

        let mut summary = String::new();
        write!(summary, "{organization} has {action} new {topic}. {closing}")?;
        Ok(summary)
    }

    fn display_name(&self, org: &str) -> String {
        self.tables
            .organization_spellings
            .iter()
            .find(|(raw, _)| *raw == org)
            .map(|(_, spelled)| spelled.to_string())
            .unwrap_or_else(|| capitalize(org))
    }

    fn past_tense(&self, verb: &str) -> String {
        if let Some((_, past)) = self.tables.irregular_past.iter().find(|(base, _)| *base == verb) {
            return past.to_string();
        }
        if verb.ends_with('e') {
            format!("{verb}d")
        } else {
            format!("{verb}ed")
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn bound(summary: String) -> String {
    if summary.chars().count() <= MAX_SUMMARY_CHARS {
        return summary;
    }
    let keep = MAX_SUMMARY_CHARS - ELLIPSIS.len();
    format!("{}{ELLIPSIS}", truncate_chars(&summary, keep))
}

fn fallback_summary(title: &str) -> String {
    format!(
        "Latest AI technology update: {}. This represents new progress in artificial intelligence.",
        truncate_chars(title, 100)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn announces_breakthrough_from_openai() {
        let synth = SummarySynthesizer::default();
        let summary = synth.summarize("OpenAI announces breakthrough AI model", "...");

        assert!(summary.contains("OpenAI"));
        assert!(summary.contains("has announced"));
        assert!(summary.ends_with("This breakthrough could transform the tech industry."));
        assert!(summary.chars().count() <= MAX_SUMMARY_CHARS);
        assert_eq!(
            summary,
            "OpenAI has announced new AI technology. This breakthrough could transform the tech industry."
        );
    }

    #[test]
    fn falls_back_to_placeholders() {
        let synth = SummarySynthesizer::default();
        assert_eq!(
            synth.summarize("Quarterly results posted", ""),
            "A tech company has introduced new AI technology. \
             This development marks continued innovation in artificial intelligence."
        );
    }

    #[test]
    fn picks_partnership_closing_and_robotics_topic() {
        let synth = SummarySynthesizer::default();
        assert_eq!(
            synth.summarize("Microsoft and Nvidia deal to develop robotics", ""),
            "Microsoft has developed new robotics technology. \
             This partnership accelerates AI development progress."
        );
    }

    #[test]
    fn bare_ai_topic_matches_first() {
        let synth = SummarySynthesizer::default();
        assert_eq!(
            synth.summarize("OpenAI launches GPT-5", ""),
            "OpenAI has launched new AI technology. \
             This development marks continued innovation in artificial intelligence."
        );
        assert!(synth
            .summarize("Robotics firm ships GPT helpers", "")
            .contains(" new ChatGPT technology."));
    }

    #[test]
    fn organization_can_come_from_content() {
        let synth = SummarySynthesizer::default();
        let summary = synth.summarize("Lab unveils model", "Researchers at DeepMind said...");
        assert!(summary.starts_with("DeepMind has unveiled new"), "{summary}");
    }

    #[test]
    fn closing_priority_follows_group_order() {
        let synth = SummarySynthesizer::default();
        let summary = synth.summarize("Startup raises funding for research", "");
        assert!(summary.ends_with("This investment signals strong market confidence in AI."));
    }

    #[test]
    fn past_tense_uses_overrides_then_suffix_rule() {
        let synth = SummarySynthesizer::default();
        assert!(synth
            .summarize("Nvidia to release robotics kit", "")
            .starts_with("Nvidia has released new"));
        assert!(synth
            .summarize("Tesla will debut robotics line", "")
            .starts_with("Tesla has debuted new"));
        assert!(synth
            .summarize("Google rollout of Gemini", "")
            .starts_with("Google has rollouted new"));
    }

    #[test]
    fn fallback_summary_keeps_first_hundred_title_chars() {
        let title = format!("{}{}", "a".repeat(100), "b".repeat(50));
        assert_eq!(
            fallback_summary(&title),
            format!(
                "Latest AI technology update: {}. This represents new progress in artificial intelligence.",
                "a".repeat(100)
            )
        );
    }

    #[test]
    fn empty_title_still_produces_sentence() {
        let synth = SummarySynthesizer::default();
        let summary = synth.summarize("", "");
        assert!(summary.starts_with("A tech company has introduced new"));
    }

    #[test]
    fn long_output_is_truncated_with_ellipsis() {
        static GROUPS: &[&str] = &["long"];
        let closing: &'static str = Box::leak("word ".repeat(80).into_boxed_str());
        let closings: &'static [(&'static [&'static str], &'static str)] =
            Box::leak(vec![(GROUPS, closing)].into_boxed_slice());

        let synth = SummarySynthesizer::new(SummaryTables {
            closings,
            ..SummaryTables::default()
        });
        let summary = synth.summarize("A long story", "");

        assert_eq!(summary.chars().count(), MAX_SUMMARY_CHARS);
        assert!(summary.ends_with("..."));
    }
}
