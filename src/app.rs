use std::fmt;
use std::path::Path;

use tracing::info;

use crate::config::Config;
use crate::db::NewsStore;
use crate::discovery::{Orchestrator, RunReport, ThinkTime};
use crate::error::Result;
use crate::models::Article;
use crate::services::HttpPageFetcher;

const RULE: &str = "==================================================";

pub struct App {
    config: Config,
    orchestrator: Orchestrator<HttpPageFetcher>,
}

impl App {
    pub async fn new(config: Config) -> Result<Self> {
        let store = NewsStore::open(&config.db_path).await?;
        let fetcher = HttpPageFetcher::new(config.request_timeout())?;
        let think_time = ThinkTime::new(config.think_time_min_ms, config.think_time_max_ms);
        let orchestrator = Orchestrator::new(fetcher, store, config.selection, think_time);

        Ok(Self { config, orchestrator })
    }

    /// One discovery pass: probe, pick, summarize, save, report.
    pub async fn run_discovery(&self) -> Result<()> {
        info!(
            sources = self.config.sources.len(),
            policy = ?self.config.selection,
            "Starting discovery run"
        );
        let report = self.orchestrator.run(&self.config.sources).await;
        print!(
            "{}",
            ReportBlock {
                report: &report,
                db_path: self.orchestrator.store().path(),
            }
        );
        Ok(())
    }

    pub async fn view_recent(&self) -> Result<()> {
        let articles = self.orchestrator.store().recent(self.config.view_limit).await?;
        print!("{}", ArticleList(&articles));
        Ok(())
    }
}

/// Summary block printed after a discovery run.
struct ReportBlock<'a> {
    report: &'a RunReport,
    db_path: &'a Path,
}

impl fmt::Display for ReportBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;

        let Some(saved) = &report.saved else {
            return writeln!(f, "Failed to save \"{}\", see the log for details.", report.title);
        };

        writeln!(f, "{RULE}")?;
        writeln!(f, "Trending AI article saved")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Title:          {}", report.title)?;
        writeln!(f, "Source:         {}", report.source)?;
        writeln!(f, "Trending score: {}", report.trending_score)?;
        writeln!(f, "URL:            {}", report.url)?;
        writeln!(f, "Content:        {} characters", report.content_chars)?;
        writeln!(f, "Summary:        {}", report.summary)?;
        writeln!(f, "Database:       {}", self.db_path.display())?;
        writeln!(f, "Record:         #{} ({})", saved.id, saved.content_hash)?;
        writeln!(f, "Found via:      {} ({})", report.found_via, report.strategy)?;
        writeln!(f, "Fallback used:  {}", if report.fallback { "yes" } else { "no" })
    }
}

/// Numbered listing for `--view`.
struct ArticleList<'a>(&'a [Article]);

impl fmt::Display for ArticleList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No saved articles found");
        }

        writeln!(f, "Recent AI news ({} articles)", self.0.len())?;
        for (position, article) in self.0.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "{}. {}", position + 1, article.title)?;
            writeln!(f, "   Source:  {}", article.source)?;
            writeln!(f, "   Date:    {}", article.created_at.format("%Y-%m-%d %H:%M UTC"))?;
            writeln!(f, "   URL:     {}", article.url)?;
            writeln!(f, "   Summary: {}", article.summary)?;
            writeln!(f, "   Content: {} characters", article.content.chars().count())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SavedArticle, Strategy};
    use chrono::{TimeZone, Utc};

    fn report(saved: bool) -> RunReport {
        RunReport {
            title: "OpenAI announces breakthrough AI model".to_string(),
            url: "https://example.com/story".to_string(),
            source: "example.com".to_string(),
            found_via: "TechCrunch AI - Latest".to_string(),
            strategy: Strategy::TechCrunch,
            trending_score: 75,
            content_chars: 1200,
            summary: "OpenAI has announced new AI technology.".to_string(),
            fallback: false,
            saved: saved.then(|| SavedArticle {
                id: 1,
                title: "OpenAI announces breakthrough AI model".to_string(),
                url: "https://example.com/story".to_string(),
                source: "example.com".to_string(),
                content_hash: "abc".to_string(),
            }),
        }
    }

    #[test]
    fn report_block_lists_every_field() {
        let report = report(true);
        let text = ReportBlock {
            report: &report,
            db_path: Path::new("/tmp/ai_news.db"),
        }
        .to_string();

        assert!(text.contains("Title:          OpenAI announces breakthrough AI model\n"));
        assert!(text.contains("Trending score: 75\n"));
        assert!(text.contains("Content:        1200 characters\n"));
        assert!(text.contains("Database:       /tmp/ai_news.db\n"));
        assert!(text.contains("Record:         #1 (abc)\n"));
        assert!(text.contains("Found via:      TechCrunch AI - Latest (techcrunch)\n"));
        assert!(text.ends_with("Fallback used:  no\n"));
    }

    #[test]
    fn failed_save_prints_single_status_line() {
        let report = report(false);
        let text = ReportBlock {
            report: &report,
            db_path: Path::new("/tmp/ai_news.db"),
        }
        .to_string();

        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("Failed to save"));
    }

    #[test]
    fn empty_listing_says_so() {
        assert_eq!(ArticleList(&[]).to_string(), "No saved articles found\n");
    }

    #[test]
    fn listing_is_numbered() {
        let article = |id: i64, title: &str| Article {
            id,
            title: title.to_string(),
            url: format!("https://example.com/{id}"),
            content: "abc".to_string(),
            summary: "A summary.".to_string(),
            source: "example.com".to_string(),
            content_hash: None,
            scraped_at: None,
            created_at: Utc.with_ymd_and_hms(2026, 10, 19, 8, 5, 0).unwrap(),
        };
        let articles = [article(2, "Second"), article(1, "First")];

        let text = ArticleList(&articles).to_string();

        assert!(text.starts_with("Recent AI news (2 articles)\n"));
        assert!(text.contains("\n1. Second\n"));
        assert!(text.contains("\n2. First\n"));
        assert!(text.contains("   Date:    2026-10-19 08:05 UTC\n"));
        assert!(text.contains("   Content: 3 characters\n"));
    }
}
