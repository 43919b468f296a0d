use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::{SourceDescriptor, Strategy};

/// When the orchestrator may stop probing sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Probe every source and keep the single best candidate.
    #[default]
    BestOfAll,
    /// Stop once this many not-yet-stored candidates have been seen.
    FirstFresh {
        #[serde(default = "default_fresh_threshold")]
        threshold: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_think_time_min")]
    pub think_time_min_ms: u64,

    #[serde(default = "default_think_time_max")]
    pub think_time_max_ms: u64,

    #[serde(default = "default_view_limit")]
    pub view_limit: usize,

    #[serde(default)]
    pub selection: SelectionPolicy,

    #[serde(default = "default_sources")]
    pub sources: Vec<SourceDescriptor>,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ai-news-agent");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("ai_news.db").to_string_lossy().to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_think_time_min() -> u64 {
    1000
}

fn default_think_time_max() -> u64 {
    5000
}

fn default_view_limit() -> usize {
    10
}

fn default_fresh_threshold() -> usize {
    3
}

fn default_sources() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor::new(
            "Google News - AI Trending",
            "https://news.google.com/search?q=AI%20artificial%20intelligence%20latest%20breaking&hl=en-US&gl=US&ceid=US%3Aen",
            Strategy::GoogleNews,
        ),
        SourceDescriptor::new(
            "TechCrunch AI - Latest",
            "https://techcrunch.com/category/artificial-intelligence/",
            Strategy::TechCrunch,
        ),
        SourceDescriptor::new(
            "Google Search - Today's AI News",
            "https://www.google.com/search?q=%22AI+news%22+OR+%22artificial+intelligence%22+today+breaking+latest&tbm=nws&tbs=qdr:d",
            Strategy::GoogleSearch,
        ),
        SourceDescriptor::new(
            "The Verge AI",
            "https://www.theverge.com/ai-artificial-intelligence",
            Strategy::Generic,
        ),
        SourceDescriptor::new("VentureBeat AI", "https://venturebeat.com/ai/", Strategy::Generic),
        SourceDescriptor::new("AI News", "https://artificialintelligence-news.com/", Strategy::Generic),
        SourceDescriptor::new(
            "MIT Tech Review AI",
            "https://www.technologyreview.com/topic/artificial-intelligence/",
            Strategy::Generic,
        ),
        SourceDescriptor::new(
            "Bing AI News",
            "https://www.bing.com/news/search?q=artificial+intelligence+AI+technology&qft=interval%3d%227%22",
            Strategy::Generic,
        ),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            request_timeout_secs: default_request_timeout(),
            think_time_min_ms: default_think_time_min(),
            think_time_max_ms: default_think_time_max(),
            view_limit: default_view_limit(),
            selection: SelectionPolicy::default(),
            sources: default_sources(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("reading {}", config_path.display()))?;
            Self::from_toml(&content)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(&config_path, content)
            .with_context(|| format!("writing default config to {}", config_path.display()))?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ai-news-agent")
            .join("config.toml")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.think_time_min_ms > self.think_time_max_ms {
            return Err(AppError::Config(format!(
                "think_time_min_ms ({}) is greater than think_time_max_ms ({})",
                self.think_time_min_ms, self.think_time_max_ms
            )));
        }
        if let SelectionPolicy::FirstFresh { threshold: 0 } = self.selection {
            return Err(AppError::Config("selection threshold must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.view_limit, 10);
        assert_eq!(config.selection, SelectionPolicy::BestOfAll);
        assert_eq!(config.sources.len(), 8);
        assert_eq!(config.sources[0].strategy, Strategy::GoogleNews);
        assert!(config.db_path.ends_with("ai_news.db"));
    }

    #[test]
    fn parses_first_fresh_and_custom_sources() {
        let config = Config::from_toml(
            r#"
            db_path = "/tmp/news.db"
            think_time_min_ms = 0
            think_time_max_ms = 0

            [selection]
            mode = "first_fresh"
            threshold = 1

            [[sources]]
            name = "Only Source"
            endpoint = "https://example.com/ai"
            strategy = "techcrunch"
            "#,
        )
        .unwrap();

        assert_eq!(config.db_path, "/tmp/news.db");
        assert_eq!(config.selection, SelectionPolicy::FirstFresh { threshold: 1 });
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].strategy, Strategy::TechCrunch);
    }

    #[test]
    fn first_fresh_threshold_defaults_to_three() {
        let config = Config::from_toml("[selection]\nmode = \"first_fresh\"\n").unwrap();
        assert_eq!(config.selection, SelectionPolicy::FirstFresh { threshold: 3 });
    }

    #[test]
    fn rejects_inverted_think_time() {
        let err = Config::from_toml("think_time_min_ms = 10\nthink_time_max_ms = 5\n").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn rejects_unknown_strategy() {
        let err = Config::from_toml(
            "[[sources]]\nname = \"x\"\nendpoint = \"https://x.test\"\nstrategy = \"carrier_pigeon\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, AppError::ConfigParse(_)));
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::from_toml(&text).unwrap();
        assert_eq!(parsed.sources, config.sources);
        assert_eq!(parsed.selection, config.selection);
    }
}
