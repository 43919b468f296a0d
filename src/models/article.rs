use chrono::{DateTime, Utc};

/// A row of the `news` table.
#[derive(Debug, Clone)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub content: String,
    pub summary: String,
    pub source: String,
    pub content_hash: Option<String>,
    pub scraped_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Raw values handed to the store; cleaning and bounding happen on save.
#[derive(Debug, Clone, Default)]
pub struct NewArticle {
    pub title: String,
    pub url: String,
    pub content: String,
    pub summary: String,
    pub source: String,
}

/// What actually landed in the store after normalization.
#[derive(Debug, Clone)]
pub struct SavedArticle {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub source: String,
    pub content_hash: String,
}
