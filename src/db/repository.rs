use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, SecondsFormat, Utc};
use rusqlite::{params, ErrorCode, Row};
use tokio_rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::models::{Article, NewArticle, SavedArticle};
use crate::text::{fingerprint, normalize, truncate_chars};

use super::schema::{INDEXES, MIGRATED_COLUMNS, REQUIRED_COLUMNS, SCHEMA};

type DbResult<T> = std::result::Result<T, tokio_rusqlite::Error>;

const MAX_TITLE_CHARS: usize = 500;
const MAX_URL_CHARS: usize = 1000;
const MAX_CONTENT_CHARS: usize = 5000;
const MAX_SUMMARY_CHARS: usize = 500;
const MAX_SOURCE_CHARS: usize = 200;

const DEFAULT_TITLE: &str = "AI News Article";
const DEFAULT_URL: &str = "https://unknown-source.com";
const DEFAULT_SUMMARY: &str = "AI technology news update.";
const DEFAULT_SOURCE: &str = "Unknown Source";

/// SQLite-backed store for discovered articles.
///
/// No connection is kept between calls: every operation opens the file,
/// does its work and closes it again.
pub struct NewsStore {
    db_path: PathBuf,
}

impl NewsStore {
    pub async fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let store = Self {
            db_path: db_path.as_ref().to_path_buf(),
        };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    async fn with_connection<F, R>(&self, function: F) -> DbResult<R>
    where
        F: FnOnce(&mut rusqlite::Connection) -> DbResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let conn = Connection::open(&self.db_path).await?;
        let result = conn.call(function).await;
        if let Err(e) = conn.close().await {
            debug!(error = %e, "Closing news store connection failed");
        }
        result
    }

    // Schema

    /// Create the `news` table or bring an older one up to date.
    ///
    /// Columns are only ever added. If the file cannot be migrated at all it
    /// is renamed to `<path>.backup_<timestamp>` and a fresh table is created;
    /// that happens at most once per call. Busy, locked or unreadable files
    /// are reported as errors and never moved.
    pub async fn ensure_schema(&self) -> Result<()> {
        match self.migrate().await {
            Ok(added) => {
                if !added.is_empty() {
                    info!(columns = ?added, "Added missing columns to news table");
                }
                debug!(path = %self.db_path.display(), "News store ready");
                Ok(())
            }
            Err(e) if is_structural(&e) => {
                warn!(
                    error = %e,
                    path = %self.db_path.display(),
                    "News store cannot be migrated, recreating it"
                );
                self.recreate().await
            }
            Err(e) => {
                warn!(
                    error = %e,
                    path = %self.db_path.display(),
                    "News store is unavailable, leaving the file untouched"
                );
                Err(AppError::StoreInit(e.to_string()))
            }
        }
    }

    async fn migrate(&self) -> DbResult<Vec<&'static str>> {
        self.with_connection(|conn| {
            conn.execute_batch(SCHEMA)?;

            let existing = table_columns(conn)?;
            if let Some(missing) = REQUIRED_COLUMNS
                .iter()
                .find(|required| !existing.iter().any(|c| c == *required))
            {
                return Err(rusqlite::Error::InvalidColumnName(missing.to_string()).into());
            }

            let mut added = Vec::new();
            for (name, decl) in MIGRATED_COLUMNS {
                if !existing.iter().any(|c| c == name) {
                    conn.execute(&format!("ALTER TABLE news ADD COLUMN {name} {decl}"), [])?;
                    added.push(*name);
                }
            }

            conn.execute_batch(INDEXES)?;
            Ok(added)
        })
        .await
    }

    async fn recreate(&self) -> Result<()> {
        if tokio::fs::try_exists(&self.db_path).await.unwrap_or(false) {
            let backup = backup_path(&self.db_path, Local::now());
            tokio::fs::rename(&self.db_path, &backup).await.map_err(|e| {
                AppError::StoreInit(format!(
                    "could not move {} aside: {}",
                    self.db_path.display(),
                    e
                ))
            })?;
            info!(backup = %backup.display(), "Backed up unusable news store");
        }

        self.with_connection(|conn| {
            conn.execute_batch(SCHEMA)?;
            conn.execute_batch(INDEXES)?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::StoreInit(e.to_string()))?;

        info!(path = %self.db_path.display(), "Created fresh news store");
        Ok(())
    }

    // Deduplication

    pub async fn contains_hash(&self, hash: String) -> Result<bool> {
        let exists = self
            .with_connection(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM news WHERE content_hash = ?1",
                    params![hash],
                    |row| row.get(0),
                )?;
                Ok(count > 0)
            })
            .await?;
        Ok(exists)
    }

    /// Whether an article with this title and content start is already
    /// stored. Lookup failures count as "not a duplicate".
    pub async fn is_duplicate(&self, title: &str, content: &str) -> bool {
        match self.contains_hash(fingerprint(title, content)).await {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "Duplicate check failed, treating article as new");
                false
            }
        }
    }

    // Articles

    /// Clean, bound and upsert an article keyed by url.
    ///
    /// A row with the same url or the same content hash is replaced. When the
    /// write trips over a missing column the schema is migrated and the write
    /// retried exactly once.
    pub async fn save(&self, article: &NewArticle) -> Result<SavedArticle> {
        let record = StoredFields::prepare(article, Utc::now());

        let id = match self.write(record.clone()).await {
            Ok(id) => id,
            Err(e) if is_missing_column(&e) => {
                warn!(error = %e, "News table is missing a column, migrating before retry");
                self.ensure_schema().await?;
                self.write(record.clone()).await?
            }
            Err(e) => return Err(e.into()),
        };

        info!(id, title = %truncate_chars(&record.title, 50), "Saved article");
        Ok(record.into_saved(id))
    }

    async fn write(&self, record: StoredFields) -> DbResult<i64> {
        self.with_connection(move |conn| {
            conn.execute(
                r#"INSERT OR REPLACE INTO news
                       (title, url, content, summary, source, content_hash, scraped_at, created_at)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
                params![
                    record.title,
                    record.url,
                    record.content,
                    record.summary,
                    record.source,
                    record.content_hash,
                    record.stamp,
                    record.stamp,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    /// Most recently created articles first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<Article>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let articles = self
            .with_connection(move |conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT id, title, url, content, summary, source, content_hash, scraped_at, created_at
                       FROM news
                       ORDER BY julianday(created_at) DESC, id DESC
                       LIMIT ?1"#,
                )?;
                let articles = stmt
                    .query_map(params![limit], article_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(articles)
            })
            .await?;
        Ok(articles)
    }
}

/// Article values exactly as they are written to the table.
#[derive(Debug, Clone)]
struct StoredFields {
    title: String,
    url: String,
    content: String,
    summary: String,
    source: String,
    content_hash: String,
    stamp: String,
}

impl StoredFields {
    fn prepare(article: &NewArticle, now: DateTime<Utc>) -> Self {
        let title = or_default(normalize(&article.title), DEFAULT_TITLE);
        let url = or_default(normalize(&article.url), DEFAULT_URL);
        let content = normalize(&article.content);
        let summary = or_default(normalize(&article.summary), DEFAULT_SUMMARY);
        let source = or_default(normalize(&article.source), DEFAULT_SOURCE);

        // Hash before truncation so bounds never change the fingerprint.
        let snippet = if content.is_empty() { &title } else { &content };
        let content_hash = fingerprint(&title, snippet);

        Self {
            title: truncate_chars(&title, MAX_TITLE_CHARS),
            url: truncate_chars(&url, MAX_URL_CHARS),
            content: truncate_chars(&content, MAX_CONTENT_CHARS),
            summary: truncate_chars(&summary, MAX_SUMMARY_CHARS),
            source: truncate_chars(&source, MAX_SOURCE_CHARS),
            content_hash,
            stamp: now.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }

    fn into_saved(self, id: i64) -> SavedArticle {
        SavedArticle {
            id,
            title: self.title,
            url: self.url,
            source: self.source,
            content_hash: self.content_hash,
        }
    }
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

fn table_columns(conn: &rusqlite::Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("PRAGMA table_info(news)")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}

fn is_missing_column(err: &tokio_rusqlite::Error) -> bool {
    let tokio_rusqlite::Error::Rusqlite(inner) = err else {
        return false;
    };
    let message = inner.to_string().to_lowercase();
    message.contains("no such column") || message.contains("has no column named")
}

/// Whether a migration failure means the file itself is unusable as a
/// news store, as opposed to being temporarily out of reach.
fn is_structural(err: &tokio_rusqlite::Error) -> bool {
    let tokio_rusqlite::Error::Rusqlite(inner) = err else {
        return false;
    };
    match inner {
        rusqlite::Error::InvalidColumnName(_) => true,
        rusqlite::Error::SqliteFailure(failure, _) => matches!(
            failure.code,
            ErrorCode::NotADatabase
                | ErrorCode::DatabaseCorrupt
                | ErrorCode::ConstraintViolation
                // plain SQLITE_ERROR, e.g. an ALTER TABLE the old schema rejects
                | ErrorCode::Unknown
        ),
        _ => false,
    }
}

fn backup_path(db_path: &Path, now: DateTime<Local>) -> PathBuf {
    let mut name = db_path.as_os_str().to_owned();
    name.push(format!(".backup_{}", now.format("%Y%m%d_%H%M%S")));
    PathBuf::from(name)
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first (e.g., "2026-01-11T12:34:56.123456Z")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Older rows use SQLite's CURRENT_TIMESTAMP format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn article_from_row(row: &Row) -> rusqlite::Result<Article> {
    Ok(Article {
        id: row.get(0)?,
        title: row.get(1)?,
        url: row.get(2)?,
        content: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        summary: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        source: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        content_hash: row.get(6)?,
        scraped_at: row
            .get::<_, Option<String>>(7)?
            .and_then(|s| parse_datetime(&s)),
        created_at: row
            .get::<_, Option<String>>(8)?
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now),
    })
}
