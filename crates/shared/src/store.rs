use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

use crate::models::{Category, Platform, SavedItem};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS saves (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        url TEXT NOT NULL,
        platform TEXT,
        caption TEXT,
        hashtags TEXT,
        category TEXT,
        summary TEXT,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )";

const COLUMNS: &str = "id, url, platform, caption, hashtags, category, summary, created_at";

/// A link ready to be written to the saves table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSave<'a> {
    pub url: &'a str,
    pub platform: Platform,
    pub caption: &'a str,
    pub hashtags: &'a [String],
    pub category: Category,
    pub summary: &'a str,
}

/// SQLite-backed record of every processed link.
pub struct SaveStore {
    conn: Connection,
}

impl SaveStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open saves database: {}", path.display()))?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(SCHEMA, [])
            .context("Failed to create saves table")?;
        Ok(Self { conn })
    }

    /// Insert a save and return its row id.
    pub fn save(&self, item: &NewSave) -> Result<i64> {
        let created_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        self.conn
            .execute(
                "INSERT INTO saves (url, platform, caption, hashtags, category, summary, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    item.url,
                    item.platform.as_str(),
                    item.caption,
                    item.hashtags.join(", "),
                    item.category.as_str(),
                    item.summary,
                    created_at,
                ],
            )
            .context("Failed to insert save")?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All saves, newest first, optionally filtered by a case-insensitive term
    /// matched against caption, category and hashtags.
    pub fn query(&self, search: Option<&str>) -> Result<Vec<SavedItem>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());

        let items = match search {
            Some(term) => {
                let pattern = format!("%{}%", term.to_lowercase());
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {} FROM saves
                     WHERE LOWER(caption) LIKE ?1 OR LOWER(category) LIKE ?1 OR LOWER(hashtags) LIKE ?1
                     ORDER BY created_at DESC, id DESC",
                    COLUMNS
                ))?;
                let rows = stmt.query_map([pattern], row_to_item)?;
                let items = rows.collect::<rusqlite::Result<Vec<_>>>()?;
                items
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {} FROM saves ORDER BY created_at DESC, id DESC",
                    COLUMNS
                ))?;
                let rows = stmt.query_map([], row_to_item)?;
                let items = rows.collect::<rusqlite::Result<Vec<_>>>()?;
                items
            }
        };

        Ok(items)
    }

    pub fn random(&self) -> Result<Option<SavedItem>> {
        let item = self
            .conn
            .query_row(
                &format!("SELECT {} FROM saves ORDER BY RANDOM() LIMIT 1", COLUMNS),
                [],
                row_to_item,
            )
            .optional()
            .context("Failed to pick a random save")?;
        Ok(item)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM saves", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn row_to_item(row: &Row) -> rusqlite::Result<SavedItem> {
    let platform: Option<String> = row.get(2)?;
    let category: Option<String> = row.get(5)?;
    Ok(SavedItem {
        id: row.get(0)?,
        url: row.get(1)?,
        platform: Platform::from_label(platform.as_deref().unwrap_or_default()),
        caption: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        hashtags: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        category: Category::from_label(category.as_deref().unwrap_or_default()),
        summary: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        created_at: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
    })
}
