use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use twenty48_core::BestScoreStore;
use twenty48_core::store::{BEST_SCORE_KEY, parse_best_score};

/// Best-score store backed by `metadata.db` in a data directory.
///
/// Schema:
/// - session(meta_key TEXT PRIMARY KEY, meta_value TEXT)
pub struct SqliteStore {
    data_dir: PathBuf,
    conn: Connection,
}

impl SqliteStore {
    /// Create or open the store at `dir`, ensure schema exists.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let data_dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;
        let db_path = data_dir.join("metadata.db");
        let conn = Connection::open(&db_path)
            .with_context(|| format!("failed to open {}", db_path.display()))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS session (
                meta_key TEXT PRIMARY KEY,
                meta_value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self { data_dir, conn })
    }

    /// Set a session meta value by key (stored as TEXT).
    pub fn set_meta<K: AsRef<str>, V: AsRef<str>>(&mut self, key: K, value: V) -> Result<()> {
        self.conn.execute(
            "INSERT INTO session (meta_key, meta_value) VALUES (?1, ?2)
             ON CONFLICT(meta_key) DO UPDATE SET meta_value=excluded.meta_value",
            params![key.as_ref(), value.as_ref()],
        )?;
        Ok(())
    }

    /// Read back a meta value.
    pub fn get_meta<K: AsRef<str>>(&self, key: K) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT meta_value FROM session WHERE meta_key = ?1",
                params![key.as_ref()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl BestScoreStore for SqliteStore {
    fn load_best_score(&mut self) -> Result<u64> {
        Ok(self
            .get_meta(BEST_SCORE_KEY)?
            .map(|raw| parse_best_score(&raw))
            .unwrap_or(0))
    }

    fn save_best_score(&mut self, score: u64) -> Result<()> {
        self.set_meta(BEST_SCORE_KEY, score.to_string())
            .context("failed to save best score")
    }
}
