// Repository pattern - isolates the day-keyed persistence side effects
use rusqlite::params;

use crate::error::AppResult;
use crate::state::DbPool;

/// Durable key-value store of serialized image records, keyed by day.
pub trait DayRepository: Send + Sync {
    /// Stored record for a day key, if any
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store a record under a day key, replacing any previous value
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
}

/// SQLite implementation
pub struct SqliteDayRepository {
    pool: DbPool,
}

impl SqliteDayRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl DayRepository for SqliteDayRepository {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let conn = self.pool.get()?;

        let result = conn.query_row(
            "SELECT record_json FROM day_images WHERE day = ?1",
            params![key],
            |row| row.get(0),
        );

        match result {
            Ok(json) => Ok(Some(json)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO day_images (day, record_json, updated_at)
             VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(day) DO UPDATE SET
                record_json = excluded.record_json,
                updated_at = excluded.updated_at",
            params![key, value],
        )?;

        Ok(())
    }
}
