use anyhow::Context;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

/// Durable key/value store with per-row expiry, the terminal stand-in for a
/// browser cookie jar.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }

        let conn = Connection::open(path).with_context(|| format!("open {}", path.display()))?;
        let s = Self { conn };
        s.init_schema()?;
        Ok(s)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory db")?;
        let s = Self { conn };
        s.init_schema()?;
        Ok(s)
    }

    fn init_schema(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch(
                r#"
CREATE TABLE IF NOT EXISTS preferences (
  key TEXT PRIMARY KEY,
  value TEXT NOT NULL,
  expires_at INTEGER NOT NULL,
  updated_at INTEGER NOT NULL
);
"#,
            )
            .context("init schema")?;
        Ok(())
    }

    /// Read a value, treating expired rows as absent.
    pub fn get_value(&self, key: &str, now_unix: i64) -> anyhow::Result<Option<String>> {
        let row = self
            .conn
            .query_row(
                "SELECT value, expires_at FROM preferences WHERE key=?1",
                params![key],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()
            .context("query preference")?;

        Ok(row.and_then(|(value, exp)| (exp > now_unix).then_some(value)))
    }

    pub fn set_value(
        &self,
        key: &str,
        value: &str,
        expires_at: i64,
        now_unix: i64,
    ) -> anyhow::Result<()> {
        self.conn
            .execute(
                r#"
INSERT INTO preferences(key, value, expires_at, updated_at)
VALUES(?1, ?2, ?3, ?4)
ON CONFLICT(key) DO UPDATE SET
  value=excluded.value,
  expires_at=excluded.expires_at,
  updated_at=excluded.updated_at
"#,
                params![key, value, expires_at, now_unix],
            )
            .context("store preference")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_none() {
        let s = Storage::open_in_memory().unwrap();
        assert_eq!(s.get_value("nope", 100).unwrap(), None);
    }

    #[test]
    fn test_set_then_get_and_overwrite() {
        let s = Storage::open_in_memory().unwrap();
        s.set_value("k", "one", 1_000, 10).unwrap();
        assert_eq!(s.get_value("k", 20).unwrap().as_deref(), Some("one"));

        s.set_value("k", "two", 1_000, 30).unwrap();
        assert_eq!(s.get_value("k", 40).unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_expired_value_reads_as_absent() {
        let s = Storage::open_in_memory().unwrap();
        s.set_value("k", "v", 500, 0).unwrap();
        assert_eq!(s.get_value("k", 499).unwrap().as_deref(), Some("v"));
        assert_eq!(s.get_value("k", 500).unwrap(), None);
    }
}
