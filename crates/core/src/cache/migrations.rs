//! Database schema migrations.
//!
//! A `_migrations` version table records which batches have been applied.
//! Every batch is written with `IF NOT EXISTS` so re-running is harmless.

use std::num::ParseIntError;

use super::Error;
use tokio_rusqlite::{Connection, params};

/// Migration list: (version, SQL), applied in ascending order.
const MIGRATIONS: &[(&str, &str)] = &[("1", include_str!("../../migrations/001_stores.sql"))];

/// Apply every migration newer than the recorded version.
///
/// # Errors
///
/// Returns an error if a migration SQL fails to execute.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(Error::from)?;

        let current: i64 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| {
                row.get(0)
            })
            .map_err(Error::from)?;

        for (version, sql) in MIGRATIONS {
            let version_num: i64 = version
                .parse()
                .map_err(|e: ParseIntError| Error::MigrationFailed(e.to_string()))?;
            if version_num > current {
                conn.execute_batch(sql)
                    .map_err(|e| Error::MigrationFailed(format!("version {version_num}: {e}")))?;
                conn.execute(
                    "INSERT INTO _migrations (version, applied_at) VALUES (?1, ?2)",
                    params![version_num, chrono::Utc::now().to_rfc3339()],
                )
                .map_err(Error::from)?;
                tracing::debug!(version = version_num, "applied store migration");
            }
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().await.unwrap();
        run(&conn).await.unwrap();
        run(&conn).await.unwrap();

        let has_entries: bool = conn
            .call(|conn| {
                conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='entries')",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();

        assert!(has_entries);
    }

    #[tokio::test]
    async fn test_migrations_version_tracking() {
        let conn = Connection::open_in_memory().await.unwrap();
        run(&conn).await.unwrap();

        let count: i64 = conn
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM _migrations", [], |row| row.get(0)))
            .await
            .unwrap();

        assert_eq!(count, MIGRATIONS.len() as i64);
    }
}
