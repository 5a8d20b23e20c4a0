use rusqlite::{Connection, Result};
use std::path::Path;

const BUSY_TIMEOUT_MS: i64 = 5000;

/// Schema steps in order; `PRAGMA user_version` counts how many have run.
const MIGRATIONS: &[&str] = &[include_str!("../migrations/0001_init.sql")];

/// Opens the file database in WAL mode and brings the schema up to date.
pub fn open_and_migrate(path: impl AsRef<Path>) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    prepare(conn)
}

pub fn with_test_db() -> Result<Connection> {
    prepare(Connection::open_in_memory()?)
}

fn prepare(conn: Connection) -> Result<Connection> {
    conn.pragma_update(None, "busy_timeout", BUSY_TIMEOUT_MS)?;
    migrate(&conn)?;
    Ok(conn)
}

/// Runs the steps not yet recorded and returns the schema version.
///
/// Each step is itself `IF NOT EXISTS`, so tables created before version
/// tracking are picked up without error.
pub fn migrate(conn: &Connection) -> Result<usize> {
    let applied: usize = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    for (index, sql) in MIGRATIONS.iter().enumerate().skip(applied) {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", index + 1)?;
        tx.commit()?;
    }
    Ok(applied.max(MIGRATIONS.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(conn: &Connection) -> usize {
        conn.pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn migrate_twice_is_harmless() {
        let conn = with_test_db().unwrap();
        assert_eq!(migrate(&conn).unwrap(), MIGRATIONS.len());
        assert_eq!(version(&conn), MIGRATIONS.len());
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND tbl_name = 'registros' AND name LIKE 'idx_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn untracked_existing_table_is_adopted() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(MIGRATIONS[0]).unwrap();
        conn.execute(
            "INSERT INTO registros (id, data) VALUES ('old', '2026-01-01 08:00:00.000000')",
            [],
        )
        .unwrap();
        assert_eq!(version(&conn), 0);

        migrate(&conn).unwrap();
        assert_eq!(version(&conn), 1);
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM registros", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn file_database_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_and_migrate(dir.path().join("trafo.db")).unwrap();
        let mode: String = conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
    }

    #[test]
    fn column_defaults_apply() {
        let conn = with_test_db().unwrap();
        conn.execute(
            "INSERT INTO registros (id, data) VALUES ('legacy', '2026-01-01 08:00:00.000000')",
            [],
        )
        .unwrap();
        let (visits, status): (i64, String) = conn
            .query_row(
                "SELECT visitas, status FROM registros WHERE id = 'legacy'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(visits, 0);
        assert_eq!(status, "em_andamento");
    }
}
