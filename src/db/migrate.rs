//! Schema creation and upgrades.
//!
//! Every step is idempotent. Applied upgrades are recorded in the `log` table
//! (`operation = 'migration_applied'`, `target = <version>`).

use rusqlite::{Connection, OptionalExtension, Result};

const V_CREATE_ENTRIES: &str = "20250301_0001_create_entries";
const V_LEGACY_TIMESTAMPS: &str = "20250318_0002_entries_timestamp_pair";
const V_UPDATED_AT: &str = "20250402_0003_entries_updated_at";

const ENTRIES_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS entries (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        person       TEXT NOT NULL CHECK(length(person) BETWEEN 1 AND 100),
        start_time   TEXT NOT NULL,
        finish_time  TEXT NOT NULL,
        description  TEXT NOT NULL CHECK(length(description) BETWEEN 1 AND 500),
        status       TEXT NOT NULL DEFAULT 'Pending'
                     CHECK(status IN ('Pending','Compensated','Not Compensated')),
        created_at   TEXT NOT NULL,
        updated_at   TEXT NOT NULL,
        CHECK(finish_time > start_time)
    );
"#;

const ENTRIES_INDEXES: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_entries_status ON entries(status);
    CREATE INDEX IF NOT EXISTS idx_entries_created_at ON entries(created_at);
    CREATE INDEX IF NOT EXISTS idx_entries_start_time ON entries(start_time);
"#;

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn column_names(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;
    cols.collect()
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// The earliest entries layout kept a calendar `date` next to time-of-day
/// `start_time`/`finish_time` columns.
fn entries_use_legacy_shape(conn: &Connection) -> Result<bool> {
    Ok(column_names(conn, "entries")?.iter().any(|c| c == "date"))
}

/// Rebuild a legacy `entries` table into the timestamp-pair layout.
///
/// A finish time that is not after its start time is an overnight shift and
/// is moved to the following day. Unknown status values become Pending.
fn migrate_legacy_entries(conn: &Connection) -> Result<()> {
    let has_created_at = column_names(conn, "entries")?
        .iter()
        .any(|c| c == "created_at");
    let created_expr = if has_created_at {
        "COALESCE(datetime(created_at), datetime('now'))"
    } else {
        "datetime('now')"
    };

    let sql = format!(
        r#"
        PRAGMA foreign_keys=OFF;
        BEGIN;

        ALTER TABLE entries RENAME TO entries_legacy;

        {ENTRIES_DDL}

        INSERT INTO entries (id, person, start_time, finish_time, description, status, created_at, updated_at)
        SELECT id,
               person,
               datetime(date || ' ' || start_time),
               CASE
                   WHEN datetime(date || ' ' || finish_time) <= datetime(date || ' ' || start_time)
                   THEN datetime(date || ' ' || finish_time, '+1 day')
                   ELSE datetime(date || ' ' || finish_time)
               END,
               description,
               CASE WHEN status IN ('Pending','Compensated','Not Compensated')
                    THEN status ELSE 'Pending' END,
               {created_expr},
               {created_expr}
        FROM entries_legacy
        WHERE datetime(date || ' ' || start_time) IS NOT NULL
          AND datetime(date || ' ' || finish_time) IS NOT NULL
          AND length(person) BETWEEN 1 AND 100
          AND length(description) BETWEEN 1 AND 500;

        DROP TABLE entries_legacy;

        COMMIT;
        PRAGMA foreign_keys=ON;
        "#
    );

    conn.execute_batch(&sql)
}

fn migrate_add_updated_at(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        ALTER TABLE entries ADD COLUMN updated_at TEXT NOT NULL DEFAULT '';
        UPDATE entries SET updated_at = created_at WHERE updated_at = '';
        "#,
    )
}

/// Public entry point: run all pending migrations.
/// Returns the versions applied by this call (empty when already current).
pub fn run_pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    let mut applied = Vec::new();

    ensure_log_table(conn)?;

    if !table_exists(conn, "entries")? {
        conn.execute_batch(ENTRIES_DDL)?;
        mark_applied(conn, V_CREATE_ENTRIES, "Created entries table")?;
        applied.push(V_CREATE_ENTRIES);
    } else if entries_use_legacy_shape(conn)? {
        migrate_legacy_entries(conn)?;
        mark_applied(
            conn,
            V_LEGACY_TIMESTAMPS,
            "Merged date + time-of-day columns into start/finish timestamps",
        )?;
        applied.push(V_LEGACY_TIMESTAMPS);
    }

    if !is_applied(conn, V_UPDATED_AT)? {
        if !column_names(conn, "entries")?.iter().any(|c| c == "updated_at") {
            migrate_add_updated_at(conn)?;
        }
        mark_applied(conn, V_UPDATED_AT, "Added updated_at to entries")?;
        applied.push(V_UPDATED_AT);
    }

    conn.execute_batch(ENTRIES_INDEXES)?;

    if !applied.is_empty() {
        tracing::info!(versions = ?applied, "schema migrations applied");
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_is_created_once() {
        let conn = Connection::open_in_memory().unwrap();
        let first = run_pending_migrations(&conn).unwrap();
        assert_eq!(first, vec![V_CREATE_ENTRIES, V_UPDATED_AT]);

        let second = run_pending_migrations(&conn).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn legacy_date_and_time_columns_become_timestamps() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE entries (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                person      TEXT NOT NULL,
                date        TEXT NOT NULL,
                start_time  TEXT NOT NULL,
                finish_time TEXT NOT NULL,
                description TEXT NOT NULL,
                status      TEXT NOT NULL,
                created_at  TEXT
            );
            INSERT INTO entries (person, date, start_time, finish_time, description, status, created_at)
            VALUES ('Alice', '2024-11-05', '18:00', '21:30', 'Month close', 'Compensated', '2024-11-06 08:00:00'),
                   ('Bob',   '2024-11-05', '22:00', '02:00', 'Night deploy', 'Paid', NULL);
            "#,
        )
        .unwrap();

        let applied = run_pending_migrations(&conn).unwrap();
        assert!(applied.contains(&V_LEGACY_TIMESTAMPS));

        let rows: Vec<(String, String, String, String)> = conn
            .prepare("SELECT person, start_time, finish_time, status FROM entries ORDER BY id")
            .unwrap()
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(
            rows[0],
            (
                "Alice".to_string(),
                "2024-11-05 18:00:00".to_string(),
                "2024-11-05 21:30:00".to_string(),
                "Compensated".to_string()
            )
        );
        assert_eq!(rows[1].2, "2024-11-06 02:00:00");
        assert_eq!(rows[1].3, "Pending");
    }
}
