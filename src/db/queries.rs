use crate::core::query::StoreQuery;
use crate::errors::{AppError, AppResult};
use crate::models::{Entry, NewEntry, Status};
use crate::utils::time::{parse_timestamp, to_db, to_db_micros};
use chrono::NaiveDateTime;
use rusqlite::types::{Type, Value};
use rusqlite::{Connection, OptionalExtension, Result, Row, params, params_from_iter};

pub const ENTRY_COLUMNS: &str =
    "id, person, start_time, finish_time, description, status, created_at, updated_at";

fn timestamp_column(row: &Row, idx: usize) -> Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            Box::new(AppError::InvalidTimestamp(raw.clone())),
        )
    })
}

/// Map a row selected with [`ENTRY_COLUMNS`] into an [`Entry`].
pub fn map_row(row: &Row) -> Result<Entry> {
    let status_str: String = row.get(5)?;
    let status = Status::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            Type::Text,
            Box::new(AppError::InvalidStatus(status_str.clone())),
        )
    })?;

    Ok(Entry {
        id: row.get(0)?,
        person: row.get(1)?,
        start_time: timestamp_column(row, 2)?,
        finish_time: timestamp_column(row, 3)?,
        description: row.get(4)?,
        status,
        created_at: timestamp_column(row, 6)?,
        updated_at: timestamp_column(row, 7)?,
    })
}

pub fn insert_entry(conn: &Connection, entry: &NewEntry, created_at: NaiveDateTime) -> AppResult<i64> {
    let stamp = to_db_micros(created_at);
    conn.execute(
        "INSERT INTO entries (person, start_time, finish_time, description, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![
            entry.person,
            to_db(entry.start_time),
            to_db(entry.finish_time),
            entry.description,
            entry.status.to_db_str(),
            stamp,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_entry(conn: &Connection, id: i64) -> AppResult<Option<Entry>> {
    let mut stmt = conn.prepare_cached(&format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?1"))?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

/// Full replace of every mutable field. Returns false when `id` does not exist.
pub fn replace_entry(
    conn: &Connection,
    id: i64,
    entry: &NewEntry,
    updated_at: NaiveDateTime,
) -> AppResult<bool> {
    let n = conn.execute(
        "UPDATE entries
            SET person = ?1, start_time = ?2, finish_time = ?3,
                description = ?4, status = ?5, updated_at = ?6
          WHERE id = ?7",
        params![
            entry.person,
            to_db(entry.start_time),
            to_db(entry.finish_time),
            entry.description,
            entry.status.to_db_str(),
            to_db_micros(updated_at),
            id,
        ],
    )?;
    Ok(n > 0)
}

pub fn update_status(
    conn: &Connection,
    id: i64,
    status: Status,
    updated_at: NaiveDateTime,
) -> AppResult<bool> {
    let n = conn.execute(
        "UPDATE entries SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.to_db_str(), to_db_micros(updated_at), id],
    )?;
    Ok(n > 0)
}

pub fn delete_entry(conn: &Connection, id: i64) -> AppResult<bool> {
    let n = conn.execute("DELETE FROM entries WHERE id = ?1", [id])?;
    Ok(n > 0)
}

/// Size of the filtered set described by `query` (sorting is irrelevant here).
pub fn count_entries(conn: &Connection, query: &StoreQuery) -> AppResult<u64> {
    let sql = format!("SELECT COUNT(*) FROM entries{}", query.where_sql);
    let mut stmt = conn.prepare(&sql)?;
    let n: i64 = stmt.query_row(params_from_iter(query.params.iter()), |row| row.get(0))?;
    Ok(u64::try_from(n).unwrap_or(0))
}

/// One window of the filtered and sorted set.
pub fn fetch_entries(
    conn: &Connection,
    query: &StoreQuery,
    limit: u32,
    offset: u64,
) -> AppResult<Vec<Entry>> {
    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM entries{}{} LIMIT ? OFFSET ?",
        query.where_sql, query.order_sql
    );

    let mut bound: Vec<Value> = query.params.clone();
    bound.push(Value::Integer(i64::from(limit)));
    bound.push(Value::Integer(i64::try_from(offset).unwrap_or(i64::MAX)));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(bound.iter()), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;
    use crate::utils::time::parse_timestamp;

    fn sample(person: &str) -> NewEntry {
        NewEntry {
            person: person.to_string(),
            start_time: parse_timestamp("2025-02-03 18:00").unwrap(),
            finish_time: parse_timestamp("2025-02-03 20:15").unwrap(),
            description: "Quarterly report".to_string(),
            status: Status::Pending,
        }
    }

    #[test]
    fn insert_find_update_delete() {
        let pool = DbPool::open_in_memory().unwrap();
        let created = parse_timestamp("2025-02-04 09:00:00.123456").unwrap();
        let id = insert_entry(&pool.conn, &sample("Alice"), created).unwrap();

        let entry = find_entry(&pool.conn, id).unwrap().unwrap();
        assert_eq!(entry.person, "Alice");
        assert_eq!(entry.created_at, created);
        assert_eq!(entry.updated_at, created);
        assert_eq!(entry.duration_minutes(), 135);

        let later = parse_timestamp("2025-02-05 10:00").unwrap();
        assert!(update_status(&pool.conn, id, Status::Compensated, later).unwrap());
        let entry = find_entry(&pool.conn, id).unwrap().unwrap();
        assert_eq!(entry.status, Status::Compensated);
        assert_eq!(entry.updated_at, later);
        assert_eq!(entry.created_at, created);

        assert!(delete_entry(&pool.conn, id).unwrap());
        assert!(!delete_entry(&pool.conn, id).unwrap());
        assert!(find_entry(&pool.conn, id).unwrap().is_none());
    }

    #[test]
    fn store_rejects_inverted_time_range() {
        let pool = DbPool::open_in_memory().unwrap();
        let mut bad = sample("Alice");
        bad.finish_time = bad.start_time;
        let err = insert_entry(&pool.conn, &bad, parse_timestamp("2025-02-04 09:00").unwrap());
        assert!(matches!(err, Err(AppError::Store(_))));
    }

    #[test]
    fn missing_rows_report_false() {
        let pool = DbPool::open_in_memory().unwrap();
        let now = parse_timestamp("2025-02-04 09:00").unwrap();
        assert!(!replace_entry(&pool.conn, 42, &sample("Bob"), now).unwrap());
        assert!(!update_status(&pool.conn, 42, Status::Pending, now).unwrap());
    }
}
