//! SQLite connection wrapper (one connection per CLI run or server process).

use crate::core::query::casefold;
use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use crate::utils::path::ensure_parent_dir;
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, Result};
use std::path::Path;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    /// Open the database file, register SQL helpers and bring the schema up to date.
    pub fn new(path: &str) -> AppResult<Self> {
        let path = Path::new(path);
        ensure_parent_dir(path)?;
        let conn = Connection::open(path)?;
        Self::prepare(conn)
    }

    /// Private in-memory store, used by tests.
    pub fn open_in_memory() -> AppResult<Self> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(conn: Connection) -> AppResult<Self> {
        register_functions(&conn)?;
        run_pending_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Run `func` inside one transaction; rolled back when it fails.
    pub fn with_transaction<F, T>(&mut self, func: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        let tx = self.conn.transaction()?;
        let out = func(&tx)?;
        tx.commit()?;
        Ok(out)
    }
}

/// `casefold(text)`: Unicode lowercase, used for case-insensitive search.
/// SQLite's own `lower()` only folds ASCII.
pub fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "casefold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.as_deref().map(casefold))
        },
    )
}
