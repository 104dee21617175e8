#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDateTime;
use rovertime::db::DbPool;
use rovertime::db::queries::insert_entry;
use rovertime::models::{NewEntry, Status};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rot() -> Command {
    cargo_bin_cmd!("rovertime")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rovertime.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// `--db <path> --test init`
pub fn init_db(db_path: &str) {
    rot().args(["--db", db_path, "--test", "init"]).assert().success();
}

pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").expect("timestamp")
}

/// Insert straight through the store so `created_at` is controlled.
pub fn seed(
    pool: &DbPool,
    person: &str,
    start: &str,
    finish: &str,
    description: &str,
    status: Status,
    created_at: &str,
) -> i64 {
    let entry = NewEntry {
        person: person.to_string(),
        start_time: ts(start),
        finish_time: ts(finish),
        description: description.to_string(),
        status,
    };
    insert_entry(&pool.conn, &entry, ts(created_at)).expect("insert entry")
}
