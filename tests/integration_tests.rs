use predicates::str::contains;
use serde_json::Value;

mod common;
use common::{init_db, rot, setup_test_db};

fn add(db_path: &str, person: &str, start: &str, finish: &str, status: &str) {
    rot()
        .args([
            "--db",
            db_path,
            "add",
            "--person",
            person,
            "--start",
            start,
            "--finish",
            finish,
            "--description",
            "Release night",
            "--status",
            status,
        ])
        .assert()
        .success();
}

fn list_json(db_path: &str, extra: &[&str]) -> Value {
    let mut args = vec!["--db", db_path, "list", "--json"];
    args.extend_from_slice(extra);
    let out = rot().args(&args).output().expect("run list");
    assert!(out.status.success());
    serde_json::from_slice(&out.stdout).expect("json output")
}

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("init_creates");

    rot()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("initialization completed"));

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_add_and_show_entry() {
    let db_path = setup_test_db("add_show");
    init_db(&db_path);

    rot()
        .args([
            "--db",
            &db_path,
            "add",
            "--person",
            "Alice",
            "--start",
            "2025-06-01 17:00",
            "--finish",
            "2025-06-01 19:45",
            "-d",
            "Server migration",
        ])
        .assert()
        .success()
        .stdout(contains("Entry #1 recorded (2h 45m)"));

    rot()
        .args(["--db", &db_path, "show", "1"])
        .assert()
        .success()
        .stdout(contains("Alice"))
        .stdout(contains("Pending"))
        .stdout(contains("Server migration"));
}

#[test]
fn test_add_rejects_finish_before_start() {
    let db_path = setup_test_db("add_invalid");
    init_db(&db_path);

    rot()
        .args([
            "--db",
            &db_path,
            "add",
            "--person",
            "Alice",
            "--start",
            "2025-06-01 19:00",
            "--finish",
            "2025-06-01 18:00",
            "-d",
            "Oops",
        ])
        .assert()
        .failure()
        .stderr(contains("finish_time: must be after start_time"));
}

#[test]
fn test_list_filters_and_paginates() {
    let db_path = setup_test_db("list_filters");
    init_db(&db_path);

    add(&db_path, "Alice", "2025-06-01 17:00", "2025-06-01 18:00", "Pending");
    add(&db_path, "Bob", "2025-06-02 17:00", "2025-06-02 20:00", "Compensated");
    add(&db_path, "Carla", "2025-06-03 17:00", "2025-06-03 17:30", "Pending");

    let page = list_json(&db_path, &["--status", "Pending", "--sort-field", "duration", "--sort-order", "asc"]);
    let people: Vec<&str> = page["entries"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["person"].as_str().unwrap())
        .collect();
    assert_eq!(people, vec!["Carla", "Alice"]);
    assert_eq!(page["entries"]["total"], 2);
    assert_eq!(page["filters"]["status"], "Pending");

    let page = list_json(&db_path, &["--per-page", "1", "--page", "2", "--sort-field", "start_time", "--sort-order", "asc"]);
    assert_eq!(page["entries"]["items"][0]["person"], "Bob");
    assert_eq!(page["entries"]["last_page"], 3);
    assert_eq!(page["entries"]["from"], 2);
    assert_eq!(page["entries"]["to"], 2);
}

#[test]
fn test_list_table_output() {
    let db_path = setup_test_db("list_table");
    init_db(&db_path);
    add(&db_path, "Alice", "2025-06-01 17:00", "2025-06-01 18:00", "Pending");

    rot()
        .args(["--db", &db_path, "list", "--search", "ALI"])
        .assert()
        .success()
        .stdout(contains("Alice"))
        .stdout(contains("1h 0m"))
        .stdout(contains("Showing 1–1 of 1"));

    rot()
        .args(["--db", &db_path, "list", "--search", "nobody"])
        .assert()
        .success()
        .stdout(contains("No entries found."))
        .stdout(contains("Showing 0–0 of 0"));
}

#[test]
fn test_status_edit_and_delete() {
    let db_path = setup_test_db("status_edit_del");
    init_db(&db_path);
    add(&db_path, "Alice", "2025-06-01 17:00", "2025-06-01 18:00", "Pending");

    rot()
        .args(["--db", &db_path, "status", "1", "not compensated"])
        .assert()
        .success()
        .stdout(contains("Not Compensated"));

    rot()
        .args([
            "--db",
            &db_path,
            "edit",
            "1",
            "--person",
            "Alice Smith",
            "--start",
            "2025-06-01 17:00",
            "--finish",
            "2025-06-01 21:00",
            "-d",
            "Extended release",
            "--status",
            "Compensated",
        ])
        .assert()
        .success()
        .stdout(contains("Alice Smith"))
        .stdout(contains("4h 0m"));

    rot()
        .args(["--db", &db_path, "del", "1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled."));

    rot()
        .args(["--db", &db_path, "del", "1", "--yes"])
        .assert()
        .success()
        .stdout(contains("Entry #1 has been deleted."));

    rot()
        .args(["--db", &db_path, "show", "1"])
        .assert()
        .failure()
        .stderr(contains("Entry #1 not found"));
}

#[test]
fn test_log_records_mutations() {
    let db_path = setup_test_db("log_print");
    init_db(&db_path);
    add(&db_path, "Alice", "2025-06-01 17:00", "2025-06-01 18:00", "Pending");

    rot()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("init"))
        .stdout(contains("add"))
        .stdout(contains("entry #1"));
}

#[test]
fn test_config_print() {
    rot()
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(contains("default_per_page"))
        .stdout(contains("list_path"));
}
