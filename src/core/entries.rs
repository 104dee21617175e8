use crate::core::validate::{parse_status, validate_entry};
use crate::db::log::audit_quietly;
use crate::db::pool::DbPool;
use crate::db::queries::{delete_entry, find_entry, insert_entry, replace_entry, update_status};
use crate::errors::{AppError, AppResult, ValidationErrors};
use crate::models::{Entry, EntryInput, Status};
use crate::utils::time::now;

/// Record operations around the listing: create, show, replace, status
/// patch and delete. Each mutation is validated first and audited after.
pub struct EntryLogic;

impl EntryLogic {
    pub fn create(pool: &mut DbPool, input: &EntryInput) -> AppResult<Entry> {
        let new_entry = validate_entry(input)?;

        let entry = pool.with_transaction(|conn| {
            let id = insert_entry(conn, &new_entry, now())?;
            find_entry(conn, id)?.ok_or(AppError::NotFound(id))
        })?;

        audit_quietly(
            &pool.conn,
            "add",
            &format!("entry #{}", entry.id),
            &format!(
                "{} {} → {} ({})",
                entry.person, entry.start_time, entry.finish_time, entry.status
            ),
        );
        tracing::info!(id = entry.id, person = %entry.person, "entry created");
        Ok(entry)
    }

    pub fn show(pool: &DbPool, id: i64) -> AppResult<Entry> {
        find_entry(&pool.conn, id)?.ok_or(AppError::NotFound(id))
    }

    /// Full replace of every field except `id` and `created_at`.
    pub fn replace(pool: &mut DbPool, id: i64, input: &EntryInput) -> AppResult<Entry> {
        let new_entry = validate_entry(input)?;

        let entry = pool.with_transaction(|conn| {
            if !replace_entry(conn, id, &new_entry, now())? {
                return Err(AppError::NotFound(id));
            }
            find_entry(conn, id)?.ok_or(AppError::NotFound(id))
        })?;

        audit_quietly(
            &pool.conn,
            "edit",
            &format!("entry #{id}"),
            &format!(
                "{} {} → {} ({})",
                entry.person, entry.start_time, entry.finish_time, entry.status
            ),
        );
        tracing::info!(id, "entry replaced");
        Ok(entry)
    }

    /// Status-only update; the raw value goes through the same status rules
    /// as a full payload.
    pub fn patch_status(pool: &mut DbPool, id: i64, raw_status: &str) -> AppResult<Entry> {
        let status = parse_status(raw_status).ok_or_else(|| {
            let mut errors = ValidationErrors::new();
            errors.add("status", "must be one of: Pending, Compensated, Not Compensated");
            AppError::Validation(errors)
        })?;
        Self::set_status(pool, id, status)
    }

    pub fn set_status(pool: &mut DbPool, id: i64, status: Status) -> AppResult<Entry> {
        let entry = pool.with_transaction(|conn| {
            if !update_status(conn, id, status, now())? {
                return Err(AppError::NotFound(id));
            }
            find_entry(conn, id)?.ok_or(AppError::NotFound(id))
        })?;

        audit_quietly(
            &pool.conn,
            "status",
            &format!("entry #{id}"),
            &format!("status set to {status}"),
        );
        tracing::info!(id, %status, "entry status updated");
        Ok(entry)
    }

    /// Irreversible.
    pub fn delete(pool: &mut DbPool, id: i64) -> AppResult<()> {
        if !delete_entry(&pool.conn, id)? {
            return Err(AppError::NotFound(id));
        }

        audit_quietly(&pool.conn, "del", &format!("entry #{id}"), "entry deleted");
        tracing::info!(id, "entry deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::log::load_log;

    fn input(person: &str) -> EntryInput {
        EntryInput {
            person: person.into(),
            start_time: "2025-06-01 17:00".into(),
            finish_time: "2025-06-01 19:45".into(),
            description: "Server migration".into(),
            status: Some("Pending".into()),
        }
    }

    #[test]
    fn lifecycle_with_audit_trail() {
        let mut pool = DbPool::open_in_memory().unwrap();

        let entry = EntryLogic::create(&mut pool, &input("Alice")).unwrap();
        assert_eq!(entry.duration_minutes(), 165);

        let mut changed = input("Alice Smith");
        changed.status = Some("Compensated".into());
        let replaced = EntryLogic::replace(&mut pool, entry.id, &changed).unwrap();
        assert_eq!(replaced.person, "Alice Smith");
        assert_eq!(replaced.created_at, entry.created_at);

        let patched = EntryLogic::patch_status(&mut pool, entry.id, "not compensated").unwrap();
        assert_eq!(patched.status, Status::NotCompensated);
        assert_eq!(patched.person, "Alice Smith");

        EntryLogic::delete(&mut pool, entry.id).unwrap();
        assert!(matches!(
            EntryLogic::show(&pool, entry.id),
            Err(AppError::NotFound(id)) if id == entry.id
        ));

        let ops: Vec<String> = load_log(&pool.conn)
            .unwrap()
            .into_iter()
            .filter(|r| r.operation != "migration_applied")
            .map(|r| r.operation)
            .collect();
        assert_eq!(ops, vec!["add", "edit", "status", "del"]);
    }

    #[test]
    fn mutations_on_missing_ids_are_not_found() {
        let mut pool = DbPool::open_in_memory().unwrap();
        assert!(matches!(
            EntryLogic::replace(&mut pool, 9, &input("Bob")),
            Err(AppError::NotFound(9))
        ));
        assert!(matches!(
            EntryLogic::patch_status(&mut pool, 9, "Pending"),
            Err(AppError::NotFound(9))
        ));
        assert!(matches!(EntryLogic::delete(&mut pool, 9), Err(AppError::NotFound(9))));
    }

    #[test]
    fn invalid_payload_never_reaches_the_store() {
        let mut pool = DbPool::open_in_memory().unwrap();
        let mut bad = input("");
        bad.finish_time = "2025-06-01 16:00".into();

        match EntryLogic::create(&mut pool, &bad) {
            Err(AppError::Validation(errors)) => {
                assert!(errors.has("person"));
                assert!(errors.has("finish_time"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        let n: i64 = pool
            .conn
            .query_row("SELECT COUNT(*) FROM entries", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn unknown_status_patch_is_a_validation_error() {
        let mut pool = DbPool::open_in_memory().unwrap();
        let entry = EntryLogic::create(&mut pool, &input("Alice")).unwrap();
        assert!(matches!(
            EntryLogic::patch_status(&mut pool, entry.id, "Paid"),
            Err(AppError::Validation(_))
        ));
    }
}
