use crate::errors::ValidationErrors;
use crate::models::{EntryInput, NewEntry, Status};
use crate::utils::time::parse_timestamp;

pub const PERSON_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    raw: &str,
    max_chars: usize,
) -> String {
    let value = raw.trim();
    if value.is_empty() {
        errors.add(field, "is required");
    } else if value.chars().count() > max_chars {
        errors.add(field, format!("must be at most {max_chars} characters"));
    }
    value.to_string()
}

/// Validate a create/replace payload. Every violated constraint is reported,
/// not only the first one.
pub fn validate_entry(input: &EntryInput) -> Result<NewEntry, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let person = required_text(&mut errors, "person", &input.person, PERSON_MAX_CHARS);
    let description = required_text(
        &mut errors,
        "description",
        &input.description,
        DESCRIPTION_MAX_CHARS,
    );

    let start = parse_timestamp(&input.start_time);
    if start.is_none() {
        errors.add("start_time", "must be a date and time (YYYY-MM-DD HH:MM)");
    }
    let finish = parse_timestamp(&input.finish_time);
    if finish.is_none() {
        errors.add("finish_time", "must be a date and time (YYYY-MM-DD HH:MM)");
    }
    if let (Some(s), Some(f)) = (start, finish)
        && f <= s
    {
        errors.add("finish_time", "must be after start_time");
    }

    let status = match input.status.as_deref().map(str::trim) {
        None | Some("") => Some(Status::Pending),
        Some(raw) => parse_status(raw),
    };
    if status.is_none() {
        errors.add("status", "must be one of: Pending, Compensated, Not Compensated");
    }

    match (start, finish, status) {
        (Some(start_time), Some(finish_time), Some(status)) if errors.is_empty() => Ok(NewEntry {
            person,
            start_time,
            finish_time,
            description,
            status,
        }),
        _ => Err(errors),
    }
}

/// Status values accepted on input: the stored spelling or its lenient forms.
pub fn parse_status(raw: &str) -> Option<Status> {
    Status::from_db_str(raw.trim()).or_else(|| Status::from_input(raw))
}
