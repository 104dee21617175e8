use super::status::Status;
use crate::utils::time::{format_duration, minutes_between};
use chrono::NaiveDateTime;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// One persisted overtime entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Entry {
    pub id: i64,                     // ⇔ entries.id (autoincrement, insertion order)
    pub person: String,              // ⇔ entries.person
    pub start_time: NaiveDateTime,   // ⇔ entries.start_time ("YYYY-MM-DD HH:MM:SS")
    pub finish_time: NaiveDateTime,  // ⇔ entries.finish_time, always > start_time
    pub description: String,         // ⇔ entries.description
    pub status: Status,              // ⇔ entries.status
    pub created_at: NaiveDateTime,   // ⇔ entries.created_at, immutable
    pub updated_at: NaiveDateTime,   // ⇔ entries.updated_at
}

impl Entry {
    pub fn duration_minutes(&self) -> i64 {
        minutes_between(self.start_time, self.finish_time)
    }

    /// `1d 2h 5m`, or `2h 5m` below one day.
    pub fn duration_label(&self) -> String {
        format_duration(self.duration_minutes())
    }
}

// Serialized by hand so every item also carries the derived duration.
impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Entry", 9)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("person", &self.person)?;
        s.serialize_field("start_time", &self.start_time)?;
        s.serialize_field("finish_time", &self.finish_time)?;
        s.serialize_field("description", &self.description)?;
        s.serialize_field("status", &self.status)?;
        s.serialize_field("created_at", &self.created_at)?;
        s.serialize_field("updated_at", &self.updated_at)?;
        s.serialize_field("duration_minutes", &self.duration_minutes())?;
        s.end()
    }
}

/// Raw create/replace payload, exactly as submitted by a form or CLI flags.
///
/// `start_date`/`finish_date` are accepted as aliases of the time fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInput {
    #[serde(default)]
    pub person: String,
    #[serde(default, alias = "start_date")]
    pub start_time: String,
    #[serde(default, alias = "finish_date")]
    pub finish_time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// A payload that passed validation and can be written as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub person: String,
    pub start_time: NaiveDateTime,
    pub finish_time: NaiveDateTime,
    pub description: String,
    pub status: Status,
}
