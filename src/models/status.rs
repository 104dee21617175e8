use serde::{Deserialize, Serialize};
use std::fmt;

/// Compensation state of an overtime entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Pending,
    Compensated,
    #[serde(rename = "Not Compensated")]
    NotCompensated,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::Compensated, Status::NotCompensated];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Compensated => "Compensated",
            Status::NotCompensated => "Not Compensated",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        self.as_str()
    }

    /// Convert DB string → enum. Only the exact stored spelling is accepted.
    pub fn from_db_str(s: &str) -> Option<Self> {
        Status::ALL.into_iter().find(|st| st.as_str() == s)
    }

    /// Lenient parser for typed input: case-insensitive, ignores spaces,
    /// dashes and underscores (`not-compensated`, `NotCompensated`, ...).
    pub fn from_input(s: &str) -> Option<Self> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match folded.as_str() {
            "pending" => Some(Status::Pending),
            "compensated" => Some(Status::Compensated),
            "notcompensated" => Some(Status::NotCompensated),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
