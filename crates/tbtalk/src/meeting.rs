//! Core meeting-record types for tbtalk.
//!
//! This module defines the fundamental data structures for a toolbox talk
//! record: who may edit it, the meeting header, and the fixed discussion
//! and action rows.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of discussion rows in a meeting record.
pub const DISCUSSION_ROWS: usize = 3;

/// Number of action (task) rows in a meeting record.
pub const TASK_ROWS: usize = 3;

/// Access tier controlling who may edit meeting content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May edit the meeting header, discussion rows, tasks, and notes,
    /// and export the record.
    Admin,
    /// May view the record and confirm it; all fields are read-only.
    Member,
}

impl Role {
    /// Check whether this role may edit meeting content.
    #[must_use]
    pub fn can_edit(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Member => write!(f, "member"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            other => Err(crate::error::Error::command(format!(
                "unknown role '{other}' (expected 'admin' or 'member')"
            ))),
        }
    }
}

/// The meeting header: when, where, and what work is being discussed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingInfo {
    /// Date of the meeting.
    pub date: NaiveDate,
    /// Time of the meeting as an `HH:MM` string.
    pub time: String,
    /// Where the meeting is held.
    pub place: String,
    /// The work being discussed (e.g. "work at height").
    pub work: String,
}

impl MeetingInfo {
    /// Create a meeting header for right now with the given place and work
    /// description.
    #[must_use]
    pub fn now(place: impl Into<String>, work: impl Into<String>) -> Self {
        let now = Local::now();
        Self {
            date: now.date_naive(),
            time: now.format("%H:%M").to_string(),
            place: place.into(),
            work: work.into(),
        }
    }
}

/// One hazard/mitigation discussion row.
///
/// Blank strings are valid content: a row that was never filled in renders
/// as blank, it is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionRow {
    /// The hazard being discussed.
    pub hazard: String,
    /// The agreed mitigation for the hazard.
    pub mitigation: String,
}

impl DiscussionRow {
    /// Check whether both fields of this row are blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.hazard.is_empty() && self.mitigation.is_empty()
    }
}

/// One action-item row: who does what, by when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRow {
    /// The person responsible for the task.
    pub owner: String,
    /// What the task is.
    pub duty: String,
    /// When the task is due.
    pub due: NaiveDate,
}

impl TaskRow {
    /// A task row with blank owner/duty, due today.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            owner: String::new(),
            duty: String::new(),
            due: Local::now().date_naive(),
        }
    }

    /// Check whether the owner and duty of this row are blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.owner.is_empty() && self.duty.is_empty()
    }
}

impl Default for TaskRow {
    fn default() -> Self {
        Self::blank()
    }
}
