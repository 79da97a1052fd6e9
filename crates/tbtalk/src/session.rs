//! Session state for a single toolbox talk.
//!
//! A [`Session`] holds the complete mutable state of one meeting: the active
//! user, the attendee list, the meeting header, the fixed discussion and
//! action rows, free-form notes, and the sign-off confirmations. All content
//! mutation flows through a single state-transition function,
//! [`Session::apply`], which performs the role capability check. There is no
//! persistence: the session lives and dies with the process.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::meeting::{DiscussionRow, MeetingInfo, Role, TaskRow, DISCUSSION_ROWS, TASK_ROWS};

/// A single edit to meeting content.
///
/// Row indices are 1-based, matching how the rows are labelled on the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Set the meeting date.
    Date(NaiveDate),
    /// Set the meeting time (free-form `HH:MM` string).
    Time(String),
    /// Set the meeting place.
    Place(String),
    /// Set the work description.
    Work(String),
    /// Set the hazard text of a discussion row.
    Hazard {
        /// 1-based row number.
        index: usize,
        /// New hazard text; blank is valid content.
        text: String,
    },
    /// Set the mitigation text of a discussion row.
    Mitigation {
        /// 1-based row number.
        index: usize,
        /// New mitigation text; blank is valid content.
        text: String,
    },
    /// Replace an action row.
    Task {
        /// 1-based row number.
        index: usize,
        /// The person responsible.
        owner: String,
        /// What the task is.
        duty: String,
        /// When the task is due.
        due: NaiveDate,
    },
    /// Replace the additional notes.
    Notes(String),
}

impl Edit {
    /// Short description of the edit, used in permission errors.
    #[must_use]
    pub fn action(&self) -> &'static str {
        match self {
            Self::Date(_) | Self::Time(_) | Self::Place(_) | Self::Work(_) => {
                "edit the meeting header"
            }
            Self::Hazard { .. } | Self::Mitigation { .. } => "edit discussion rows",
            Self::Task { .. } => "edit action rows",
            Self::Notes(_) => "edit the notes",
        }
    }
}

/// The full state of one toolbox talk session.
///
/// Created by [`Session::login`]; destroyed when dropped. The attendee and
/// confirmation lists are ordered and set-like: each name appears at most
/// once, in first-seen order. The discussion and action lists are fixed at
/// exactly [`DISCUSSION_ROWS`] and [`TASK_ROWS`] rows; edits replace row
/// content but never add or remove rows.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    username: String,
    role: Role,
    attendees: Vec<String>,
    meeting: MeetingInfo,
    discussion: [DiscussionRow; DISCUSSION_ROWS],
    notes: String,
    tasks: [TaskRow; TASK_ROWS],
    confirmations: Vec<String>,
}

impl Session {
    /// Start a session by logging in.
    ///
    /// The name is trimmed; the logged-in user becomes the first attendee.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyName`] if the trimmed name is empty.
    pub fn login(name: &str, role: Role, meeting: MeetingInfo) -> Result<Self> {
        let name = clean_name(name)?;
        info!(user = %name, %role, "session started");
        Ok(Self {
            attendees: vec![name.clone()],
            username: name,
            role,
            meeting,
            discussion: std::array::from_fn(|_| DiscussionRow::default()),
            notes: String::new(),
            tasks: std::array::from_fn(|_| TaskRow::blank()),
            confirmations: Vec::new(),
        })
    }

    /// Switch the active user without discarding the meeting record.
    ///
    /// The new user joins the attendee list if not already present; logging
    /// in twice with the same name never duplicates the entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyName`] if the trimmed name is empty.
    pub fn relogin(&mut self, name: &str, role: Role) -> Result<()> {
        let name = clean_name(name)?;
        info!(user = %name, %role, "user switched");
        if !self.attendees.iter().any(|a| *a == name) {
            self.attendees.push(name.clone());
        }
        self.username = name;
        self.role = role;
        Ok(())
    }

    /// Apply an edit to meeting content.
    ///
    /// This is the only mutation path for the meeting header, discussion
    /// rows, action rows, and notes. The role capability check lives here
    /// rather than in the rendering layer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAdmin`] if the active role is not admin, and
    /// [`Error::RowIndex`] for an out-of-range row number. On error the
    /// session state is unchanged.
    pub fn apply(&mut self, edit: Edit) -> Result<()> {
        if !self.role.can_edit() {
            return Err(Error::not_admin(&self.username, edit.action()));
        }
        debug!(user = %self.username, ?edit, "applying edit");
        match edit {
            Edit::Date(date) => self.meeting.date = date,
            Edit::Time(time) => self.meeting.time = time,
            Edit::Place(place) => self.meeting.place = place,
            Edit::Work(work) => self.meeting.work = work,
            Edit::Hazard { index, text } => {
                self.discussion[row_slot(index, DISCUSSION_ROWS)?].hazard = text;
            }
            Edit::Mitigation { index, text } => {
                self.discussion[row_slot(index, DISCUSSION_ROWS)?].mitigation = text;
            }
            Edit::Task {
                index,
                owner,
                duty,
                due,
            } => {
                self.tasks[row_slot(index, TASK_ROWS)?] = TaskRow { owner, duty, due };
            }
            Edit::Notes(notes) => self.notes = notes,
        }
        Ok(())
    }

    /// Record the active user's confirmation that they reviewed the record.
    ///
    /// Idempotent: returns `true` if the confirmation was newly recorded,
    /// `false` if this user had already confirmed.
    pub fn confirm(&mut self) -> bool {
        if self.confirmations.iter().any(|c| *c == self.username) {
            debug!(user = %self.username, "already confirmed");
            return false;
        }
        info!(user = %self.username, "confirmation recorded");
        self.confirmations.push(self.username.clone());
        true
    }

    /// The active user's name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The active user's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Check whether the active user has the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.can_edit()
    }

    /// Everyone who has logged into this session, in first-seen order.
    #[must_use]
    pub fn attendees(&self) -> &[String] {
        &self.attendees
    }

    /// The meeting header.
    #[must_use]
    pub fn meeting(&self) -> &MeetingInfo {
        &self.meeting
    }

    /// The discussion rows, always exactly [`DISCUSSION_ROWS`] of them.
    #[must_use]
    pub fn discussion(&self) -> &[DiscussionRow] {
        &self.discussion
    }

    /// The additional notes.
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// The action rows, always exactly [`TASK_ROWS`] of them.
    #[must_use]
    pub fn tasks(&self) -> &[TaskRow] {
        &self.tasks
    }

    /// Everyone who has confirmed the record, in confirmation order.
    #[must_use]
    pub fn confirmations(&self) -> &[String] {
        &self.confirmations
    }
}

/// Trim a login name, rejecting empty input.
fn clean_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::EmptyName);
    }
    Ok(name.to_string())
}

/// Convert a 1-based row number into an array slot.
fn row_slot(index: usize, len: usize) -> Result<usize> {
    if index == 0 || index > len {
        return Err(Error::RowIndex { index, len });
    }
    Ok(index - 1)
}
