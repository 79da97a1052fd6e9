//! Export of a session into a flat-text summary document.
//!
//! [`render`] deterministically formats the full session state; the
//! [`Exporter`] writes that document to a timestamped file in the configured
//! output directory. The contract is content equality: everything in the
//! session (every attendee, every discussion row, every action row, every
//! confirmed name) appears in the document, blanks included.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::Session;

/// Render the full session state as a flat text document.
///
/// Deterministic: the same session always renders to the same string.
#[must_use]
pub fn render(session: &Session) -> String {
    let meeting = session.meeting();
    let mut doc = String::new();

    let _ = writeln!(doc, "Toolbox Talk Meeting Record");
    let _ = writeln!(doc);
    let _ = writeln!(doc, "Date:  {} {}", meeting.date, meeting.time);
    let _ = writeln!(doc, "Place: {}", meeting.place);
    let _ = writeln!(doc, "Work:  {}", meeting.work);
    let _ = writeln!(doc);
    let _ = writeln!(doc, "Leader: {}", session.username());
    let _ = writeln!(doc, "Attendees: {}", session.attendees().join(", "));
    let _ = writeln!(doc);

    let _ = writeln!(doc, "Discussion (hazards & mitigations)");
    for (i, row) in session.discussion().iter().enumerate() {
        let _ = writeln!(
            doc,
            "{}. Hazard: {} / Mitigation: {}",
            i + 1,
            row.hazard,
            row.mitigation
        );
    }
    let _ = writeln!(doc);

    let _ = writeln!(doc, "Additional notes:");
    let _ = writeln!(doc, "{}", session.notes());
    let _ = writeln!(doc);

    let _ = writeln!(doc, "Decisions & actions");
    for row in session.tasks() {
        let _ = writeln!(doc, "- {}: {} (due {})", row.owner, row.duty, row.due);
    }
    let _ = writeln!(doc);

    let _ = writeln!(doc, "Confirmed by");
    for name in session.confirmations() {
        let _ = writeln!(doc, "- {} (confirmed)", name);
    }

    doc
}

/// Receipt for a written export document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    /// Where the document was written.
    pub path: PathBuf,
    /// Size of the document in bytes.
    pub bytes: usize,
}

/// Writes rendered session documents to disk.
#[derive(Debug, Clone)]
pub struct Exporter {
    output_dir: PathBuf,
    filename_prefix: String,
    keep_file: bool,
}

impl Exporter {
    /// Build an exporter from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir(),
            filename_prefix: config.export.filename_prefix.clone(),
            keep_file: config.export.keep_file,
        }
    }

    /// Build an exporter writing to an explicit directory.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, filename_prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            filename_prefix: filename_prefix.into(),
            keep_file: true,
        }
    }

    /// Whether the export file should stay on disk after being shown.
    #[must_use]
    pub fn keep_file(&self) -> bool {
        self.keep_file
    }

    /// Render the session and write it to a timestamped file.
    ///
    /// The file is named `<prefix>_YYYYMMDD_HHMM.txt` and the output
    /// directory is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory cannot be created or the
    /// file cannot be written.
    pub fn export(&self, session: &Session) -> Result<ExportReceipt> {
        if !self.output_dir.exists() {
            fs::create_dir_all(&self.output_dir).map_err(|source| Error::DirectoryCreate {
                path: self.output_dir.clone(),
                source,
            })?;
        }

        let stamp = Local::now().format("%Y%m%d_%H%M");
        let path = self
            .output_dir
            .join(format!("{}_{stamp}.txt", self.filename_prefix));

        let doc = render(session);
        fs::write(&path, &doc).map_err(|source| Error::ExportWrite {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), bytes = doc.len(), "meeting record exported");
        Ok(ExportReceipt {
            path,
            bytes: doc.len(),
        })
    }

    /// Remove a written export file, best-effort.
    ///
    /// Used for one-shot exports: once the document has been shown there is
    /// no reason to keep the file. Failure to remove is logged, never an
    /// error.
    pub fn cleanup(path: &Path) {
        if let Err(err) = fs::remove_file(path) {
            warn!(path = %path.display(), %err, "could not remove export file");
        }
    }
}
