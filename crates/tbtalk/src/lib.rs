//! `tbtalk` - A single-session toolbox talk meeting record
//!
//! This library provides the core functionality for recording one pre-work
//! safety briefing: attendance, hazard/mitigation discussion rows, action
//! items, sign-off confirmations, and export of a flat-text summary
//! document. All state is in-memory for the lifetime of one session.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod meeting;
pub mod session;
pub mod shell;

pub use config::Config;
pub use error::{Error, Result};
pub use export::{render, ExportReceipt, Exporter};
pub use logging::init_logging;
pub use meeting::{DiscussionRow, MeetingInfo, Role, TaskRow};
pub use session::{Edit, Session};
pub use shell::Shell;
