//! Interactive shell for a toolbox talk session.
//!
//! The shell is a line-oriented front end over [`Session`]: one command per
//! line, parsed by [`parse_line`], dispatched against the session state. It
//! enforces the login gate (nothing but `login`, `help`, and `quit` works
//! before a login has succeeded) and the admin gate on `export`. Command
//! errors are reported and leave the session untouched.

use std::io::{BufRead, Write};

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::export::{render, Exporter};
use crate::meeting::{MeetingInfo, Role};
use crate::session::{Edit, Session};

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Log in (or switch user): `login <admin|member> <name...>`.
    Login {
        /// The selected role.
        role: Role,
        /// The user's name.
        name: String,
    },
    /// Apply an edit to meeting content.
    Apply(Edit),
    /// Sign off on the record: `confirm`.
    Confirm,
    /// Render the current record: `show [--json]`.
    Show {
        /// Emit the raw session state as JSON instead of the document.
        json: bool,
    },
    /// Export the summary document: `export` (admin only).
    Export,
    /// Print command help.
    Help,
    /// End the session.
    Quit,
    /// A blank line; ignored.
    Empty,
}

/// Parse one line of shell input.
///
/// # Errors
///
/// Returns [`Error::Command`] for unknown commands or malformed arguments.
pub fn parse_line(line: &str) -> Result<ShellCommand> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ShellCommand::Empty);
    }

    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((kw, rest)) => (kw, rest.trim()),
        None => (line, ""),
    };

    match keyword.to_ascii_lowercase().as_str() {
        "login" => parse_login(rest),
        "date" => Ok(ShellCommand::Apply(Edit::Date(parse_date(rest)?))),
        "time" => {
            if rest.is_empty() {
                return Err(Error::command("usage: time <HH:MM>"));
            }
            Ok(ShellCommand::Apply(Edit::Time(rest.to_string())))
        }
        "place" => Ok(ShellCommand::Apply(Edit::Place(rest.to_string()))),
        "work" => Ok(ShellCommand::Apply(Edit::Work(rest.to_string()))),
        "hazard" => {
            let (index, text) = parse_row_edit(rest, "hazard")?;
            Ok(ShellCommand::Apply(Edit::Hazard { index, text }))
        }
        "mitigation" => {
            let (index, text) = parse_row_edit(rest, "mitigation")?;
            Ok(ShellCommand::Apply(Edit::Mitigation { index, text }))
        }
        "task" => parse_task(rest),
        "note" => Ok(ShellCommand::Apply(Edit::Notes(rest.to_string()))),
        "confirm" => Ok(ShellCommand::Confirm),
        "show" => match rest {
            "" => Ok(ShellCommand::Show { json: false }),
            "--json" | "json" => Ok(ShellCommand::Show { json: true }),
            other => Err(Error::command(format!(
                "unexpected argument '{other}' (usage: show [--json])"
            ))),
        },
        "export" => Ok(ShellCommand::Export),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(Error::command(format!(
            "unknown command '{other}' (try 'help')"
        ))),
    }
}

/// Parse `login <admin|member> <name...>`.
fn parse_login(rest: &str) -> Result<ShellCommand> {
    let (role, name) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| Error::command("usage: login <admin|member> <name>"))?;
    Ok(ShellCommand::Login {
        role: role.parse()?,
        name: name.trim().to_string(),
    })
}

/// Parse `<1-3> <text...>` for hazard/mitigation edits.
fn parse_row_edit(rest: &str, what: &str) -> Result<(usize, String)> {
    let (index, text) = match rest.split_once(char::is_whitespace) {
        Some((index, text)) => (index, text.trim()),
        None => (rest, ""),
    };
    if index.is_empty() {
        return Err(Error::command(format!("usage: {what} <1-3> <text>")));
    }
    let index = index
        .parse::<usize>()
        .map_err(|_| Error::command(format!("'{index}' is not a row number")))?;
    Ok((index, text.to_string()))
}

/// Parse `task <1-3> <owner> | <duty> | <YYYY-MM-DD>`.
///
/// Owner and duty may be blank; a blank due date means today.
fn parse_task(rest: &str) -> Result<ShellCommand> {
    let (index, fields) = parse_row_edit(rest, "task")?;
    let parts: Vec<&str> = fields.split('|').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(Error::command(
            "usage: task <1-3> <owner> | <duty> | <YYYY-MM-DD>",
        ));
    }
    let due = if parts[2].is_empty() {
        Local::now().date_naive()
    } else {
        parse_date(parts[2])?
    };
    Ok(ShellCommand::Apply(Edit::Task {
        index,
        owner: parts[0].to_string(),
        duty: parts[1].to_string(),
        due,
    }))
}

/// Parse a `YYYY-MM-DD` date argument.
fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| Error::command(format!("'{s}' is not a date (expected YYYY-MM-DD)")))
}

const HELP: &str = "\
Commands:
  login <admin|member> <name>             log in or switch user
  date <YYYY-MM-DD>                       set the meeting date (admin)
  time <HH:MM>                            set the meeting time (admin)
  place <text>                            set the meeting place (admin)
  work <text>                             set the work description (admin)
  hazard <1-3> <text>                     set a discussion row hazard (admin)
  mitigation <1-3> <text>                 set a discussion row mitigation (admin)
  task <1-3> <owner> | <duty> | <date>    set an action row (admin)
  note <text>                             set the additional notes (admin)
  confirm                                 sign off on the record
  show [--json]                           display the current record
  export                                  write the summary document (admin)
  help                                    show this help
  quit                                    end the session";

/// The interactive shell: session state plus configuration.
#[derive(Debug)]
pub struct Shell<'a> {
    config: &'a Config,
    session: Option<Session>,
}

impl<'a> Shell<'a> {
    /// Create a shell with no active session.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// The active session, if a login has succeeded.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Run the shell loop until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O failures on the input or output
    /// streams; command and session errors are reported inline.
    pub fn run(&mut self, mut input: impl BufRead, mut output: impl Write) -> Result<()> {
        writeln!(output, "Toolbox Talk meeting record (type 'help' for commands)")?;
        loop {
            write!(output, "> ")?;
            output.flush()?;
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            match parse_line(&line) {
                Ok(ShellCommand::Quit) => break,
                Ok(cmd) => {
                    if !self.dispatch(cmd, &mut output)? {
                        break;
                    }
                }
                Err(err) => writeln!(output, "error: {err}")?,
            }
        }
        Ok(())
    }

    /// Execute one parsed command. Returns `false` when the loop should end.
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O failures on the output stream.
    pub fn dispatch(&mut self, cmd: ShellCommand, output: &mut impl Write) -> Result<bool> {
        debug!(?cmd, "dispatching");
        match cmd {
            ShellCommand::Empty => {}
            ShellCommand::Quit => return Ok(false),
            ShellCommand::Help => writeln!(output, "{HELP}")?,
            ShellCommand::Login { role, name } => self.login(&name, role, output)?,
            // Everything else requires a login first.
            cmd => match self.session.as_mut() {
                None => writeln!(output, "please log in first: login <admin|member> <name>")?,
                Some(session) => match cmd {
                    ShellCommand::Apply(edit) => match session.apply(edit) {
                        Ok(()) => writeln!(output, "ok")?,
                        Err(err) => writeln!(output, "error: {err}")?,
                    },
                    ShellCommand::Confirm => {
                        if session.confirm() {
                            writeln!(output, "confirmation recorded for {}", session.username())?;
                        } else {
                            writeln!(output, "{} has already confirmed", session.username())?;
                        }
                    }
                    ShellCommand::Show { json } => {
                        if json {
                            writeln!(output, "{}", serde_json::to_string_pretty(session)?)?;
                        } else {
                            write!(output, "{}", render(session))?;
                        }
                    }
                    ShellCommand::Export => Self::export(self.config, session, output)?,
                    ShellCommand::Login { .. } | ShellCommand::Empty | ShellCommand::Quit
                    | ShellCommand::Help => unreachable!("handled above"),
                },
            },
        }
        Ok(true)
    }

    fn login(&mut self, name: &str, role: Role, output: &mut impl Write) -> Result<()> {
        let result = match self.session.as_mut() {
            Some(session) => session.relogin(name, role),
            None => {
                let meeting =
                    MeetingInfo::now(&self.config.meeting.place, &self.config.meeting.work);
                Session::login(name, role, meeting).map(|session| {
                    self.session = Some(session);
                })
            }
        };
        match result {
            Ok(()) => writeln!(output, "welcome, {} ({role})", name.trim())?,
            Err(err) => writeln!(output, "error: {err}")?,
        }
        Ok(())
    }

    fn export(config: &Config, session: &Session, output: &mut impl Write) -> Result<()> {
        // Only the meeting leader (admin) may export, as on the form.
        if !session.is_admin() {
            writeln!(
                output,
                "error: {}",
                Error::not_admin(session.username(), "export the record")
            )?;
            return Ok(());
        }
        let exporter = Exporter::from_config(config);
        match exporter.export(session) {
            Ok(receipt) => {
                writeln!(output, "exported to {}", receipt.path.display())?;
                if !exporter.keep_file() {
                    // One-shot download: show the document, then drop the file.
                    write!(output, "{}", render(session))?;
                    Exporter::cleanup(&receipt.path);
                }
            }
            Err(err) => writeln!(output, "error: {err}")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_lines(config: &Config, lines: &str) -> (String, Option<Session>) {
        let mut shell = Shell::new(config);
        let mut out = Vec::new();
        shell.run(Cursor::new(lines), &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        (output, shell.session)
    }

    // === parse_line ===

    #[test]
    fn test_parse_login() {
        assert_eq!(
            parse_line("login admin Dana Kim").unwrap(),
            ShellCommand::Login {
                role: Role::Admin,
                name: "Dana Kim".to_string()
            }
        );
    }

    #[test]
    fn test_parse_login_missing_name() {
        assert!(parse_line("login admin").unwrap_err().is_command_error());
    }

    #[test]
    fn test_parse_login_bad_role() {
        assert!(parse_line("login boss dana").unwrap_err().is_command_error());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_line("date 2026-09-01").unwrap(),
            ShellCommand::Apply(Edit::Date(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()))
        );
        assert!(parse_line("date tomorrow").unwrap_err().is_command_error());
    }

    #[test]
    fn test_parse_hazard() {
        assert_eq!(
            parse_line("hazard 2 falling tools").unwrap(),
            ShellCommand::Apply(Edit::Hazard {
                index: 2,
                text: "falling tools".to_string()
            })
        );
    }

    #[test]
    fn test_parse_hazard_blank_text_is_valid() {
        assert_eq!(
            parse_line("hazard 1").unwrap(),
            ShellCommand::Apply(Edit::Hazard {
                index: 1,
                text: String::new()
            })
        );
    }

    #[test]
    fn test_parse_hazard_bad_index() {
        assert!(parse_line("hazard two x").unwrap_err().is_command_error());
    }

    #[test]
    fn test_parse_task() {
        assert_eq!(
            parse_line("task 1 kim | inspect harnesses | 2026-09-03").unwrap(),
            ShellCommand::Apply(Edit::Task {
                index: 1,
                owner: "kim".to_string(),
                duty: "inspect harnesses".to_string(),
                due: NaiveDate::from_ymd_opt(2026, 9, 3).unwrap()
            })
        );
    }

    #[test]
    fn test_parse_task_blank_due_is_today() {
        let cmd = parse_line("task 1 kim | inspect |").unwrap();
        let ShellCommand::Apply(Edit::Task { due, .. }) = cmd else {
            panic!("expected task edit");
        };
        assert_eq!(due, Local::now().date_naive());
    }

    #[test]
    fn test_parse_task_wrong_arity() {
        assert!(parse_line("task 1 kim | inspect")
            .unwrap_err()
            .is_command_error());
    }

    #[test]
    fn test_parse_note_place_work() {
        assert_eq!(
            parse_line("note crane at noon").unwrap(),
            ShellCommand::Apply(Edit::Notes("crane at noon".to_string()))
        );
        assert_eq!(
            parse_line("place Dock 3").unwrap(),
            ShellCommand::Apply(Edit::Place("Dock 3".to_string()))
        );
        assert_eq!(
            parse_line("work confined space entry").unwrap(),
            ShellCommand::Apply(Edit::Work("confined space entry".to_string()))
        );
    }

    #[test]
    fn test_parse_bare_commands() {
        assert_eq!(parse_line("confirm").unwrap(), ShellCommand::Confirm);
        assert_eq!(parse_line("show").unwrap(), ShellCommand::Show { json: false });
        assert_eq!(
            parse_line("show --json").unwrap(),
            ShellCommand::Show { json: true }
        );
        assert_eq!(parse_line("export").unwrap(), ShellCommand::Export);
        assert_eq!(parse_line("help").unwrap(), ShellCommand::Help);
        assert_eq!(parse_line("quit").unwrap(), ShellCommand::Quit);
        assert_eq!(parse_line("exit").unwrap(), ShellCommand::Quit);
        assert_eq!(parse_line("   ").unwrap(), ShellCommand::Empty);
    }

    #[test]
    fn test_parse_unknown_command() {
        let err = parse_line("frobnicate").unwrap_err();
        assert!(err.to_string().contains("frobnicate"));
    }

    // === shell loop ===

    #[test]
    fn test_login_gate_blocks_until_login() {
        let config = Config::default();
        let (output, session) = run_lines(&config, "confirm\nshow\nquit\n");
        assert!(output.contains("please log in first"));
        assert!(session.is_none());
    }

    #[test]
    fn test_login_then_show() {
        let config = Config::default();
        let (output, session) = run_lines(&config, "login admin dana\nshow\nquit\n");
        assert!(output.contains("welcome, dana (admin)"));
        assert!(output.contains("Leader: dana"));
        // Meeting defaults come from config
        assert!(output.contains("Site A"));
        let session = session.unwrap();
        assert_eq!(session.attendees(), ["dana"]);
    }

    #[test]
    fn test_empty_login_name_reports_error() {
        let config = Config::default();
        let (output, session) = run_lines(&config, "login admin   \nquit\n");
        // 'login admin ' with only whitespace after the role fails arity,
        // 'login admin' fails the same way
        assert!(output.contains("error:"));
        assert!(session.is_none());
    }

    #[test]
    fn test_member_edit_rejected_inline() {
        let config = Config::default();
        let (output, session) =
            run_lines(&config, "login member kim\nhazard 1 sparks\nquit\n");
        assert!(output.contains("is not an admin"));
        let session = session.unwrap();
        assert!(session.discussion()[0].hazard.is_empty());
    }

    #[test]
    fn test_member_export_rejected() {
        let config = Config::default();
        let (output, _) = run_lines(&config, "login member kim\nexport\nquit\n");
        assert!(output.contains("cannot export the record"));
    }

    #[test]
    fn test_confirm_twice_reports_no_op() {
        let config = Config::default();
        let (output, session) = run_lines(&config, "login member kim\nconfirm\nconfirm\nquit\n");
        assert!(output.contains("confirmation recorded for kim"));
        assert!(output.contains("kim has already confirmed"));
        assert_eq!(session.unwrap().confirmations(), ["kim"]);
    }

    #[test]
    fn test_full_session_with_export() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.export.output_dir = Some(dir.path().to_path_buf());

        let script = "\
login admin dana
hazard 1 falling tools
mitigation 1 tool lanyards
task 1 kim | inspect harnesses | 2026-09-03
note crane arrives at noon
confirm
login member kim
confirm
login admin dana
export
quit
";
        let (output, session) = run_lines(&config, script);
        assert!(output.contains("exported to"));

        let session = session.unwrap();
        assert_eq!(session.attendees(), ["dana", "kim"]);
        assert_eq!(session.confirmations(), ["dana", "kim"]);

        // Exactly one export file, containing the full record
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let written =
            std::fs::read_to_string(entries[0].as_ref().unwrap().path()).unwrap();
        assert!(written.contains("falling tools"));
        assert!(written.contains("kim: inspect harnesses"));
        assert!(written.contains("- dana (confirmed)"));
        assert!(written.contains("- kim (confirmed)"));
    }

    #[test]
    fn test_export_one_shot_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.export.output_dir = Some(dir.path().to_path_buf());
        config.export.keep_file = false;

        let (output, _) = run_lines(&config, "login admin dana\nexport\nquit\n");
        assert!(output.contains("exported to"));
        // The document was printed instead
        assert!(output.contains("Toolbox Talk Meeting Record"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_show_json() {
        let config = Config::default();
        let (output, _) = run_lines(&config, "login admin dana\nshow --json\nquit\n");
        assert!(output.contains("\"username\": \"dana\""));
    }

    #[test]
    fn test_unknown_command_keeps_loop_alive() {
        let config = Config::default();
        let (output, session) = run_lines(&config, "frobnicate\nlogin admin dana\nquit\n");
        assert!(output.contains("unknown command"));
        assert!(session.is_some());
    }

    #[test]
    fn test_help_lists_commands() {
        let config = Config::default();
        let (output, _) = run_lines(&config, "help\nquit\n");
        for cmd in ["login", "hazard", "task", "confirm", "export"] {
            assert!(output.contains(cmd), "help missing '{cmd}'");
        }
    }
}
