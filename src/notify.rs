//! User-facing notifications
//!
//! The core never prints. It hands [`Notice`]s to a [`Notifier`] supplied by
//! whatever front end drives it.

use std::cell::RefCell;
use std::fmt;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => write!(f, "Info"),
            Level::Warning => write!(f, "Warning"),
            Level::Error => write!(f, "Error"),
        }
    }
}

/// A single message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(level: Level, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { level, title: title.into(), message: message.into() }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Level::Info, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Level::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Level::Error, title, message)
    }
}

/// Sink for user notifications
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Prints info to stdout, warnings and errors to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier {
    /// Suppress info notices
    pub quiet: bool,
    /// Send info notices to stderr as well, leaving stdout to the caller
    pub info_to_stderr: bool,
}

impl ConsoleNotifier {
    pub fn new(quiet: bool) -> Self {
        Self { quiet, info_to_stderr: false }
    }

    /// Same settings, with info moved off stdout
    pub fn with_info_on_stderr(self) -> Self {
        Self { info_to_stderr: true, ..self }
    }
}

/// Render a notice the way the console shows it.
///
/// A title that merely repeats the level is left out.
pub fn console_text(notice: &Notice) -> String {
    match notice.level {
        Level::Info => {
            let mut text = format!("{}:", notice.title);
            for line in notice.message.lines() {
                text.push_str("\n  ");
                text.push_str(line);
            }
            text
        }
        Level::Warning | Level::Error => {
            if notice.title.is_empty() || notice.title == notice.level.to_string() {
                format!("{}: {}", notice.level, notice.message)
            } else {
                format!("{}: {}: {}", notice.level, notice.title, notice.message)
            }
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            Level::Info if self.quiet => {}
            Level::Info if !self.info_to_stderr => println!("{}", console_text(&notice)),
            _ => eprintln!("{}", console_text(&notice)),
        }
    }
}

/// Keeps every notice in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    /// Notices of one level
    pub fn at_level(&self, level: Level) -> Vec<Notice> {
        self.notices.borrow().iter().filter(|n| n.level == level).cloned().collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}
