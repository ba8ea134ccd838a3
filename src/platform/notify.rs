//! User-visible notices
//!
//! Runtime failures never unwind into the tick or click loops. They are
//! logged and forwarded here so the host can show them.

use std::fmt;

/// Something the user should be told about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// An operation failed and was skipped
    Error { context: String, message: String },
    /// Settings were requested but no shape has been clicked yet
    NoShapeSelected,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Error { context, message } => {
                write!(f, "An error occurred in {}: {}", context, message)
            }
            Notice::NoShapeSelected => write!(f, "No shape selected for settings."),
        }
    }
}

/// Receiver for notices (message box, toast, status bar...)
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

/// Notifier for headless hosts: notices only go to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notice: Notice) {
        log::warn!("Notice: {}", notice);
    }
}

impl<F> Notifier for F
where
    F: FnMut(Notice),
{
    fn notify(&mut self, notice: Notice) {
        self(notice)
    }
}
