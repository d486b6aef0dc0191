use serde::{Deserialize, Serialize};

use crate::TrackedEntry;

/// The named pipe path used for IPC between CLI and daemon.
pub const PIPE_NAME: &str = r"\\.\pipe\edgehide";

/// A command sent from the CLI to the daemon.
///
/// These are serialized as JSON and sent over the named pipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum Command {
    /// Request the daemon to stop.
    Stop,
    /// Request the daemon's current status.
    Status,
    /// Arm the picker: the next left click selects a window.
    Pick,
    /// Abandon a pending pick.
    CancelPick,
    /// List the tracked windows.
    List,
    /// Stop tracking one window.
    Remove { hwnd: usize },
    /// Stop tracking every window.
    Clear,
}

/// A response sent from the daemon back to the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Whether the command succeeded.
    pub status: ResponseStatus,
    /// Optional human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Tracked windows, for commands that report them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub windows: Vec<TrackedEntry>,
}

/// Status of a daemon response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

impl Response {
    /// Creates a successful response with no message.
    pub fn ok() -> Self {
        Self {
            status: ResponseStatus::Ok,
            message: None,
            windows: Vec::new(),
        }
    }

    /// Creates a successful response with a message.
    pub fn ok_with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok()
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Some(message.into()),
            windows: Vec::new(),
        }
    }

    /// Attaches the tracked-window list.
    pub fn with_windows(mut self, windows: Vec<TrackedEntry>) -> Self {
        self.windows = windows;
        self
    }

    pub fn is_ok(&self) -> bool {
        self.status == ResponseStatus::Ok
    }
}
