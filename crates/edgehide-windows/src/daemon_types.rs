use std::sync::mpsc;

use edgehide_core::PlatformError;
use edgehide_core::ipc::{Command, Response};
use edgehide_core::picker::PickError;
use thiserror::Error;

/// A CLI command forwarded from the IPC thread.
pub(super) struct IpcRequest {
    pub(super) command: Command,
    pub(super) reply: ResponseSender,
}

/// Sends a response back to the IPC thread for the connected client.
pub(super) type ResponseSender = mpsc::Sender<Response>;

/// Whether the message pump keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flow {
    Continue,
    /// Stopped over IPC; the listener thread exits after replying.
    Stop,
    /// Quit from the tray menu.
    Quit,
}

/// Why the window picker could not be armed.
#[derive(Debug, Error)]
pub(super) enum ArmError {
    #[error("activation required: run `edgehide license <code>` (machine fingerprint {fingerprint})")]
    Unlicensed { fingerprint: String },
    #[error("activation is unavailable: the machine fingerprint could not be read")]
    NoFingerprint,
    #[error(transparent)]
    Pick(#[from] PickError),
    #[error("could not listen for the click: {0}")]
    Hook(#[source] PlatformError),
}
