//! Windows platform implementation for edgehide.
#![cfg(windows)]

/// Daemon message loop.
pub mod daemon;

/// `Desktop` implementation over user32.
pub mod desktop;

/// File attribute helpers.
pub mod fs_attr;

/// One-shot low-level mouse hook for window picking.
pub mod hook;

/// IPC via Named Pipes.
pub mod ipc;

/// Process utilities (alive check, kill).
pub mod process;

/// Notification-area icon and its hidden owner window.
pub mod tray;

pub use desktop::Win32Desktop;
