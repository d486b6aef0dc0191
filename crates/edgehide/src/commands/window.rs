use edgehide_core::Command;

use super::client;

/// Stops edge-hiding one window, bringing it back if it is hidden.
pub fn remove(hwnd: usize) {
    client::run(&Command::Remove { hwnd });
}

/// Stops edge-hiding every window.
pub fn clear() {
    client::run(&Command::Clear);
}
