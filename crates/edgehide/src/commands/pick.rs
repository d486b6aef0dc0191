use edgehide_core::{Command, LicenseGate};

use super::client;
use super::license;

/// Arms the daemon's window picker, or cancels a pending pick.
///
/// Picking needs an activated machine; without one the user is asked
/// for a code first.
pub fn execute(cancel: bool) {
    if cancel {
        client::run(&Command::CancelPick);
        return;
    }

    let mut gate = match LicenseGate::open() {
        Ok(gate) => gate,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    if !gate.is_authorized() && !license::prompt(&mut gate) {
        std::process::exit(1);
    }

    client::run(&Command::Pick);
}
