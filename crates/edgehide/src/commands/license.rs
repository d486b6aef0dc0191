use std::io::{self, BufRead, Write};
use std::path::Path;

use edgehide_core::LicenseGate;

/// Shows the activation state, or activates with `code`.
pub fn execute(code: Option<&str>) {
    let mut gate = match LicenseGate::open() {
        Ok(gate) => gate,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match code {
        Some(code) => {
            if !activate(&mut gate, code) {
                std::process::exit(1);
            }
        }
        None => {
            println!("Machine fingerprint: {}", gate.fingerprint());
            if gate.is_authorized() {
                println!("Activation: valid ({})", gate.path().display());
            } else {
                println!("Activation: required");
                println!("Run 'edgehide license <code>' with the code for this fingerprint.");
            }
        }
    }
}

/// Asks for an activation code on stdin. Returns whether the gate is open.
pub fn prompt(gate: &mut LicenseGate) -> bool {
    println!("edgehide is not activated on this machine.");
    println!("Machine fingerprint: {}", gate.fingerprint());
    print!("Activation code: ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => {
            eprintln!("\nNo activation code entered.");
            false
        }
        Ok(_) => activate(gate, &line),
    }
}

fn activate(gate: &mut LicenseGate, code: &str) -> bool {
    match gate.activate(code, hide_file) {
        Ok(()) => {
            println!("Activation code accepted.");
            true
        }
        Err(e) => {
            eprintln!("Error: {e}");
            false
        }
    }
}

#[cfg(windows)]
fn hide_file(path: &Path) -> io::Result<()> {
    edgehide_windows::fs_attr::set_hidden(path)
}

#[cfg(not(windows))]
fn hide_file(_path: &Path) -> io::Result<()> {
    Ok(())
}
