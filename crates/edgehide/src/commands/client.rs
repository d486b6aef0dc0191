use edgehide_core::ipc::{Command, Response};

/// Sends a command to the running daemon and returns its successful reply.
///
/// Exits the process with an error if the daemon is not running, cannot
/// be reached, or rejects the command.
pub fn request(command: &Command) -> Response {
    if !edgehide_windows::ipc::is_daemon_running() {
        eprintln!("edgehide is not running. Start it with 'edgehide start'.");
        std::process::exit(1);
    }

    match edgehide_windows::ipc::send_command(command) {
        Ok(response) if response.is_ok() => response,
        Ok(response) => {
            eprintln!(
                "Error: {}",
                response.message.unwrap_or("unknown error".into())
            );
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to reach the daemon: {e}");
            std::process::exit(1);
        }
    }
}

/// Sends a command and prints the daemon's message, if any.
pub fn run(command: &Command) {
    if let Some(message) = request(command).message {
        println!("{message}");
    }
}
