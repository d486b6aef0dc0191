use edgehide_core::Command;

pub fn execute() {
    if edgehide_windows::ipc::is_daemon_running() {
        match edgehide_windows::ipc::send_command(&Command::Status) {
            Ok(response) => println!(
                "{}",
                response
                    .message
                    .unwrap_or_else(|| "edgehide is running.".into())
            ),
            Err(_) => println!("edgehide is running."),
        }
        return;
    }

    // Pipe isn't responding; check for a PID file left behind by a
    // daemon that was killed without a clean shutdown.
    if let Ok(Some(pid)) = edgehide_core::pid::read_pid_file() {
        if edgehide_windows::process::is_process_alive(pid) {
            println!("edgehide process exists (PID: {pid}) but is not responding.");
        } else {
            let _ = edgehide_core::pid::remove_pid_file();
            println!("edgehide is not running (cleaned up stale PID file).");
        }
    } else {
        println!("edgehide is not running.");
    }
}
