use edgehide_core::Command;
use edgehide_core::ipc::ResponseStatus;

pub fn execute() {
    // Try graceful shutdown via IPC first so hidden windows come back.
    if edgehide_windows::ipc::is_daemon_running() {
        match edgehide_windows::ipc::send_command(&Command::Stop) {
            Ok(response) if response.status == ResponseStatus::Ok => {
                println!("edgehide stopped. {}", response.message.unwrap_or_default());
                let _ = edgehide_core::pid::remove_pid_file();
                return;
            }
            Ok(response) => {
                eprintln!(
                    "Error: {}",
                    response.message.unwrap_or("unknown error".into())
                );
                return;
            }
            Err(e) => eprintln!("IPC failed: {e}"),
        }
    }

    // Fallback: the pipe is gone but the process may still be alive.
    match edgehide_core::pid::read_pid_file() {
        Ok(Some(pid)) if edgehide_windows::process::is_process_alive(pid) => {
            match edgehide_windows::process::kill_process(pid) {
                Ok(()) => {
                    let _ = edgehide_core::pid::remove_pid_file();
                    println!("edgehide stopped (killed PID {pid}).");
                    println!("Windows it had hidden may still be off-screen.");
                }
                Err(e) => {
                    eprintln!("Failed to kill process {pid}: {e}");
                    std::process::exit(1);
                }
            }
        }
        _ => println!("edgehide is not running."),
    }
}
