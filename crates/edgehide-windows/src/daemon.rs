use edgehide_core::WindowResult;
use edgehide_core::pid;

#[path = "daemon_ipc.rs"]
mod daemon_ipc;
#[path = "daemon_loop.rs"]
mod daemon_loop;
#[path = "daemon_loop_handlers.rs"]
mod daemon_loop_handlers;
#[path = "daemon_types.rs"]
mod daemon_types;

/// Runs the edgehide daemon until it is stopped or quit from the tray.
///
/// The calling thread owns the tracked windows, the tray icon, the
/// timers and the mouse hook. Only the IPC listener runs elsewhere.
pub fn run() -> WindowResult<()> {
    pid::write_pid_file()?;

    let result = daemon_loop::daemon_loop();
    if let Err(e) = &result {
        edgehide_core::log_error!("Daemon failed: {e}");
    }

    let _ = pid::remove_pid_file();

    result
}
