use std::os::windows::process::CommandExt;
use std::process::{Command, Stdio};

/// Windows process creation flags for launching a fully detached daemon.
///
/// `CREATE_NEW_PROCESS_GROUP` (0x200): Ctrl+C in the CLI terminal does
/// not reach the daemon.
///
/// `CREATE_NO_WINDOW` (0x08000000): no console window, and no inherited
/// console handles that would keep `cmd.output()` waiting in tests.
const DETACH_FLAGS: u32 = 0x08000000 | 0x00000200;

pub fn execute() {
    if edgehide_windows::ipc::is_daemon_running() {
        println!("edgehide is already running.");
        return;
    }

    // Clean up a stale PID file from a previous unclean shutdown.
    if let Ok(Some(pid)) = edgehide_core::pid::read_pid_file() {
        if edgehide_windows::process::is_process_alive(pid) {
            println!("edgehide process exists (PID: {pid}) but is not responding.");
            return;
        }
        let _ = edgehide_core::pid::remove_pid_file();
    }

    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(e) => {
            eprintln!("Error: could not locate the edgehide executable: {e}");
            std::process::exit(1);
        }
    };

    // Re-run ourselves with the hidden `daemon` subcommand. The daemon
    // inherits this working directory, where the activation file lives.
    let spawned = Command::new(exe)
        .arg("daemon")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .creation_flags(DETACH_FLAGS)
        .spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(e) => {
            eprintln!("Error: failed to start daemon: {e}");
            std::process::exit(1);
        }
    };

    let pid = child.id();
    let _ = child.try_wait();

    print_banner(pid);
}

fn print_banner(pid: u32) {
    let d = "\x1b[90m"; // Dim gray, labels
    let w = "\x1b[1;97m"; // Bold bright white, values
    let r = "\x1b[0m"; // Reset

    println!();
    println!("  {d}edgehide{r} v{}", env!("CARGO_PKG_VERSION"));
    println!("  {d}Config{r}   ~/.config/edgehide/");
    println!("  {d}Daemon{r}   Started (PID: {w}{pid}{r})");
    println!("  {d}Tip{r}      Run 'edgehide pick', or double-click the tray icon, then click a window");
    println!();
}
