use std::io;

use windows::Win32::Foundation::CloseHandle;
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_TERMINATE, TerminateProcess,
};

/// Checks whether a process with the given PID is still alive.
///
/// Used to tell a hung daemon from a stale PID file.
pub fn is_process_alive(pid: u32) -> bool {
    // SAFETY: OpenProcess with least-privilege query access; the handle
    // is closed straight away.
    match unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) } {
        Ok(handle) => {
            unsafe {
                let _ = CloseHandle(handle);
            }
            true
        }
        Err(_) => false,
    }
}

/// Forcibly terminates a process, for a daemon that stopped answering.
pub fn kill_process(pid: u32) -> io::Result<()> {
    // SAFETY: the handle is opened for termination only and closed below.
    unsafe {
        let handle = OpenProcess(PROCESS_TERMINATE, false, pid)?;
        let result = TerminateProcess(handle, 1);
        let _ = CloseHandle(handle);
        result?;
    }
    Ok(())
}
