use std::io::{self, BufRead, BufReader, Write};
use std::os::windows::io::FromRawHandle;

use edgehide_core::ipc::{Command, PIPE_NAME, Response};
use windows::Win32::Foundation::{
    CloseHandle, DUPLICATE_SAME_ACCESS, DuplicateHandle, HANDLE, INVALID_HANDLE_VALUE,
};
use windows::Win32::Storage::FileSystem::{
    CreateFileW, FILE_SHARE_NONE, FlushFileBuffers, OPEN_EXISTING, PIPE_ACCESS_DUPLEX,
};
use windows::Win32::System::Pipes::{
    ConnectNamedPipe, CreateNamedPipeW, DisconnectNamedPipe, PIPE_READMODE_BYTE, PIPE_TYPE_BYTE,
    PIPE_UNLIMITED_INSTANCES, PIPE_WAIT, WaitNamedPipeW,
};
use windows::Win32::System::Threading::GetCurrentProcess;
use windows::core::HSTRING;

const GENERIC_READ_WRITE: u32 = 0x80000000 | 0x40000000;

/// A Named Pipe server that the daemon uses to accept CLI connections.
///
/// Each connection carries one JSON command line and gets one JSON
/// response line back.
pub struct PipeServer {
    handle: HANDLE,
}

impl PipeServer {
    /// Creates a new pipe instance without waiting for a client.
    pub fn create() -> io::Result<Self> {
        let pipe_name = HSTRING::from(PIPE_NAME);

        // SAFETY: CreateNamedPipeW creates a new named pipe instance.
        // We pass valid parameters and check for INVALID_HANDLE_VALUE.
        let handle = unsafe {
            CreateNamedPipeW(
                &pipe_name,
                PIPE_ACCESS_DUPLEX,
                PIPE_TYPE_BYTE | PIPE_READMODE_BYTE | PIPE_WAIT,
                PIPE_UNLIMITED_INSTANCES,
                512,
                512,
                0,
                None,
            )
        };

        if handle == INVALID_HANDLE_VALUE {
            return Err(io::Error::last_os_error());
        }

        Ok(Self { handle })
    }

    /// Blocks until a client connects, then reads one command.
    pub fn accept_command(&self) -> io::Result<Command> {
        // SAFETY: ConnectNamedPipe blocks until a client connects.
        unsafe {
            ConnectNamedPipe(self.handle, None)?;
        }

        let reader = duplicate_handle_as_file(self.handle)?;
        let mut line = String::new();
        BufReader::new(reader).read_line(&mut line)?;

        Ok(serde_json::from_str(line.trim())?)
    }

    /// Sends a response to the connected client and disconnects.
    pub fn send_response(&self, response: &Response) -> io::Result<()> {
        let mut writer = duplicate_handle_as_file(self.handle)?;
        writeln!(writer, "{}", serde_json::to_string(response)?)?;
        writer.flush()?;

        // SAFETY: FlushFileBuffers waits until the client has read
        // everything; DisconnectNamedPipe would otherwise drop unread data.
        unsafe {
            let _ = FlushFileBuffers(self.handle);
            DisconnectNamedPipe(self.handle)?;
        }

        Ok(())
    }
}

impl Drop for PipeServer {
    fn drop(&mut self) {
        // SAFETY: the server owns the pipe handle.
        unsafe {
            let _ = CloseHandle(self.handle);
        }
    }
}

/// RAII guard that closes a HANDLE on drop.
struct HandleGuard(HANDLE);

impl Drop for HandleGuard {
    fn drop(&mut self) {
        // SAFETY: the guard owns this handle exclusively.
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

/// Sends a command to the daemon and waits for its response.
///
/// This is the CLI (client) side.
pub fn send_command(command: &Command) -> io::Result<Response> {
    let pipe_name = HSTRING::from(PIPE_NAME);

    // SAFETY: CreateFileW opens an existing named pipe as a client.
    let handle = unsafe {
        CreateFileW(
            &pipe_name,
            GENERIC_READ_WRITE,
            FILE_SHARE_NONE,
            None,
            OPEN_EXISTING,
            Default::default(),
            None,
        )?
    };
    let _guard = HandleGuard(handle);

    let mut writer = duplicate_handle_as_file(handle)?;
    writeln!(writer, "{}", serde_json::to_string(command)?)?;
    writer.flush()?;

    let reader = duplicate_handle_as_file(handle)?;
    let mut line = String::new();
    if BufReader::new(reader).read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "daemon closed the connection without replying",
        ));
    }

    Ok(serde_json::from_str(line.trim())?)
}

/// Checks whether the daemon's pipe exists without consuming a connection.
pub fn is_daemon_running() -> bool {
    let pipe_name = HSTRING::from(PIPE_NAME);

    // SAFETY: WaitNamedPipeW with a 1 ms timeout returns almost immediately.
    unsafe { WaitNamedPipeW(&pipe_name, 1).as_bool() }
}

/// Duplicates a HANDLE and wraps it as a `std::fs::File`.
///
/// The original handle and the File are closed independently.
fn duplicate_handle_as_file(handle: HANDLE) -> io::Result<std::fs::File> {
    let mut dup = HANDLE::default();

    // SAFETY: the duplicate is owned by the returned File.
    unsafe {
        DuplicateHandle(
            GetCurrentProcess(),
            handle,
            GetCurrentProcess(),
            &mut dup,
            0,
            false,
            DUPLICATE_SAME_ACCESS,
        )?;

        Ok(std::fs::File::from_raw_handle(dup.0))
    }
}
