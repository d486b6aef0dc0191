use std::sync::mpsc;
use std::thread;

use edgehide_core::ipc::Command;

use crate::ipc::PipeServer;
use crate::tray;

use super::daemon_types::{IpcRequest, ResponseSender};

/// Spawns the IPC listener thread.
///
/// `wake` is the tray window handle; it is posted to after each forwarded
/// command so the message pump picks the request up.
pub(super) fn spawn_ipc_listener(
    tx: mpsc::Sender<IpcRequest>,
    wake: usize,
) -> thread::JoinHandle<()> {
    thread::spawn(move || ipc_loop(tx, wake))
}

/// Accepts IPC connections in a loop and forwards commands to the
/// daemon thread.
fn ipc_loop(tx: mpsc::Sender<IpcRequest>, wake: usize) {
    loop {
        let server = match PipeServer::create() {
            Ok(s) => s,
            Err(e) => {
                edgehide_core::log_error!("Failed to create pipe: {e}");
                return;
            }
        };

        let command = match server.accept_command() {
            Ok(cmd) => cmd,
            Err(e) => {
                edgehide_core::log_warn!("Error reading command: {e}");
                continue;
            }
        };
        edgehide_core::log_debug!("IPC command: {command:?}");

        let (reply_tx, reply_rx): (ResponseSender, _) = mpsc::channel();
        let is_stop = matches!(command, Command::Stop);

        let request = IpcRequest {
            command,
            reply: reply_tx,
        };
        if tx.send(request).is_err() {
            return;
        }
        tray::post_wake(wake);

        if let Ok(response) = reply_rx.recv()
            && let Err(e) = server.send_response(&response)
        {
            edgehide_core::log_warn!("Error sending response: {e}");
        }

        if is_stop {
            return;
        }
    }
}
