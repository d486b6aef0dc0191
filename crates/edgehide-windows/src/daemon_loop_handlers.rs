use std::time::Instant;

use edgehide_core::ipc::{Command, Response};
use edgehide_core::{PickOutcome, Point};

use crate::hook::MouseHook;
use crate::tray::{REVERT_TIMER, TrayEvent};

use super::daemon_loop::Daemon;
use super::daemon_types::{ArmError, Flow};

impl Daemon {
    pub(super) fn handle_tray_event(&mut self, event: TrayEvent) -> Flow {
        match event {
            TrayEvent::Tick => {
                self.engine.tick(&self.desktop, Instant::now());
            }
            TrayEvent::RevertDue => {
                self.tray.stop_timer(REVERT_TIMER);
                self.revert_due = None;
                self.engine.run_deferred(&self.desktop, Instant::now());
            }
            TrayEvent::Wake => {}
            TrayEvent::Pick => {
                if let Err(e) = self.arm_picker() {
                    self.tray.notify(&e.to_string());
                }
            }
            TrayEvent::Clear => {
                self.clear();
            }
            TrayEvent::Quit => {
                edgehide_core::log_info!("Quit selected from the tray, shutting down");
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    pub(super) fn handle_command(&mut self, command: Command) -> (Response, Flow) {
        let response = match command {
            Command::Stop => {
                edgehide_core::log_info!("Stop command received, shutting down");
                return (Response::ok_with_message("Daemon stopping"), Flow::Stop);
            }
            Command::Status => Response::ok_with_message(self.status_message()),
            Command::Pick => match self.arm_picker() {
                Ok(()) => Response::ok_with_message("Click the window to edge-hide"),
                Err(e) => Response::error(e.to_string()),
            },
            Command::CancelPick => {
                if self.cancel_pick() {
                    Response::ok_with_message("Selection cancelled")
                } else {
                    Response::error("No selection in progress")
                }
            }
            Command::List => Response::ok().with_windows(self.engine.entries()),
            Command::Remove { hwnd } => match self.engine.release(&self.desktop, hwnd) {
                Ok(true) => Response::ok_with_message(format!("Stopped tracking 0x{hwnd:X}")),
                Ok(false) => Response::error(format!("Window 0x{hwnd:X} is not tracked")),
                Err(e) => Response::ok_with_message(format!(
                    "Stopped tracking 0x{hwnd:X}, but could not bring it back: {e}"
                )),
            },
            Command::Clear => Response::ok_with_message(self.clear()),
        };
        (response, Flow::Continue)
    }

    /// Releases every tracked window and describes the result.
    fn clear(&mut self) -> String {
        let count = self.engine.len();
        let failures = self.engine.release_all(&self.desktop);
        edgehide_core::log_info!("Cleared {count} tracked windows");

        if failures.is_empty() {
            format!("Stopped tracking {count} windows")
        } else {
            format!(
                "Stopped tracking {count} windows; {} could not be brought back",
                failures.len()
            )
        }
    }

    fn status_message(&self) -> String {
        let mut message = format!(
            "Daemon is running, tracking {} windows ({} hidden)",
            self.engine.len(),
            self.engine.hidden_count()
        );
        if self.picker.is_armed() {
            message.push_str("; waiting for a click");
        }
        if !self.license.as_ref().is_some_and(|g| g.is_authorized()) {
            message.push_str("; activation required");
        }
        message
    }

    /// Checks activation, arms the picker and installs the mouse hook.
    ///
    /// The activation file is re-read first so a code entered through
    /// the CLI takes effect without a restart.
    fn arm_picker(&mut self) -> Result<(), ArmError> {
        let Some(gate) = self.license.as_mut() else {
            return Err(ArmError::NoFingerprint);
        };
        gate.refresh();
        if !gate.is_authorized() {
            return Err(ArmError::Unlicensed {
                fingerprint: gate.fingerprint().to_string(),
            });
        }

        self.picker.arm()?;
        match MouseHook::install(self.pick_tx.clone(), self.tray.handle()) {
            Ok(hook) => {
                self.hook = Some(hook);
                edgehide_core::log_info!("Waiting for a click to pick a window");
                Ok(())
            }
            Err(e) => {
                self.picker.cancel();
                edgehide_core::log_error!("Mouse hook failed: {e}");
                Err(ArmError::Hook(e))
            }
        }
    }

    fn cancel_pick(&mut self) -> bool {
        self.hook = None;
        self.picker.cancel()
    }

    pub(super) fn handle_pick(&mut self, point: Point) {
        self.hook = None;

        match self
            .picker
            .complete(point, &self.desktop, &mut self.engine)
        {
            Ok(PickOutcome::Added { .. }) => {}
            Ok(PickOutcome::AlreadyTracked { hwnd }) => {
                edgehide_core::log_info!("Window 0x{hwnd:X} is already tracked");
            }
            Ok(PickOutcome::NoWindow) => {
                edgehide_core::log_info!("No window under the click at ({}, {})", point.x, point.y);
            }
            Err(e) => edgehide_core::log_debug!("Ignoring click: {e}"),
        }
    }
}
