use std::cell::{Cell, RefCell};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use edgehide_core::config;
use edgehide_core::{EdgeHideEngine, LicenseGate, Point, WindowPicker, WindowResult};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, MSG, PostQuitMessage, TranslateMessage,
};

use crate::desktop::Win32Desktop;
use crate::hook::MouseHook;
use crate::tray::{self, REVERT_TIMER, TICK_TIMER, Tray};

use super::daemon_ipc;
use super::daemon_types::{Flow, IpcRequest};

/// Everything the daemon thread owns.
pub(super) struct Daemon {
    pub(super) desktop: Win32Desktop,
    pub(super) engine: EdgeHideEngine,
    pub(super) picker: WindowPicker,
    /// Installed only while the picker is armed.
    pub(super) hook: Option<MouseHook>,
    pub(super) pick_tx: mpsc::Sender<Point>,
    pick_rx: mpsc::Receiver<Point>,
    ipc_rx: mpsc::Receiver<IpcRequest>,
    /// `None` when the machine fingerprint is unavailable.
    pub(super) license: Option<LicenseGate>,
    pub(super) tray: Tray,
    /// Deadline the revert timer is currently armed for.
    pub(super) revert_due: Option<Instant>,
    /// Engine revision and picker state last shown in the tray.
    shown: Option<(u64, bool)>,
}

// The daemon lives here while the pump runs so the tray window procedure
// can reach it, including from inside modal loops. EXIT records why the
// pump was asked to stop.
thread_local! {
    static DAEMON: RefCell<Option<Daemon>> = const { RefCell::new(None) };
    static EXIT: Cell<Option<Flow>> = const { Cell::new(None) };
}

/// Tray handler: processes whatever is queued.
///
/// A call that arrives while the daemon is already busy further up the
/// stack leaves the events queued for the next one.
fn drain() {
    if EXIT.with(Cell::get).is_some() {
        return;
    }

    let flow = DAEMON.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => slot.as_mut().map_or(Flow::Continue, Daemon::process_pending),
        Err(_) => Flow::Continue,
    });

    if flow != Flow::Continue {
        EXIT.with(|exit| exit.set(Some(flow)));
        // SAFETY: posts WM_QUIT to this thread's queue.
        unsafe { PostQuitMessage(0) };
    }
}

/// The inner daemon loop, separated so cleanup always runs in `run()`.
pub(super) fn daemon_loop() -> WindowResult<()> {
    let config = config::load();
    edgehide_core::log::init(&config.logging);

    edgehide_core::log_info!("Daemon started (PID: {})", std::process::id());
    edgehide_core::log_info!(
        "Config: edge(sensitivity={}, trigger_width={}, sliver={}), tick={}ms, topmost_revert={}ms, log_level={}",
        config.edge.sensitivity,
        config.edge.trigger_width,
        config.edge.sliver,
        config.timing.tick_ms,
        config.timing.topmost_revert_ms,
        config.logging.level
    );

    // DPI awareness must be declared before the tray window exists.
    let desktop = Win32Desktop::new();
    let tray = Tray::create()?;
    tray.start_timer(TICK_TIMER, config.timing.tick_ms)?;

    let license = match LicenseGate::open() {
        Ok(gate) => {
            edgehide_core::log_info!(
                "Activation {}",
                if gate.is_authorized() { "valid" } else { "required" }
            );
            Some(gate)
        }
        Err(e) => {
            edgehide_core::log_warn!("{e}");
            None
        }
    };

    let (ipc_tx, ipc_rx) = mpsc::channel();
    let ipc_thread = daemon_ipc::spawn_ipc_listener(ipc_tx, tray.handle());
    let (pick_tx, pick_rx) = mpsc::channel();

    let daemon = Daemon {
        desktop,
        engine: EdgeHideEngine::new(
            config.edge,
            Duration::from_millis(config.timing.topmost_revert_ms.into()),
        ),
        picker: WindowPicker::new(),
        hook: None,
        pick_tx,
        pick_rx,
        ipc_rx,
        license,
        tray,
        revert_due: None,
        shown: None,
    };
    DAEMON.with(|cell| *cell.borrow_mut() = Some(daemon));
    tray::set_handler(Some(drain));
    drain();

    let mut msg = MSG::default();
    while unsafe { GetMessageW(&mut msg, None, 0, 0).as_bool() } {
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    tray::set_handler(None);
    let flow = EXIT.with(|exit| exit.take()).unwrap_or(Flow::Quit);
    if let Some(mut daemon) = DAEMON.with(|cell| cell.borrow_mut().take()) {
        daemon.shutdown();
    }

    // After a tray quit the listener is still blocked waiting for a
    // client; it ends with the process.
    if flow == Flow::Stop {
        let _ = ipc_thread.join();
    }

    edgehide_core::log_info!("Daemon stopped");
    Ok(())
}

impl Daemon {
    /// Handles every queued tray event, IPC request and picked point.
    fn process_pending(&mut self) -> Flow {
        for event in tray::take_events() {
            let flow = self.handle_tray_event(event);
            if flow != Flow::Continue {
                return flow;
            }
        }

        while let Ok(request) = self.ipc_rx.try_recv() {
            let (response, flow) = self.handle_command(request.command);
            let _ = request.reply.send(response);
            if flow != Flow::Continue {
                return flow;
            }
        }

        while let Ok(point) = self.pick_rx.try_recv() {
            self.handle_pick(point);
        }

        self.sync_revert_timer();
        self.refresh_status();
        Flow::Continue
    }

    /// Arms the one-shot revert timer for the engine's next deadline.
    fn sync_revert_timer(&mut self) {
        let next = self.engine.next_deadline();
        if next == self.revert_due {
            return;
        }
        self.revert_due = next;

        match next {
            Some(due) => {
                let wait = due.saturating_duration_since(Instant::now());
                let ms = u32::try_from(wait.as_millis()).unwrap_or(u32::MAX);
                if let Err(e) = self.tray.start_timer(REVERT_TIMER, ms) {
                    edgehide_core::log_warn!("Could not arm revert timer: {e}");
                }
            }
            None => self.tray.stop_timer(REVERT_TIMER),
        }
    }

    /// Redraws the tray tooltip when the tracked list or picker changed.
    fn refresh_status(&mut self) {
        let current = (self.engine.revision(), self.picker.is_armed());
        if self.shown == Some(current) {
            return;
        }
        self.shown = Some(current);

        let text = if self.picker.is_armed() {
            "edgehide: click a window to edge-hide".to_string()
        } else {
            format!(
                "edgehide: {} tracked, {} hidden",
                self.engine.len(),
                self.engine.hidden_count()
            )
        };
        self.tray.set_status(&text);
    }

    /// Removes the hook and puts every hidden window back on screen.
    fn shutdown(&mut self) {
        self.hook = None;
        self.picker.cancel();

        let count = self.engine.len();
        let failures = self.engine.release_all(&self.desktop);
        edgehide_core::log_info!(
            "Released {count} windows ({} could not be restored)",
            failures.len()
        );
    }
}
