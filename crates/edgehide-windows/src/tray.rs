use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use edgehide_core::{PlatformError, WindowResult};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, POINT, RECT, WPARAM};
use windows::Win32::UI::Shell::{
    NIF_ICON, NIF_MESSAGE, NIF_TIP, NIM_ADD, NIM_DELETE, NIM_MODIFY, NOTIFYICONDATAW,
    Shell_NotifyIconW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreatePopupMenu, CreateWindowExW, DefWindowProcW, DestroyMenu, DestroyWindow,
    GetCursorPos, IDI_APPLICATION, KillTimer, LoadIconW, MB_ICONINFORMATION, MB_OK, MF_GRAYED,
    MF_SEPARATOR, MF_STRING, MessageBoxW, PostMessageW, RegisterClassW, SetForegroundWindow,
    SetTimer, TPM_BOTTOMALIGN, TPM_NONOTIFY, TPM_RETURNCMD, TPM_RIGHTALIGN, TrackPopupMenu,
    WM_APP, WM_CONTEXTMENU, WM_LBUTTONDBLCLK, WM_NULL, WM_RBUTTONUP, WM_TIMER, WNDCLASSW,
    WS_EX_TOOLWINDOW,
};
use windows::core::{HSTRING, PCWSTR, w};

use crate::hook::WM_PICKED;

/// Posted by the IPC thread when a command is waiting in the channel.
pub const WM_WAKE: u32 = WM_APP + 1;

/// Shell callback message for icon clicks.
const WM_TRAYICON: u32 = WM_APP + 3;

/// Timer driving the monitoring tick.
pub const TICK_TIMER: usize = 1;

/// One-shot timer for the next deferred topmost revert.
pub const REVERT_TIMER: usize = 2;

const TRAY_UID: u32 = 1;

const IDM_STATUS: usize = 100;
const IDM_PICK: usize = 101;
const IDM_CLEAR: usize = 102;
const IDM_QUIT: usize = 103;

/// Something the tray window observed, for the daemon to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayEvent {
    Tick,
    RevertDue,
    /// An IPC command or a picked point is waiting in a channel.
    Wake,
    Pick,
    Clear,
    Quit,
}

// The window procedure records events and then runs HANDLER, which
// drains them. This also happens inside modal loops (menus, message
// boxes), so the daemon keeps working while one is open. STATUS is the
// menu's first (disabled) line.
thread_local! {
    static EVENTS: RefCell<VecDeque<TrayEvent>> = const { RefCell::new(VecDeque::new()) };
    static HANDLER: Cell<Option<fn()>> = const { Cell::new(None) };
    static STATUS: RefCell<String> = const { RefCell::new(String::new()) };
    static NOTICES: RefCell<VecDeque<String>> = const { RefCell::new(VecDeque::new()) };
    static SHOWING_NOTICE: Cell<bool> = const { Cell::new(false) };
}

/// Takes every event recorded since the last call.
pub fn take_events() -> Vec<TrayEvent> {
    EVENTS.with(|cell| cell.borrow_mut().drain(..).collect())
}

/// Sets the function the window procedure calls after recording events.
pub fn set_handler(handler: Option<fn()>) {
    HANDLER.with(|cell| cell.set(handler));
}

/// Records an event unless an identical one is already waiting.
///
/// Ticks that pile up while the handler cannot run collapse into one.
fn push(event: TrayEvent) {
    EVENTS.with(|cell| {
        let mut queue = cell.borrow_mut();
        if !queue.contains(&event) {
            queue.push_back(event);
        }
    });
}

fn run_handler() {
    if let Some(handler) = HANDLER.with(Cell::get) {
        handler();
    }
}

/// Shows queued notices one after another in message boxes.
///
/// Runs at the end of the window procedure, outside the handler. A
/// notice queued while a box is open is shown when that box closes.
fn show_notices(hwnd: HWND) {
    if SHOWING_NOTICE.with(|flag| flag.replace(true)) {
        return;
    }
    while let Some(text) = NOTICES.with(|cell| cell.borrow_mut().pop_front()) {
        // SAFETY: MessageBoxW runs a nested modal loop; messages it
        // dispatches to the tray window go through the handler as usual.
        unsafe {
            let _ = MessageBoxW(
                Some(hwnd),
                &HSTRING::from(text),
                w!("edgehide"),
                MB_OK | MB_ICONINFORMATION,
            );
        }
    }
    SHOWING_NOTICE.with(|flag| flag.set(false));
}

/// The notification-area icon and the hidden window that owns it.
///
/// The window also owns the daemon's timers. Dropping the tray removes
/// the icon and destroys the window.
pub struct Tray {
    hwnd: HWND,
}

impl Tray {
    /// Creates the hidden owner window and adds the icon.
    pub fn create() -> WindowResult<Self> {
        let class_name = w!("EdgehideTray");

        // SAFETY: registering a class with a static name and a valid
        // window procedure.
        unsafe {
            let wc = WNDCLASSW {
                lpfnWndProc: Some(tray_proc),
                lpszClassName: class_name,
                ..Default::default()
            };
            if RegisterClassW(&wc) == 0 {
                return Err(PlatformError::call(
                    "RegisterClassW",
                    "could not register the tray window class",
                ));
            }
        }

        // WS_EX_TOOLWINDOW: no taskbar entry. No WS_VISIBLE: stays hidden.
        //
        // SAFETY: the class was registered above on this thread.
        let hwnd = unsafe {
            CreateWindowExW(
                WS_EX_TOOLWINDOW,
                class_name,
                w!("edgehide"),
                Default::default(),
                0,
                0,
                0,
                0,
                None,
                None,
                None,
                None,
            )
        }
        .map_err(|e| PlatformError::call("CreateWindowExW", e))?;

        let tray = Self { hwnd };
        let mut nid = tray.icon_data();
        nid.uFlags = NIF_MESSAGE | NIF_TIP | NIF_ICON;
        nid.uCallbackMessage = WM_TRAYICON;
        // SAFETY: LoadIconW with a null instance loads a stock icon.
        nid.hIcon = unsafe { LoadIconW(None, IDI_APPLICATION) }.unwrap_or_default();
        copy_tip(&mut nid, "edgehide");

        // SAFETY: nid is fully initialized for NIM_ADD.
        if !unsafe { Shell_NotifyIconW(NIM_ADD, &nid) }.as_bool() {
            return Err(PlatformError::call(
                "Shell_NotifyIconW",
                "could not add the notification icon",
            ));
        }

        Ok(tray)
    }

    /// Raw handle of the owner window, for posting from other threads.
    pub fn handle(&self) -> usize {
        self.hwnd.0 as usize
    }

    /// Updates the tooltip and the status line of the menu.
    pub fn set_status(&self, text: &str) {
        STATUS.with(|cell| *cell.borrow_mut() = text.to_string());

        let mut nid = self.icon_data();
        nid.uFlags = NIF_TIP;
        copy_tip(&mut nid, text);

        // SAFETY: modifies only the tooltip of our own icon.
        unsafe {
            let _ = Shell_NotifyIconW(NIM_MODIFY, &nid);
        }
    }

    /// Starts (or restarts) a timer on the owner window.
    pub fn start_timer(&self, id: usize, interval_ms: u32) -> WindowResult<()> {
        // SAFETY: SetTimer with our own window; an existing timer with
        // the same id is replaced.
        let result = unsafe { SetTimer(Some(self.hwnd), id, interval_ms.max(1), None) };
        if result == 0 {
            return Err(PlatformError::call("SetTimer", format!("timer {id}")));
        }
        Ok(())
    }

    pub fn stop_timer(&self, id: usize) {
        // SAFETY: killing a timer that does not exist is harmless.
        unsafe {
            let _ = KillTimer(Some(self.hwnd), id);
        }
    }

    /// Queues a message box owned by the tray window.
    ///
    /// The box opens once the current handler run returns.
    pub fn notify(&self, text: &str) {
        NOTICES.with(|cell| cell.borrow_mut().push_back(text.to_string()));
    }

    fn icon_data(&self) -> NOTIFYICONDATAW {
        NOTIFYICONDATAW {
            cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
            hWnd: self.hwnd,
            uID: TRAY_UID,
            ..Default::default()
        }
    }
}

impl Drop for Tray {
    fn drop(&mut self) {
        let nid = self.icon_data();

        // SAFETY: removing our own icon and destroying our own window.
        unsafe {
            let _ = KillTimer(Some(self.hwnd), TICK_TIMER);
            let _ = KillTimer(Some(self.hwnd), REVERT_TIMER);
            let _ = Shell_NotifyIconW(NIM_DELETE, &nid);
            let _ = DestroyWindow(self.hwnd);
        }
    }
}

/// Wakes the daemon thread from another thread.
pub fn post_wake(handle: usize) {
    // SAFETY: PostMessageW to a window that may already be gone just fails.
    unsafe {
        let _ = PostMessageW(
            Some(HWND(handle as *mut _)),
            WM_WAKE,
            WPARAM(0),
            LPARAM(0),
        );
    }
}

/// Copies `text` into the tooltip buffer, truncating and null-terminating.
fn copy_tip(nid: &mut NOTIFYICONDATAW, text: &str) {
    let capacity = nid.szTip.len() - 1;
    let wide: Vec<u16> = text.encode_utf16().take(capacity).collect();
    nid.szTip = [0; 128];
    nid.szTip[..wide.len()].copy_from_slice(&wide);
}

/// Shows the context menu at the cursor and returns the chosen event.
fn show_menu(hwnd: HWND) -> Option<TrayEvent> {
    let status = STATUS.with(|cell| cell.borrow().clone());

    // SAFETY: the menu is created, shown and destroyed within this call.
    unsafe {
        let menu = CreatePopupMenu().ok()?;
        let _ = AppendMenuW(menu, MF_STRING | MF_GRAYED, IDM_STATUS, &HSTRING::from(status));
        let _ = AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null());
        let _ = AppendMenuW(menu, MF_STRING, IDM_PICK, w!("Pick window"));
        let _ = AppendMenuW(menu, MF_STRING, IDM_CLEAR, w!("Clear all"));
        let _ = AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null());
        let _ = AppendMenuW(menu, MF_STRING, IDM_QUIT, w!("Quit"));

        let mut pt = POINT::default();
        let _ = GetCursorPos(&mut pt);

        // The owner must be foreground or the menu will not close when
        // the user clicks elsewhere.
        let _ = SetForegroundWindow(hwnd);
        let chosen = TrackPopupMenu(
            menu,
            TPM_RIGHTALIGN | TPM_BOTTOMALIGN | TPM_RETURNCMD | TPM_NONOTIFY,
            pt.x,
            pt.y,
            Some(0),
            hwnd,
            None::<*const RECT>,
        );
        let _ = PostMessageW(Some(hwnd), WM_NULL, WPARAM(0), LPARAM(0));
        let _ = DestroyMenu(menu);

        match chosen.0 as usize {
            IDM_PICK => Some(TrayEvent::Pick),
            IDM_CLEAR => Some(TrayEvent::Clear),
            IDM_QUIT => Some(TrayEvent::Quit),
            _ => None,
        }
    }
}

/// WNDPROC for the tray window.
unsafe extern "system" fn tray_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_TIMER if wparam.0 == TICK_TIMER => push(TrayEvent::Tick),
        WM_TIMER if wparam.0 == REVERT_TIMER => push(TrayEvent::RevertDue),
        WM_WAKE | WM_PICKED => push(TrayEvent::Wake),
        WM_TRAYICON => match lparam.0 as u32 & 0xFFFF {
            WM_LBUTTONDBLCLK => push(TrayEvent::Pick),
            WM_RBUTTONUP | WM_CONTEXTMENU => {
                if let Some(event) = show_menu(hwnd) {
                    push(event);
                }
            }
            _ => {}
        },
        _ => return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
    run_handler();
    show_notices(hwnd);
    LRESULT(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_events_collapse_while_waiting() {
        push(TrayEvent::Tick);
        push(TrayEvent::Tick);
        push(TrayEvent::Wake);
        push(TrayEvent::Tick);
        push(TrayEvent::RevertDue);

        assert_eq!(
            take_events(),
            vec![TrayEvent::Tick, TrayEvent::Wake, TrayEvent::RevertDue]
        );
        assert!(take_events().is_empty());
    }

    #[test]
    fn events_queue_again_after_being_taken() {
        push(TrayEvent::Tick);
        assert_eq!(take_events(), vec![TrayEvent::Tick]);

        push(TrayEvent::Tick);
        assert_eq!(take_events(), vec![TrayEvent::Tick]);
    }

    thread_local! {
        static DRAINED: RefCell<Vec<TrayEvent>> = const { RefCell::new(Vec::new()) };
    }

    fn record_events() {
        DRAINED.with(|cell| cell.borrow_mut().extend(take_events()));
    }

    #[test]
    fn handler_drains_recorded_events() {
        set_handler(Some(record_events));
        push(TrayEvent::Tick);
        run_handler();

        set_handler(None);
        push(TrayEvent::Wake);
        run_handler();

        assert_eq!(DRAINED.with(|cell| cell.borrow().clone()), vec![TrayEvent::Tick]);
        assert_eq!(take_events(), vec![TrayEvent::Wake]);
    }
}
