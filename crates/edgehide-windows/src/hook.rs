use std::cell::RefCell;
use std::sync::mpsc::Sender;

use edgehide_core::{PlatformError, Point, WindowResult};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, HC_ACTION, HHOOK, MSLLHOOKSTRUCT, PostMessageW, SetWindowsHookExW,
    UnhookWindowsHookEx, WH_MOUSE_LL, WM_APP, WM_LBUTTONDOWN,
};

/// Posted to the notify window after a click point has been sent.
///
/// Low-level hook callbacks run inside message retrieval without
/// producing a message, so the daemon needs this to drain the channel.
/// It targets a window rather than the thread so that modal loops
/// (menus, message boxes) dispatch it too.
pub const WM_PICKED: u32 = WM_APP + 2;

/// Where the hook callback reports the click.
struct PickTarget {
    sender: Sender<Point>,
    notify: usize,
}

// Thread-local target for the hook callback. Low-level hooks are called
// on the installing thread, so the callback always finds it here.
thread_local! {
    static PICK_TARGET: RefCell<Option<PickTarget>> = const { RefCell::new(None) };
}

/// A global low-level mouse hook that reports the next primary click.
///
/// The hook is removed when this guard is dropped, so it is uninstalled
/// exactly once on every path. Clicks are never swallowed.
pub struct MouseHook {
    hook: HHOOK,
}

impl MouseHook {
    /// Installs the hook on the current thread, which must pump messages.
    ///
    /// At most one point is sent per installation, followed by a
    /// `WM_PICKED` posted to the `notify` window.
    pub fn install(sender: Sender<Point>, notify: usize) -> WindowResult<Self> {
        PICK_TARGET.with(|cell| *cell.borrow_mut() = Some(PickTarget { sender, notify }));

        // SAFETY: the callback is a plain function with the LowLevelMouseProc
        // signature, and the module handle is this executable.
        let hook = unsafe {
            GetModuleHandleW(None).and_then(|module| {
                SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_proc), Some(module.into()), 0)
            })
        };

        match hook {
            Ok(hook) => {
                edgehide_core::log_debug!("Mouse hook installed");
                Ok(Self { hook })
            }
            Err(e) => {
                clear_target();
                Err(PlatformError::call("SetWindowsHookExW", e))
            }
        }
    }
}

impl Drop for MouseHook {
    fn drop(&mut self) {
        // SAFETY: the guard owns the hook handle exclusively.
        unsafe {
            let _ = UnhookWindowsHookEx(self.hook);
        }
        clear_target();
        edgehide_core::log_debug!("Mouse hook removed");
    }
}

fn clear_target() {
    PICK_TARGET.with(|cell| cell.borrow_mut().take());
}

/// The LowLevelMouseProc callback.
///
/// Takes the target on the first button-down so later clicks before the
/// guard is dropped are ignored. Always chains to the next hook.
unsafe extern "system" fn mouse_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HC_ACTION as i32 && wparam.0 as u32 == WM_LBUTTONDOWN {
        // SAFETY: for WH_MOUSE_LL with HC_ACTION, lparam points to an
        // MSLLHOOKSTRUCT valid for the duration of the call.
        let info = unsafe { &*(lparam.0 as *const MSLLHOOKSTRUCT) };
        let point = Point::new(info.pt.x, info.pt.y);

        if let Some(target) = PICK_TARGET.with(|cell| cell.borrow_mut().take()) {
            let _ = target.sender.send(point);
            // SAFETY: posting to a window owned by this thread.
            unsafe {
                let _ = PostMessageW(
                    Some(HWND(target.notify as *mut _)),
                    WM_PICKED,
                    WPARAM(0),
                    LPARAM(0),
                );
            }
        }
    }

    // SAFETY: forwarding the unchanged arguments.
    unsafe { CallNextHookEx(None, code, wparam, lparam) }
}
