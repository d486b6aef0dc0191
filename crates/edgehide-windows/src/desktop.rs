use edgehide_core::{Desktop, PlatformError, Point, Rect, ScreenSize, WindowResult};

use windows::Win32::Foundation::{HWND, POINT, RECT};
use windows::Win32::UI::HiDpi::{
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, SetProcessDpiAwarenessContext,
};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    INPUT, INPUT_0, INPUT_KEYBOARD, KEYBD_EVENT_FLAGS, KEYBDINPUT, KEYEVENTF_KEYUP, SendInput,
    VIRTUAL_KEY,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GA_ROOT, GetAncestor, GetCursorPos, GetSystemMetrics, GetWindowRect, GetWindowTextLengthW,
    GetWindowTextW, HWND_NOTOPMOST, HWND_TOPMOST, IsIconic, IsWindow, MoveWindow, SM_CXSCREEN,
    SM_CYSCREEN, SW_RESTORE, SWP_NOMOVE, SWP_NOSIZE, SWP_SHOWWINDOW, SetForegroundWindow,
    SetWindowPos, ShowWindow, WindowFromPoint,
};

/// `Desktop` backed by user32.
///
/// Handles are raw `HWND` values stored as `usize` so the core crate
/// never depends on the `windows` crate.
#[derive(Debug, Default)]
pub struct Win32Desktop;

impl Win32Desktop {
    /// Creates the desktop and declares the process per-monitor DPI aware.
    ///
    /// Without DPI awareness Windows scales coordinates by the primary
    /// monitor's DPI, and window rectangles would disagree with the
    /// screen metrics used for edge detection.
    pub fn new() -> Self {
        // SAFETY: called once at startup; fails harmlessly if a manifest
        // already set the awareness.
        unsafe {
            let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
        }
        Self
    }
}

fn hwnd(handle: usize) -> HWND {
    HWND(handle as *mut _)
}

impl Desktop for Win32Desktop {
    fn is_window(&self, handle: usize) -> bool {
        // SAFETY: IsWindow accepts any value, including stale handles.
        unsafe { IsWindow(Some(hwnd(handle))).as_bool() }
    }

    fn window_rect(&self, handle: usize) -> WindowResult<Rect> {
        let mut rect = RECT::default();

        // SAFETY: GetWindowRect writes into a stack RECT and fails for
        // an invalid handle.
        unsafe { GetWindowRect(hwnd(handle), &mut rect) }
            .map_err(|e| PlatformError::call("GetWindowRect", e))?;

        Ok(Rect::from_edges(
            rect.left,
            rect.top,
            rect.right,
            rect.bottom,
        ))
    }

    fn window_title(&self, handle: usize) -> WindowResult<String> {
        // SAFETY: GetWindowTextLengthW and GetWindowTextW only read window text.
        unsafe {
            let length = GetWindowTextLengthW(hwnd(handle));
            if length == 0 {
                return Ok(String::new());
            }

            // +1 for the null terminator
            let mut buffer = vec![0u16; (length + 1) as usize];
            let copied = GetWindowTextW(hwnd(handle), &mut buffer);
            Ok(String::from_utf16_lossy(&buffer[..copied as usize]))
        }
    }

    fn window_from_point(&self, point: Point) -> Option<usize> {
        let point = POINT {
            x: point.x,
            y: point.y,
        };

        // SAFETY: both calls are pure queries. A click usually lands on a
        // child control, so walk up to the top-level window.
        let target = unsafe {
            let child = WindowFromPoint(point);
            if child.is_invalid() {
                return None;
            }
            let root = GetAncestor(child, GA_ROOT);
            if root.is_invalid() { child } else { root }
        };

        Some(target.0 as usize)
    }

    fn move_window(&self, handle: usize, rect: &Rect) -> WindowResult<()> {
        // SAFETY: MoveWindow fails cleanly for a handle that was closed.
        unsafe {
            MoveWindow(
                hwnd(handle),
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                true,
            )
        }
        .map_err(|e| PlatformError::call("MoveWindow", e))
    }

    fn restore(&self, handle: usize) -> WindowResult<()> {
        // SAFETY: IsIconic and ShowWindow are safe with any HWND value.
        // ShowWindow reports the previous visibility, not an error.
        unsafe {
            if IsIconic(hwnd(handle)).as_bool() {
                let _ = ShowWindow(hwnd(handle), SW_RESTORE);
            }
        }
        Ok(())
    }

    fn set_topmost(&self, handle: usize, topmost: bool) -> WindowResult<()> {
        let insert_after = if topmost { HWND_TOPMOST } else { HWND_NOTOPMOST };

        // SAFETY: SetWindowPos only changes z-order here (no move, no size).
        unsafe {
            SetWindowPos(
                hwnd(handle),
                Some(insert_after),
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_SHOWWINDOW,
            )
        }
        .map_err(|e| PlatformError::call("SetWindowPos", e))
    }

    fn set_foreground(&self, handle: usize) -> WindowResult<()> {
        // SAFETY: SetForegroundWindow returns FALSE when the OS refuses.
        if unsafe { SetForegroundWindow(hwnd(handle)) }.as_bool() {
            Ok(())
        } else {
            Err(PlatformError::call(
                "SetForegroundWindow",
                "request refused by the system",
            ))
        }
    }

    fn nudge_input(&self) -> WindowResult<()> {
        // A key-down/key-up pair for virtual key 0. Windows treats the
        // caller as having received the last input event, which lifts the
        // foreground lock for the following SetForegroundWindow.
        let key = |flags: KEYBD_EVENT_FLAGS| INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VIRTUAL_KEY(0),
                    wScan: 0,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        };
        let inputs = [key(KEYBD_EVENT_FLAGS(0)), key(KEYEVENTF_KEYUP)];

        // SAFETY: SendInput reads the slice; cbsize is the size of one INPUT.
        let sent = unsafe { SendInput(&inputs, std::mem::size_of::<INPUT>() as i32) };
        if sent as usize == inputs.len() {
            Ok(())
        } else {
            Err(PlatformError::call("SendInput", "input was blocked"))
        }
    }

    fn cursor_pos(&self) -> WindowResult<Point> {
        let mut point = POINT::default();

        // SAFETY: GetCursorPos writes into a stack POINT.
        unsafe { GetCursorPos(&mut point) }.map_err(|e| PlatformError::call("GetCursorPos", e))?;
        Ok(Point::new(point.x, point.y))
    }

    fn primary_screen_size(&self) -> WindowResult<ScreenSize> {
        // SAFETY: GetSystemMetrics is a pure query; 0 means failure.
        let (width, height) =
            unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };

        if width <= 0 || height <= 0 {
            return Err(PlatformError::call(
                "GetSystemMetrics",
                "primary screen size unavailable",
            ));
        }
        Ok(ScreenSize::new(width, height))
    }
}
