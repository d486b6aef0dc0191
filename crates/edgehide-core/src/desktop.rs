use crate::{Point, Rect, ScreenSize, WindowResult};

/// Window-manager queries and commands the engine depends on.
///
/// Each platform crate (e.g. `edgehide-windows`) provides its own
/// implementation. Every call is synchronous and may fail for a handle
/// whose window was closed since it was last seen.
pub trait Desktop {
    /// Returns whether `hwnd` still denotes a live window.
    fn is_window(&self, hwnd: usize) -> bool;

    /// Returns the window's bounding rectangle in screen coordinates.
    fn window_rect(&self, hwnd: usize) -> WindowResult<Rect>;

    /// Returns the window title.
    fn window_title(&self, hwnd: usize) -> WindowResult<String>;

    /// Returns the top-level window under `point`, if any.
    fn window_from_point(&self, point: Point) -> Option<usize>;

    /// Moves and sizes the window to `rect`.
    fn move_window(&self, hwnd: usize, rect: &Rect) -> WindowResult<()>;

    /// Restores the window if it is minimized.
    fn restore(&self, hwnd: usize) -> WindowResult<()>;

    /// Places the window in (or removes it from) the topmost z-order band.
    fn set_topmost(&self, hwnd: usize, topmost: bool) -> WindowResult<()>;

    /// Asks the OS to make the window the foreground window.
    fn set_foreground(&self, hwnd: usize) -> WindowResult<()>;

    /// Synthesizes a no-op key press so the next foreground request is honoured.
    fn nudge_input(&self) -> WindowResult<()>;

    /// Returns the current cursor position.
    fn cursor_pos(&self) -> WindowResult<Point>;

    /// Returns the size of the primary display.
    fn primary_screen_size(&self) -> WindowResult<ScreenSize>;
}
