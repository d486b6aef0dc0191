//! In-memory `Desktop` used by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};

use crate::{Desktop, PlatformError, Point, Rect, ScreenSize, WindowResult};

/// A platform command recorded by the fake, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Move(usize, Rect),
    Restore(usize),
    Topmost(usize, bool),
    Foreground(usize),
    Nudge,
}

#[derive(Debug, Clone)]
pub(crate) struct FakeWindow {
    pub(crate) rect: Rect,
    pub(crate) title: String,
}

pub(crate) struct FakeDesktop {
    pub(crate) windows: RefCell<BTreeMap<usize, FakeWindow>>,
    pub(crate) cursor: Cell<Point>,
    pub(crate) screen: ScreenSize,
    pub(crate) calls: RefCell<Vec<Call>>,
    /// Handles whose `window_rect` fails.
    pub(crate) broken_rects: RefCell<HashSet<usize>>,
    /// Handles whose `move_window` fails.
    pub(crate) broken_moves: RefCell<HashSet<usize>>,
    pub(crate) refuse_foreground: Cell<bool>,
}

impl FakeDesktop {
    pub(crate) fn new(width: i32, height: i32) -> Self {
        Self {
            windows: RefCell::new(BTreeMap::new()),
            cursor: Cell::new(Point::new(width / 2, height / 2)),
            screen: ScreenSize::new(width, height),
            calls: RefCell::new(Vec::new()),
            broken_rects: RefCell::new(HashSet::new()),
            broken_moves: RefCell::new(HashSet::new()),
            refuse_foreground: Cell::new(false),
        }
    }

    pub(crate) fn add(&self, hwnd: usize, rect: Rect, title: &str) {
        self.windows.borrow_mut().insert(
            hwnd,
            FakeWindow {
                rect,
                title: title.into(),
            },
        );
    }

    pub(crate) fn close(&self, hwnd: usize) {
        self.windows.borrow_mut().remove(&hwnd);
    }

    pub(crate) fn rect_of(&self, hwnd: usize) -> Rect {
        self.windows.borrow()[&hwnd].rect
    }

    pub(crate) fn set_cursor(&self, x: i32, y: i32) {
        self.cursor.set(Point::new(x, y));
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn live(&self, hwnd: usize) -> WindowResult<()> {
        if self.is_window(hwnd) {
            Ok(())
        } else {
            Err(PlatformError::StaleHandle(hwnd))
        }
    }
}

impl Desktop for FakeDesktop {
    fn is_window(&self, hwnd: usize) -> bool {
        self.windows.borrow().contains_key(&hwnd)
    }

    fn window_rect(&self, hwnd: usize) -> WindowResult<Rect> {
        self.live(hwnd)?;
        if self.broken_rects.borrow().contains(&hwnd) {
            return Err(PlatformError::call("GetWindowRect", "access denied"));
        }
        Ok(self.rect_of(hwnd))
    }

    fn window_title(&self, hwnd: usize) -> WindowResult<String> {
        self.live(hwnd)?;
        Ok(self.windows.borrow()[&hwnd].title.clone())
    }

    fn window_from_point(&self, point: Point) -> Option<usize> {
        self.windows
            .borrow()
            .iter()
            .find(|(_, w)| w.rect.contains(point))
            .map(|(&hwnd, _)| hwnd)
    }

    fn move_window(&self, hwnd: usize, rect: &Rect) -> WindowResult<()> {
        self.live(hwnd)?;
        if self.broken_moves.borrow().contains(&hwnd) {
            return Err(PlatformError::call("MoveWindow", "access denied"));
        }
        self.record(Call::Move(hwnd, *rect));
        if let Some(w) = self.windows.borrow_mut().get_mut(&hwnd) {
            w.rect = *rect;
        }
        Ok(())
    }

    fn restore(&self, hwnd: usize) -> WindowResult<()> {
        self.live(hwnd)?;
        self.record(Call::Restore(hwnd));
        Ok(())
    }

    fn set_topmost(&self, hwnd: usize, topmost: bool) -> WindowResult<()> {
        self.live(hwnd)?;
        self.record(Call::Topmost(hwnd, topmost));
        Ok(())
    }

    fn set_foreground(&self, hwnd: usize) -> WindowResult<()> {
        self.live(hwnd)?;
        if self.refuse_foreground.get() {
            return Err(PlatformError::call("SetForegroundWindow", "refused"));
        }
        self.record(Call::Foreground(hwnd));
        Ok(())
    }

    fn nudge_input(&self) -> WindowResult<()> {
        self.record(Call::Nudge);
        Ok(())
    }

    fn cursor_pos(&self) -> WindowResult<Point> {
        Ok(self.cursor.get())
    }

    fn primary_screen_size(&self) -> WindowResult<ScreenSize> {
        Ok(self.screen)
    }
}
