//! The edge-hide state machine.
//!
//! The engine owns every tracked window and its `Visible`/`Hidden`
//! state. The host calls [`EdgeHideEngine::tick`] on a fixed period;
//! each tick samples the window rectangle, the cursor, and the primary
//! screen size, then slides docked windows off-screen or back.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::EdgeConfig;
use crate::deferred::{DeferredQueue, TopmostRevert};
use crate::{Desktop, PlatformError, Point, Rect, ScreenSize, WindowResult};

/// The screen edge a window is docked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Right,
    Top,
}

/// Per-window hide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Visible,
    /// Slid off-screen past `edge`, leaving a sliver visible.
    Hidden { edge: Edge },
}

impl WindowState {
    pub fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden { .. })
    }
}

/// What a tick should do with one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Stay,
    Hide(Edge),
    Show(Edge),
}

/// A window registered for edge hiding.
#[derive(Debug)]
struct TrackedWindow {
    hwnd: usize,
    /// Captured when the window was picked; never refreshed.
    title: String,
    state: WindowState,
    generation: u64,
}

/// Read-only projection of a tracked window for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedEntry {
    pub hwnd: usize,
    pub title: String,
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<Edge>,
}

/// A platform failure for one window during a tick.
#[derive(Debug)]
pub struct WindowFailure {
    pub hwnd: usize,
    pub error: PlatformError,
}

/// Outcome of one tick.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Windows slid off-screen this tick.
    pub hidden: Vec<usize>,
    /// Windows revealed this tick.
    pub shown: Vec<usize>,
    /// Handles dropped because their window no longer exists.
    pub removed: Vec<usize>,
    /// Per-window failures. None of these stopped the tick.
    pub failures: Vec<WindowFailure>,
}

impl TickReport {
    /// Returns whether the tracked-window list changed and should be redrawn.
    pub fn changed(&self) -> bool {
        !(self.hidden.is_empty() && self.shown.is_empty() && self.removed.is_empty())
    }
}

/// Owns the tracked-window set and drives hide/show transitions.
pub struct EdgeHideEngine {
    windows: Vec<TrackedWindow>,
    config: EdgeConfig,
    revert_delay: Duration,
    deferred: DeferredQueue,
    next_generation: u64,
    revision: u64,
}

impl EdgeHideEngine {
    /// Creates an engine with no tracked windows.
    ///
    /// `revert_delay` is how long a revealed window stays topmost
    /// before it is returned to the normal z-order band.
    pub fn new(config: EdgeConfig, revert_delay: Duration) -> Self {
        Self {
            windows: Vec::new(),
            config,
            revert_delay,
            deferred: DeferredQueue::default(),
            next_generation: 1,
            revision: 0,
        }
    }

    /// Starts tracking a window in the `Visible` state.
    ///
    /// Returns `false` if the window is already tracked.
    pub fn track(&mut self, hwnd: usize, title: impl Into<String>) -> bool {
        if self.contains(hwnd) {
            return false;
        }
        let generation = self.next_generation;
        self.next_generation += 1;
        self.windows.push(TrackedWindow {
            hwnd,
            title: title.into(),
            state: WindowState::Visible,
            generation,
        });
        self.revision += 1;
        true
    }

    /// Stops tracking a window, leaving it wherever it currently is.
    ///
    /// Returns `true` if the window was found and removed. A window
    /// still inside its post-reveal topmost period is dropped back to
    /// the normal z-order now instead of when the revert falls due.
    pub fn untrack(&mut self, desktop: &dyn Desktop, hwnd: usize) -> bool {
        let Some(pos) = self.position(hwnd) else {
            return false;
        };
        self.windows.remove(pos);
        self.revision += 1;

        if self.deferred.cancel(hwnd)
            && desktop.is_window(hwnd)
            && let Err(e) = desktop.set_topmost(hwnd, false)
        {
            crate::log_warn!("Could not drop topmost for 0x{hwnd:X}: {e}");
        }
        true
    }

    /// Stops tracking every window.
    pub fn clear(&mut self, desktop: &dyn Desktop) {
        let handles: Vec<usize> = self.windows.iter().map(|w| w.hwnd).collect();
        for hwnd in handles {
            self.untrack(desktop, hwnd);
        }
    }

    /// Stops tracking a window and, if it is hidden, slides it back on screen.
    ///
    /// Returns `Ok(false)` if the window was not tracked. The window is
    /// untracked even when bringing it back fails.
    pub fn release(&mut self, desktop: &dyn Desktop, hwnd: usize) -> WindowResult<bool> {
        let Some(state) = self.state(hwnd) else {
            return Ok(false);
        };
        self.untrack(desktop, hwnd);

        if let WindowState::Hidden { edge } = state
            && desktop.is_window(hwnd)
        {
            let rect = desktop.window_rect(hwnd)?;
            let screen = desktop.primary_screen_size()?;
            desktop.move_window(hwnd, &revealed_rect(&rect, screen, edge))?;
            crate::log_debug!("Released 0x{hwnd:X} from {edge:?} edge");
        }
        Ok(true)
    }

    /// Releases every tracked window, collecting failures.
    pub fn release_all(&mut self, desktop: &dyn Desktop) -> Vec<WindowFailure> {
        let handles: Vec<usize> = self.windows.iter().map(|w| w.hwnd).collect();
        handles
            .into_iter()
            .filter_map(|hwnd| match self.release(desktop, hwnd) {
                Ok(_) => None,
                Err(error) => {
                    crate::log_warn!("Could not restore 0x{hwnd:X}: {error}");
                    Some(WindowFailure { hwnd, error })
                }
            })
            .collect()
    }

    pub fn contains(&self, hwnd: usize) -> bool {
        self.position(hwnd).is_some()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Number of tracked windows currently hidden.
    pub fn hidden_count(&self) -> usize {
        self.windows.iter().filter(|w| w.state.is_hidden()).count()
    }

    /// Returns the state of a tracked window.
    pub fn state(&self, hwnd: usize) -> Option<WindowState> {
        self.find(hwnd).map(|w| w.state)
    }

    /// Counter bumped on every change to the tracked list or a window's state.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Snapshot of the tracked windows in selection order.
    pub fn entries(&self) -> Vec<TrackedEntry> {
        self.windows
            .iter()
            .map(|w| TrackedEntry {
                hwnd: w.hwnd,
                title: w.title.clone(),
                hidden: w.state.is_hidden(),
                edge: match w.state {
                    WindowState::Visible => None,
                    WindowState::Hidden { edge } => Some(edge),
                },
            })
            .collect()
    }

    /// Earliest moment a deferred topmost revert is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deferred.next_deadline()
    }

    /// Runs one monitoring pass over every tracked window.
    ///
    /// A failure for one window is recorded in the report and the pass
    /// moves on to the next window.
    pub fn tick(&mut self, desktop: &dyn Desktop, now: Instant) -> TickReport {
        let mut report = TickReport {
            failures: self.run_deferred(desktop, now),
            ..Default::default()
        };

        let handles: Vec<usize> = self.windows.iter().map(|w| w.hwnd).collect();
        for hwnd in handles {
            if !desktop.is_window(hwnd) {
                self.untrack(desktop, hwnd);
                crate::log_info!("Window 0x{hwnd:X} closed, no longer tracked");
                report.removed.push(hwnd);
                continue;
            }

            match self.step(desktop, hwnd, now) {
                Ok(Decision::Hide(_)) => report.hidden.push(hwnd),
                Ok(Decision::Show(_)) => report.shown.push(hwnd),
                Ok(Decision::Stay) => {}
                Err(error) => {
                    crate::log_warn!("Skipping window 0x{hwnd:X} this tick: {error}");
                    report.failures.push(WindowFailure { hwnd, error });
                }
            }
        }

        report
    }

    /// Returns windows whose topmost revert is due to the normal z-order.
    ///
    /// A revert only acts if its window is still tracked under the same
    /// registration and still exists.
    pub fn run_deferred(&mut self, desktop: &dyn Desktop, now: Instant) -> Vec<WindowFailure> {
        let mut failures = Vec::new();
        for task in self.deferred.take_due(now) {
            let current = self.find(task.hwnd).map(|w| w.generation);
            if current != Some(task.generation) || !desktop.is_window(task.hwnd) {
                continue;
            }
            if let Err(error) = desktop.set_topmost(task.hwnd, false) {
                crate::log_warn!("Could not drop topmost for 0x{:X}: {error}", task.hwnd);
                failures.push(WindowFailure {
                    hwnd: task.hwnd,
                    error,
                });
            }
        }
        failures
    }

    /// Classifies and applies the transition for one live window.
    fn step(&mut self, desktop: &dyn Desktop, hwnd: usize, now: Instant) -> WindowResult<Decision> {
        let state = self
            .state(hwnd)
            .ok_or(PlatformError::StaleHandle(hwnd))?;
        let rect = desktop.window_rect(hwnd)?;
        let cursor = desktop.cursor_pos()?;
        let screen = desktop.primary_screen_size()?;

        let decision = decide(&self.config, state, &rect, cursor, screen);
        match decision {
            Decision::Stay => {}
            Decision::Hide(edge) => self.hide(desktop, hwnd, &rect, screen, edge)?,
            Decision::Show(edge) => self.show(desktop, hwnd, &rect, screen, edge, now)?,
        }
        Ok(decision)
    }

    /// Slides a window off-screen past `edge`.
    ///
    /// The state flips before the move; a failed move restores `Visible`.
    fn hide(
        &mut self,
        desktop: &dyn Desktop,
        hwnd: usize,
        rect: &Rect,
        screen: ScreenSize,
        edge: Edge,
    ) -> WindowResult<()> {
        self.set_state(hwnd, WindowState::Hidden { edge });

        let target = hidden_rect(rect, screen, edge, self.config.sliver);
        if let Err(e) = desktop.move_window(hwnd, &target) {
            self.set_state(hwnd, WindowState::Visible);
            return Err(e);
        }

        crate::log_debug!("Hid 0x{hwnd:X} at {edge:?} edge -> {target:?}");
        self.revision += 1;
        Ok(())
    }

    /// Brings a hidden window back flush against `edge` and activates it.
    ///
    /// The window is forced topmost so the OS lets it come forward, and a
    /// deferred revert drops it back to the normal z-order afterwards.
    fn show(
        &mut self,
        desktop: &dyn Desktop,
        hwnd: usize,
        rect: &Rect,
        screen: ScreenSize,
        edge: Edge,
        now: Instant,
    ) -> WindowResult<()> {
        self.set_state(hwnd, WindowState::Visible);

        let target = revealed_rect(rect, screen, edge);
        if let Err(e) = reveal(desktop, hwnd, &target) {
            self.set_state(hwnd, WindowState::Hidden { edge });
            return Err(e);
        }

        // Foreground activation is best effort: the window is already on
        // screen and topmost even if the OS refuses focus.
        if let Err(e) = desktop.nudge_input() {
            crate::log_debug!("Input nudge failed: {e}");
        }
        if let Err(e) = desktop.set_foreground(hwnd) {
            crate::log_debug!("Foreground request for 0x{hwnd:X} refused: {e}");
        }

        if let Some(generation) = self.find(hwnd).map(|w| w.generation) {
            self.deferred.schedule(TopmostRevert {
                due: now + self.revert_delay,
                hwnd,
                generation,
            });
        }

        crate::log_debug!("Showed 0x{hwnd:X} from {edge:?} edge -> {target:?}");
        self.revision += 1;
        Ok(())
    }

    fn set_state(&mut self, hwnd: usize, state: WindowState) {
        if let Some(pos) = self.position(hwnd) {
            self.windows[pos].state = state;
        }
    }

    fn find(&self, hwnd: usize) -> Option<&TrackedWindow> {
        self.windows.iter().find(|w| w.hwnd == hwnd)
    }

    fn position(&self, hwnd: usize) -> Option<usize> {
        self.windows.iter().position(|w| w.hwnd == hwnd)
    }
}

/// Restores, raises and moves a window into its revealed position.
fn reveal(desktop: &dyn Desktop, hwnd: usize, target: &Rect) -> WindowResult<()> {
    desktop.restore(hwnd)?;
    desktop.set_topmost(hwnd, true)?;
    if let Err(e) = desktop.move_window(hwnd, target) {
        if let Err(undo) = desktop.set_topmost(hwnd, false) {
            crate::log_warn!("Could not drop topmost for 0x{hwnd:X} after failed move: {undo}");
        }
        return Err(e);
    }
    Ok(())
}

/// Decides the transition for one window from its current geometry.
///
/// A visible window docked against the right edge hides to the right
/// once the cursor leaves it; otherwise a window docked against the top
/// hides upwards. Right wins when both apply. A hidden window is shown
/// when the cursor enters either trigger band within the window's span.
pub fn decide(
    config: &EdgeConfig,
    state: WindowState,
    rect: &Rect,
    cursor: Point,
    screen: ScreenSize,
) -> Decision {
    match state {
        WindowState::Visible => {
            if rect.contains(cursor) {
                return Decision::Stay;
            }
            if rect.right() >= screen.width - config.sensitivity {
                Decision::Hide(Edge::Right)
            } else if rect.y <= config.sensitivity {
                Decision::Hide(Edge::Top)
            } else {
                Decision::Stay
            }
        }
        WindowState::Hidden { edge } => {
            let in_right_band = cursor.x >= screen.width - config.trigger_width
                && rect.spans_vertically(cursor.y);
            let in_top_band = cursor.y <= config.trigger_width && rect.spans_horizontally(cursor.x);
            if in_right_band || in_top_band {
                Decision::Show(edge)
            } else {
                Decision::Stay
            }
        }
    }
}

/// Position of a window slid off-screen past `edge`, leaving `sliver`
/// pixels visible. Size and the perpendicular coordinate are kept.
pub fn hidden_rect(rect: &Rect, screen: ScreenSize, edge: Edge, sliver: i32) -> Rect {
    match edge {
        Edge::Right => rect.moved_to(screen.width - sliver, rect.y),
        Edge::Top => rect.moved_to(rect.x, sliver - rect.height),
    }
}

/// Position of a revealed window, flush against `edge`.
pub fn revealed_rect(rect: &Rect, screen: ScreenSize, edge: Edge) -> Rect {
    match edge {
        Edge::Right => rect.moved_to(screen.width - rect.width, rect.y),
        Edge::Top => rect.moved_to(rect.x, 0),
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
