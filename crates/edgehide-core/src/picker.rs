//! One-shot window selection.
//!
//! The picker is armed on request; the platform layer installs a global
//! pointer listener while it is armed and reports the first primary
//! click back through [`WindowPicker::complete`], which resolves the
//! window under the cursor and hands it to the engine.

use thiserror::Error;

use crate::{Desktop, EdgeHideEngine, Point};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PickError {
    #[error("a window selection is already in progress")]
    AlreadyArmed,
    #[error("no window selection is in progress")]
    NotArmed,
}

/// Result of resolving a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    /// The window was added to the tracked set.
    Added { hwnd: usize, title: String },
    /// The window was already tracked; nothing changed.
    AlreadyTracked { hwnd: usize },
    /// There is no window under the click.
    NoWindow,
}

/// Single-use selection state.
#[derive(Debug, Default)]
pub struct WindowPicker {
    armed: bool,
}

impl WindowPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Arms the picker for the next click.
    pub fn arm(&mut self) -> Result<(), PickError> {
        if self.armed {
            return Err(PickError::AlreadyArmed);
        }
        self.armed = true;
        Ok(())
    }

    /// Disarms without selecting anything.
    ///
    /// Returns `false` if the picker was not armed.
    pub fn cancel(&mut self) -> bool {
        std::mem::replace(&mut self.armed, false)
    }

    /// Resolves the click at `point` and registers the window under it.
    ///
    /// Disarms the picker whatever the outcome.
    pub fn complete(
        &mut self,
        point: Point,
        desktop: &dyn Desktop,
        engine: &mut EdgeHideEngine,
    ) -> Result<PickOutcome, PickError> {
        if !self.cancel() {
            return Err(PickError::NotArmed);
        }

        let Some(hwnd) = desktop.window_from_point(point) else {
            return Ok(PickOutcome::NoWindow);
        };

        let title = desktop.window_title(hwnd).unwrap_or_else(|e| {
            crate::log_warn!("Could not read title of 0x{hwnd:X}: {e}");
            String::new()
        });

        if engine.track(hwnd, title.clone()) {
            crate::log_info!("Tracking 0x{hwnd:X} \"{title}\"");
            Ok(PickOutcome::Added { hwnd, title })
        } else {
            Ok(PickOutcome::AlreadyTracked { hwnd })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::Rect;
    use crate::config::EdgeConfig;
    use crate::fake::FakeDesktop;

    fn engine() -> EdgeHideEngine {
        EdgeHideEngine::new(EdgeConfig::default(), Duration::from_millis(100))
    }

    #[test]
    fn click_on_window_adds_it_once() {
        // Arrange
        let desktop = FakeDesktop::new(1920, 1080);
        desktop.add(42, Rect::new(100, 100, 400, 300), "Editor");
        let mut engine = engine();
        let mut picker = WindowPicker::new();
        picker.arm().unwrap();

        // Act
        let outcome = picker.complete(Point::new(200, 200), &desktop, &mut engine);

        // Assert
        assert_eq!(
            outcome,
            Ok(PickOutcome::Added {
                hwnd: 42,
                title: "Editor".into()
            })
        );
        assert!(!picker.is_armed());
        assert_eq!(engine.entries()[0].title, "Editor");
        assert!(!engine.entries()[0].hidden);
    }

    #[test]
    fn picking_tracked_window_is_a_noop() {
        let desktop = FakeDesktop::new(1920, 1080);
        desktop.add(42, Rect::new(100, 100, 400, 300), "Editor");
        let mut engine = engine();
        engine.track(42, "Editor");
        let revision = engine.revision();
        let mut picker = WindowPicker::new();
        picker.arm().unwrap();

        let outcome = picker.complete(Point::new(200, 200), &desktop, &mut engine);

        assert_eq!(outcome, Ok(PickOutcome::AlreadyTracked { hwnd: 42 }));
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.revision(), revision);
    }

    #[test]
    fn click_on_empty_desktop_disarms() {
        let desktop = FakeDesktop::new(1920, 1080);
        let mut engine = engine();
        let mut picker = WindowPicker::new();
        picker.arm().unwrap();

        let outcome = picker.complete(Point::new(5, 5), &desktop, &mut engine);

        assert_eq!(outcome, Ok(PickOutcome::NoWindow));
        assert!(!picker.is_armed());
        assert!(engine.is_empty());
    }

    #[test]
    fn picker_completes_once_per_arming() {
        let desktop = FakeDesktop::new(1920, 1080);
        desktop.add(1, Rect::new(0, 0, 400, 300), "A");
        let mut engine = engine();
        let mut picker = WindowPicker::new();
        picker.arm().unwrap();
        picker
            .complete(Point::new(10, 10), &desktop, &mut engine)
            .unwrap();

        let second = picker.complete(Point::new(10, 10), &desktop, &mut engine);

        assert_eq!(second, Err(PickError::NotArmed));
    }

    #[test]
    fn arm_twice_is_rejected_and_cancel_disarms() {
        let mut picker = WindowPicker::new();

        assert_eq!(picker.arm(), Ok(()));
        assert_eq!(picker.arm(), Err(PickError::AlreadyArmed));
        assert!(picker.cancel());
        assert!(!picker.cancel());
    }
}
