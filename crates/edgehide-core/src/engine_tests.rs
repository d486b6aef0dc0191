use std::time::{Duration, Instant};

use super::*;
use crate::fake::{Call, FakeDesktop};

const REVERT: Duration = Duration::from_millis(100);

fn engine() -> EdgeHideEngine {
    EdgeHideEngine::new(EdgeConfig::default(), REVERT)
}

fn desktop() -> FakeDesktop {
    FakeDesktop::new(1920, 1080)
}

/// Tracks `hwnd` and hides it to the right with the cursor far away.
fn hidden_right(engine: &mut EdgeHideEngine, desktop: &FakeDesktop, hwnd: usize, now: Instant) {
    desktop.add(hwnd, Rect::from_edges(1917, 100, 2000, 300), "Notes");
    engine.track(hwnd, "Notes");
    desktop.set_cursor(1000, 1000);
    let report = engine.tick(desktop, now);
    assert_eq!(report.hidden, vec![hwnd]);
}

// -- decide --

#[test]
fn visible_window_with_cursor_inside_stays() {
    // Arrange
    let rect = Rect::from_edges(1800, 100, 1920, 300);

    // Act
    let decision = decide(
        &EdgeConfig::default(),
        WindowState::Visible,
        &rect,
        Point::new(1850, 150),
        ScreenSize::new(1920, 1080),
    );

    // Assert
    assert_eq!(decision, Decision::Stay);
}

#[test]
fn window_docked_right_and_top_hides_right() {
    let rect = Rect::from_edges(1800, 0, 1920, 300);

    let decision = decide(
        &EdgeConfig::default(),
        WindowState::Visible,
        &rect,
        Point::new(10, 900),
        ScreenSize::new(1920, 1080),
    );

    assert_eq!(decision, Decision::Hide(Edge::Right));
}

#[test]
fn window_away_from_edges_stays() {
    let rect = Rect::from_edges(400, 300, 900, 700);

    let decision = decide(
        &EdgeConfig::default(),
        WindowState::Visible,
        &rect,
        Point::new(10, 10),
        ScreenSize::new(1920, 1080),
    );

    assert_eq!(decision, Decision::Stay);
}

#[test]
fn docking_tolerance_is_inclusive() {
    let config = EdgeConfig::default();
    let screen = ScreenSize::new(1920, 1080);
    let far = Point::new(0, 1079);

    let right = Rect::from_edges(1500, 300, 1915, 600);
    let short_of_right = Rect::from_edges(1500, 300, 1914, 600);
    let top = Rect::from_edges(300, 5, 600, 400);
    let below_top = Rect::from_edges(300, 6, 600, 400);

    assert_eq!(
        decide(&config, WindowState::Visible, &right, far, screen),
        Decision::Hide(Edge::Right)
    );
    assert_eq!(
        decide(&config, WindowState::Visible, &short_of_right, far, screen),
        Decision::Stay
    );
    assert_eq!(
        decide(&config, WindowState::Visible, &top, far, screen),
        Decision::Hide(Edge::Top)
    );
    assert_eq!(
        decide(&config, WindowState::Visible, &below_top, far, screen),
        Decision::Stay
    );
}

#[test]
fn hidden_window_shows_only_inside_its_span() {
    let config = EdgeConfig::default();
    let screen = ScreenSize::new(1920, 1080);
    let state = WindowState::Hidden { edge: Edge::Right };
    let rect = Rect::from_edges(1915, 100, 1998, 300);

    assert_eq!(
        decide(&config, state, &rect, Point::new(1919, 150), screen),
        Decision::Show(Edge::Right)
    );
    assert_eq!(
        decide(&config, state, &rect, Point::new(1919, 301), screen),
        Decision::Stay
    );
    assert_eq!(
        decide(&config, state, &rect, Point::new(1914, 150), screen),
        Decision::Stay
    );
}

#[test]
fn hidden_window_reveals_from_either_band() {
    // A window hidden at the top still reveals from the right band
    // when the cursor is inside its vertical span.
    let config = EdgeConfig::default();
    let screen = ScreenSize::new(1920, 1080);
    let state = WindowState::Hidden { edge: Edge::Top };
    let rect = Rect::from_edges(1700, -195, 1920, 5);

    assert_eq!(
        decide(&config, state, &rect, Point::new(1918, 2), screen),
        Decision::Show(Edge::Top)
    );
    assert_eq!(
        decide(&config, state, &rect, Point::new(1800, 3), screen),
        Decision::Show(Edge::Top)
    );
    assert_eq!(
        decide(&config, state, &rect, Point::new(1699, 3), screen),
        Decision::Stay
    );
}

// -- geometry --

#[test]
fn hidden_and_revealed_positions_keep_size() {
    let screen = ScreenSize::new(1920, 1080);
    let rect = Rect::new(600, 2, 300, 200);

    assert_eq!(
        hidden_rect(&rect, screen, Edge::Top, 5),
        Rect::new(600, -195, 300, 200)
    );
    assert_eq!(
        revealed_rect(&Rect::new(600, -195, 300, 200), screen, Edge::Top),
        rect.moved_to(600, 0)
    );
}

// -- tracking --

#[test]
fn track_rejects_duplicates() {
    // Arrange
    let mut engine = engine();

    // Act
    assert!(engine.track(10, "A"));
    assert!(!engine.track(10, "A again"));

    // Assert
    assert_eq!(engine.len(), 1);
    assert_eq!(engine.entries()[0].title, "A");
    assert_eq!(engine.state(10), Some(WindowState::Visible));
}

#[test]
fn untrack_and_clear_bump_revision() {
    let desktop = desktop();
    let mut engine = engine();
    engine.track(1, "A");
    engine.track(2, "B");
    let before = engine.revision();

    assert!(engine.untrack(&desktop, 1));
    assert!(!engine.untrack(&desktop, 1));
    assert!(engine.revision() > before);

    let before = engine.revision();
    engine.clear(&desktop);
    assert!(engine.is_empty());
    assert!(engine.revision() > before);
}

#[test]
fn entries_keep_selection_order() {
    let mut engine = engine();
    engine.track(30, "C");
    engine.track(10, "A");
    engine.track(20, "B");

    let handles: Vec<usize> = engine.entries().iter().map(|e| e.hwnd).collect();

    assert_eq!(handles, vec![30, 10, 20]);
}

// -- tick --

#[test]
fn tick_hides_window_overhanging_right_edge() {
    // Arrange
    let desktop = desktop();
    let mut engine = engine();
    desktop.add(1, Rect::from_edges(1917, 100, 2000, 300), "Notes");
    engine.track(1, "Notes");
    desktop.set_cursor(1000, 1000);

    // Act
    let report = engine.tick(&desktop, Instant::now());

    // Assert
    assert_eq!(report.hidden, vec![1]);
    assert!(report.changed());
    assert_eq!(
        engine.state(1),
        Some(WindowState::Hidden { edge: Edge::Right })
    );
    assert_eq!(desktop.rect_of(1), Rect::from_edges(1915, 100, 1998, 300));
    let entry = &engine.entries()[0];
    assert!(entry.hidden);
    assert_eq!(entry.edge, Some(Edge::Right));
}

#[test]
fn tick_hides_window_docked_top() {
    let desktop = desktop();
    let mut engine = engine();
    desktop.add(1, Rect::new(600, 3, 300, 200), "Top");
    engine.track(1, "Top");
    desktop.set_cursor(100, 900);

    let report = engine.tick(&desktop, Instant::now());

    assert_eq!(report.hidden, vec![1]);
    assert_eq!(engine.state(1), Some(WindowState::Hidden { edge: Edge::Top }));
    assert_eq!(desktop.rect_of(1), Rect::new(600, -195, 300, 200));
}

#[test]
fn tick_reveals_hidden_window_when_cursor_reaches_edge() {
    // Arrange
    let desktop = desktop();
    let mut engine = engine();
    let now = Instant::now();
    hidden_right(&mut engine, &desktop, 1, now);
    desktop.clear_calls();
    desktop.set_cursor(1919, 150);

    // Act
    let report = engine.tick(&desktop, now);

    // Assert
    assert_eq!(report.shown, vec![1]);
    assert_eq!(engine.state(1), Some(WindowState::Visible));
    assert_eq!(desktop.rect_of(1), Rect::from_edges(1837, 100, 1920, 300));
    assert_eq!(
        desktop.calls(),
        vec![
            Call::Restore(1),
            Call::Topmost(1, true),
            Call::Move(1, Rect::from_edges(1837, 100, 1920, 300)),
            Call::Nudge,
            Call::Foreground(1),
        ]
    );
}

#[test]
fn revealed_window_stays_while_cursor_is_over_it() {
    let desktop = desktop();
    let mut engine = engine();
    let now = Instant::now();
    hidden_right(&mut engine, &desktop, 1, now);
    desktop.set_cursor(1919, 150);
    engine.tick(&desktop, now);

    let report = engine.tick(&desktop, now);

    assert!(!report.changed());
    assert_eq!(engine.state(1), Some(WindowState::Visible));
}

#[test]
fn refused_foreground_does_not_undo_reveal() {
    let desktop = desktop();
    let mut engine = engine();
    let now = Instant::now();
    hidden_right(&mut engine, &desktop, 1, now);
    desktop.refuse_foreground.set(true);
    desktop.set_cursor(1919, 150);

    let report = engine.tick(&desktop, now);

    assert_eq!(report.shown, vec![1]);
    assert!(report.failures.is_empty());
    assert_eq!(engine.state(1), Some(WindowState::Visible));
}

#[test]
fn tick_drops_closed_window_and_keeps_processing_others() {
    // Arrange
    let desktop = desktop();
    let mut engine = engine();
    desktop.add(1, Rect::new(100, 100, 400, 300), "Closed soon");
    desktop.add(2, Rect::from_edges(1917, 100, 2000, 300), "Docked");
    engine.track(1, "Closed soon");
    engine.track(2, "Docked");
    desktop.set_cursor(1000, 1000);
    desktop.close(1);
    let before = engine.revision();

    // Act
    let report = engine.tick(&desktop, Instant::now());

    // Assert
    assert_eq!(report.removed, vec![1]);
    assert_eq!(report.hidden, vec![2]);
    assert!(report.failures.is_empty());
    assert!(!engine.contains(1));
    assert_eq!(engine.state(1), None);
    assert!(engine.contains(2));
    assert!(engine.revision() > before);
}

#[test]
fn failure_for_one_window_does_not_stop_the_tick() {
    let desktop = desktop();
    let mut engine = engine();
    desktop.add(1, Rect::from_edges(1917, 100, 2000, 300), "Broken");
    desktop.add(2, Rect::from_edges(1917, 400, 2000, 600), "Fine");
    engine.track(1, "Broken");
    engine.track(2, "Fine");
    desktop.broken_rects.borrow_mut().insert(1);
    desktop.set_cursor(1000, 1000);

    let report = engine.tick(&desktop, Instant::now());

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].hwnd, 1);
    assert_eq!(report.hidden, vec![2]);
    assert_eq!(engine.state(1), Some(WindowState::Visible));
}

#[test]
fn failed_hide_leaves_window_visible() {
    let desktop = desktop();
    let mut engine = engine();
    desktop.add(1, Rect::from_edges(1917, 100, 2000, 300), "Stuck");
    engine.track(1, "Stuck");
    desktop.broken_moves.borrow_mut().insert(1);
    desktop.set_cursor(1000, 1000);
    let before = engine.revision();

    let report = engine.tick(&desktop, Instant::now());

    assert!(report.hidden.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(engine.state(1), Some(WindowState::Visible));
    assert_eq!(engine.revision(), before);
}

#[test]
fn failed_reveal_keeps_window_hidden_and_drops_topmost() {
    let desktop = desktop();
    let mut engine = engine();
    let now = Instant::now();
    hidden_right(&mut engine, &desktop, 1, now);
    desktop.broken_moves.borrow_mut().insert(1);
    desktop.clear_calls();
    desktop.set_cursor(1919, 150);

    let report = engine.tick(&desktop, now);

    assert!(report.shown.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(
        engine.state(1),
        Some(WindowState::Hidden { edge: Edge::Right })
    );
    assert_eq!(desktop.calls().last(), Some(&Call::Topmost(1, false)));
    assert_eq!(engine.next_deadline(), None);
}

// -- deferred topmost revert --

#[test]
fn topmost_is_reverted_after_delay() {
    // Arrange
    let desktop = desktop();
    let mut engine = engine();
    let now = Instant::now();
    hidden_right(&mut engine, &desktop, 1, now);
    desktop.set_cursor(1919, 150);
    engine.tick(&desktop, now);
    desktop.clear_calls();

    // Act / Assert: not yet due
    assert!(engine.run_deferred(&desktop, now + REVERT / 2).is_empty());
    assert!(desktop.calls().is_empty());
    assert_eq!(engine.next_deadline(), Some(now + REVERT));

    // Act / Assert: due
    assert!(engine.run_deferred(&desktop, now + REVERT).is_empty());
    assert_eq!(desktop.calls(), vec![Call::Topmost(1, false)]);
    assert_eq!(engine.next_deadline(), None);
}

#[test]
fn tick_runs_due_reverts_first() {
    let desktop = desktop();
    let mut engine = engine();
    let now = Instant::now();
    hidden_right(&mut engine, &desktop, 1, now);
    desktop.set_cursor(1919, 150);
    engine.tick(&desktop, now);
    desktop.clear_calls();

    engine.tick(&desktop, now + REVERT);

    assert_eq!(desktop.calls(), vec![Call::Topmost(1, false)]);
}

#[test]
fn revert_skips_window_that_was_closed() {
    let desktop = desktop();
    let mut engine = engine();
    let now = Instant::now();
    hidden_right(&mut engine, &desktop, 1, now);
    desktop.set_cursor(1919, 150);
    engine.tick(&desktop, now);
    desktop.clear_calls();
    desktop.close(1);

    let failures = engine.run_deferred(&desktop, now + REVERT);

    assert!(failures.is_empty());
    assert!(desktop.calls().is_empty());
}

#[test]
fn untrack_during_revert_delay_drops_topmost_at_once() {
    // Arrange
    let desktop = desktop();
    let mut engine = engine();
    let now = Instant::now();
    hidden_right(&mut engine, &desktop, 1, now);
    desktop.set_cursor(1919, 150);
    engine.tick(&desktop, now);
    desktop.clear_calls();

    // Act
    assert!(engine.untrack(&desktop, 1));

    // Assert
    assert_eq!(desktop.calls(), vec![Call::Topmost(1, false)]);
    assert_eq!(engine.next_deadline(), None);
}

#[test]
fn window_picked_again_is_not_touched_by_earlier_revert() {
    let desktop = desktop();
    let mut engine = engine();
    let now = Instant::now();
    hidden_right(&mut engine, &desktop, 1, now);
    desktop.set_cursor(1919, 150);
    engine.tick(&desktop, now);
    engine.untrack(&desktop, 1);
    engine.track(1, "Notes");
    desktop.clear_calls();

    engine.run_deferred(&desktop, now + REVERT);

    assert!(desktop.calls().is_empty());
}

#[test]
fn untrack_of_closed_window_issues_no_calls() {
    let desktop = desktop();
    let mut engine = engine();
    let now = Instant::now();
    hidden_right(&mut engine, &desktop, 1, now);
    desktop.set_cursor(1919, 150);
    engine.tick(&desktop, now);
    desktop.clear_calls();
    desktop.close(1);

    let report = engine.tick(&desktop, now + REVERT / 2);

    assert_eq!(report.removed, vec![1]);
    assert!(desktop.calls().is_empty());
    assert_eq!(engine.next_deadline(), None);
}

// -- release --

#[test]
fn release_brings_hidden_window_back_and_untracks_it() {
    // Arrange
    let desktop = desktop();
    let mut engine = engine();
    hidden_right(&mut engine, &desktop, 1, Instant::now());
    desktop.clear_calls();

    // Act
    let released = engine.release(&desktop, 1);

    // Assert
    assert!(released.unwrap());
    assert!(!engine.contains(1));
    assert_eq!(desktop.rect_of(1), Rect::from_edges(1837, 100, 1920, 300));
}

#[test]
fn release_leaves_visible_window_in_place() {
    let desktop = desktop();
    desktop.add(1, Rect::new(100, 100, 400, 300), "Editor");
    let mut engine = engine();
    engine.track(1, "Editor");

    assert!(engine.release(&desktop, 1).unwrap());

    assert!(engine.is_empty());
    assert!(desktop.calls().is_empty());
}

#[test]
fn release_of_untracked_window_reports_false() {
    let desktop = desktop();
    let mut engine = engine();

    assert!(!engine.release(&desktop, 7).unwrap());
}

#[test]
fn release_all_untracks_everything_even_when_a_move_fails() {
    // Arrange
    let desktop = desktop();
    let mut engine = engine();
    let now = Instant::now();
    hidden_right(&mut engine, &desktop, 1, now);
    desktop.add(2, Rect::new(100, 100, 400, 300), "Editor");
    engine.track(2, "Editor");
    desktop.broken_moves.borrow_mut().insert(1);

    // Act
    let failures = engine.release_all(&desktop);

    // Assert
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].hwnd, 1);
    assert!(engine.is_empty());
}

#[test]
fn release_all_during_revert_delay_leaves_nothing_topmost() {
    // Arrange: reveal, then shut down before the revert is due.
    let desktop = desktop();
    let mut engine = engine();
    let now = Instant::now();
    hidden_right(&mut engine, &desktop, 1, now);
    desktop.set_cursor(1919, 150);
    engine.tick(&desktop, now);
    assert!(desktop.calls().contains(&Call::Topmost(1, true)));
    desktop.clear_calls();

    // Act
    let failures = engine.release_all(&desktop);
    engine.run_deferred(&desktop, now + REVERT);
    engine.tick(&desktop, now + REVERT * 2);

    // Assert
    assert!(failures.is_empty());
    assert!(engine.is_empty());
    assert_eq!(desktop.calls(), vec![Call::Topmost(1, false)]);
}

#[test]
fn top_hidden_window_revealed_from_right_band_returns_to_top() {
    // Arrange: docked top only, so it hides upwards.
    let desktop = desktop();
    let mut engine = engine();
    let now = Instant::now();
    desktop.add(1, Rect::from_edges(1700, 0, 1900, 200), "Chat");
    engine.track(1, "Chat");
    desktop.set_cursor(1000, 1000);
    assert_eq!(engine.tick(&desktop, now).hidden, vec![1]);
    assert_eq!(desktop.rect_of(1), Rect::from_edges(1700, -195, 1900, 5));

    // Act: cursor in the right band, inside the vertical span but
    // outside the horizontal one.
    desktop.set_cursor(1918, 2);
    let report = engine.tick(&desktop, now + REVERT);

    // Assert
    assert_eq!(report.shown, vec![1]);
    assert_eq!(engine.state(1), Some(WindowState::Visible));
    assert_eq!(desktop.rect_of(1), Rect::from_edges(1700, 0, 1900, 200));
}
