//! Delayed topmost reverts scheduled after a window is revealed.

use std::time::Instant;

/// A pending "drop topmost" request for one window.
///
/// The generation pins the request to the registration it was made
/// for, so a handle that is untracked and picked again is not touched
/// by a request from its previous life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TopmostRevert {
    pub(crate) due: Instant,
    pub(crate) hwnd: usize,
    pub(crate) generation: u64,
}

#[derive(Debug, Default)]
pub(crate) struct DeferredQueue {
    pending: Vec<TopmostRevert>,
}

impl DeferredQueue {
    /// Schedules a revert, replacing any earlier one for the same window.
    pub(crate) fn schedule(&mut self, task: TopmostRevert) {
        self.cancel(task.hwnd);
        self.pending.push(task);
    }

    /// Drops every pending revert for `hwnd`, returning whether one existed.
    pub(crate) fn cancel(&mut self, hwnd: usize) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.hwnd != hwnd);
        self.pending.len() != before
    }

    /// Removes and returns all reverts due at or before `now`.
    pub(crate) fn take_due(&mut self, now: Instant) -> Vec<TopmostRevert> {
        let (due, waiting): (Vec<_>, Vec<_>) = self.pending.drain(..).partition(|t| t.due <= now);
        self.pending = waiting;
        due
    }

    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|t| t.due).min()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}
