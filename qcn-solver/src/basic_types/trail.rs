use std::fmt::Debug;
use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::qcn_assert_simple;

/// A chronological log of state changes, segmented into decision levels.
///
/// Entries pushed while a level is open are drained in reverse order when the
/// level is popped, so the owner can undo them newest-first.
#[derive(Debug, Clone)]
pub(crate) struct Trail<T> {
    current_decision_level: usize,
    /// At index i is the position where the i-th decision level ends (exclusive)
    /// on the trail.
    trail_delimiter: Vec<usize>,
    trail: Vec<T>,
}

/// Manual implementation to avoid a `T: Default` bound.
impl<T> Default for Trail<T> {
    fn default() -> Trail<T> {
        Trail {
            current_decision_level: 0,
            trail_delimiter: Vec::new(),
            trail: Vec::new(),
        }
    }
}

impl<T: Debug> Trail<T> {
    pub(crate) fn get_decision_level(&self) -> usize {
        self.current_decision_level
    }

    pub(crate) fn increase_decision_level(&mut self) {
        self.current_decision_level += 1;
        self.trail_delimiter.push(self.trail.len());
    }

    /// Rewinds to `new_decision_level`, returning the undone entries
    /// newest-first.
    pub(crate) fn synchronise(&mut self, new_decision_level: usize) -> Rev<Drain<'_, T>> {
        qcn_assert_simple!(new_decision_level < self.current_decision_level);

        let num_values_to_remove = self.trail.len() - self.trail_delimiter[new_decision_level];

        self.current_decision_level = new_decision_level;
        self.trail_delimiter.truncate(new_decision_level);

        let start = self.trail.len() - num_values_to_remove;
        self.trail.drain(start..).rev()
    }

    pub(crate) fn push(&mut self, elem: T) {
        self.trail.push(elem)
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.trail
    }
}
