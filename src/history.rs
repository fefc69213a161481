// Copyright 2025 the TheoremX Authors
// SPDX-License-Identifier: Apache-2.0

//! Action history with an undo cursor.
//!
//! The history is a log of actions (one per pointer gesture) plus a cursor.
//! Actions up to and including the cursor are visible; actions after it are
//! redo-shadowed. Starting a new action while shadowed actions exist drops
//! them for good, so there is never more than one branch.

use crate::error::HistoryError;
use crate::geometry::Segment;

/// One continuous pointer gesture, pointer-down to pointer-up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Action {
    segments: Vec<Segment>,
}

impl Action {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl FromIterator<Segment> for Action {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

/// Ordered log of actions with a visibility cursor.
///
/// `visible` is the number of visible actions, i.e. `cursor + 1` in the
/// signed formulation. It is always `<= actions.len()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionHistory {
    actions: Vec<Action>,
    visible: usize,
}

impl ActionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new, empty action and make it current.
    ///
    /// Redo-shadowed actions are discarded first.
    pub fn begin_action(&mut self) {
        if self.visible < self.actions.len() {
            tracing::debug!(
                "Discarding {} redo-shadowed action(s)",
                self.actions.len() - self.visible
            );
            self.actions.truncate(self.visible);
        }
        self.actions.push(Action::new());
        self.visible = self.actions.len();
    }

    /// Append a segment to the current action
    pub fn append_segment(&mut self, segment: Segment) -> Result<(), HistoryError> {
        let index = self.cursor().ok_or(HistoryError::NoActiveAction)?;
        self.actions[index].segments.push(segment);
        Ok(())
    }

    /// Hide the current action. Returns false if nothing was visible.
    pub fn undo(&mut self) -> bool {
        if self.visible == 0 {
            return false;
        }
        self.visible -= 1;
        true
    }

    /// Re-show the first redo-shadowed action. Returns false if there is none.
    pub fn redo(&mut self) -> bool {
        if self.visible >= self.actions.len() {
            return false;
        }
        self.visible += 1;
        true
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.visible = 0;
    }

    /// Index of the current action, `None` when nothing is visible
    pub fn cursor(&self) -> Option<usize> {
        self.visible.checked_sub(1)
    }

    pub fn current_action(&self) -> Option<&Action> {
        self.cursor().map(|index| &self.actions[index])
    }

    /// Exactly the actions that must be rendered, oldest first
    pub fn visible_actions(&self) -> &[Action] {
        &self.actions[..self.visible]
    }

    /// Total stored actions, including redo-shadowed ones
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.visible > 0
    }

    pub fn can_redo(&self) -> bool {
        self.visible < self.actions.len()
    }
}
