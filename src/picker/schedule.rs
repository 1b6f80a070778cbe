//! Deferred caret placement.
//!
//! Focusing a text input and setting its selection in the same turn is
//! unreliable, so caret moves are delivered on a later tick. Each control owns
//! one scheduler holding at most one pending task: a newer request replaces
//! (cancels) the older one, and closing or disposing the control cancels
//! whatever is left.

#![allow(missing_docs)]

use crate::picker::segment::CaretTarget;

/// Default delay before a caret move is applied.
pub const DEFAULT_CARET_DELAY_MS: u64 = 10;

/// Identifier of a scheduled caret move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledCaret {
    id: TaskId,
    due_at_ms: u64,
    target: CaretTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretScheduler {
    delay_ms: u64,
    next_id: u64,
    pending: Option<ScheduledCaret>,
}

impl CaretScheduler {
    #[must_use]
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            next_id: 1,
            pending: None,
        }
    }

    #[must_use]
    pub const fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Schedule `target` for `now_ms + delay`, cancelling any pending task.
    pub fn schedule(&mut self, target: CaretTarget, now_ms: u64) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending = Some(ScheduledCaret {
            id,
            due_at_ms: now_ms.saturating_add(self.delay_ms),
            target,
        });
        id
    }

    /// Cancel the pending task, returning its id if there was one.
    pub fn cancel(&mut self) -> Option<TaskId> {
        self.pending.take().map(|task| task.id)
    }

    /// Remove and return the pending target if it is due at `now_ms`.
    pub fn take_due(&mut self, now_ms: u64) -> Option<CaretTarget> {
        match self.pending {
            Some(task) if task.due_at_ms <= now_ms => {
                self.pending = None;
                Some(task.target)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn pending_id(&self) -> Option<TaskId> {
        self.pending.map(|task| task.id)
    }

    /// Milliseconds until the pending task is due (0 if overdue).
    #[must_use]
    pub fn due_in(&self, now_ms: u64) -> Option<u64> {
        self.pending
            .map(|task| task.due_at_ms.saturating_sub(now_ms))
    }
}

impl Default for CaretScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_CARET_DELAY_MS)
    }
}
