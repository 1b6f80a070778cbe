//! Commit gate: validate a draft and promote it to committed state.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::core::errors::{PickerError, Result};
use crate::date::pattern::DisplayPattern;
use crate::picker::store::{CommittedValue, DraftRange, ValueStore};

/// What caused a commit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitTrigger {
    /// Explicit confirm action.
    Confirm,
    /// Every endpoint became valid through full keyboard entry.
    FullEntry,
    /// A non-custom preset was selected or its period clicked.
    Preset,
    /// Previous/next period paging.
    Paging,
    /// Popover closed in single-date mode with a value.
    CloseSingle,
}

/// Limits applied before anything is committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitConstraints {
    /// Longest allowed inclusive span.
    pub max_days: Option<u32>,
}

/// Strings the host's `onChange` receives. Missing endpoints are empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormattedValue {
    Single(String),
    Range([String; 2]),
}

/// A successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub committed: CommittedValue,
    pub formatted: FormattedValue,
    /// Whether the committed value differs from the one it replaced.
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitGate {
    constraints: CommitConstraints,
    pattern: DisplayPattern,
}

impl CommitGate {
    #[must_use]
    pub fn new(constraints: CommitConstraints, pattern: DisplayPattern) -> Self {
        Self {
            constraints,
            pattern,
        }
    }

    #[must_use]
    pub const fn constraints(&self) -> CommitConstraints {
        self.constraints
    }

    /// Validate a draft without touching any state.
    pub fn check(&self, draft: &DraftRange) -> Result<()> {
        if let (Some(max_days), Some(span_days)) = (self.constraints.max_days, draft.span_days())
            && span_days > i64::from(max_days)
        {
            return Err(PickerError::RangeTooLong {
                max_days,
                span_days,
            });
        }
        Ok(())
    }

    /// Validate `draft` and, if it passes, commit it. On failure the store
    /// is left exactly as it was.
    pub fn try_commit(&self, store: &mut ValueStore, draft: DraftRange) -> Result<CommitOutcome> {
        self.check(&draft)?;
        let before = store.committed();
        let committed = store.commit(draft);
        Ok(CommitOutcome {
            committed,
            formatted: self.format(&committed),
            changed: committed != before,
        })
    }

    /// Render a committed value for the host.
    #[must_use]
    pub fn format(&self, value: &CommittedValue) -> FormattedValue {
        let render = |date: Option<_>| date.map(|d| self.pattern.format(d)).unwrap_or_default();
        match value {
            CommittedValue::Single(date) => FormattedValue::Single(render(*date)),
            CommittedValue::Range(range) => {
                FormattedValue::Range([render(range.start), render(range.end)])
            }
        }
    }
}
