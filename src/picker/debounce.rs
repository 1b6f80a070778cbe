//! Per-control debouncer for calendar change notifications.
//!
//! The calendar may fire two notifications for one click (the raw event and a
//! derived state sync). Only the first inside the window reaches the anchor
//! resolver; the second would otherwise resolve against an already-updated
//! draft and move the wrong endpoint.

#![allow(missing_docs)]

/// Default suppression window in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 10;

/// Owned by exactly one control instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDebouncer {
    window_ms: u64,
    last_processed_at: Option<u64>,
}

impl EventDebouncer {
    #[must_use]
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_processed_at: None,
        }
    }

    /// Whether an event at `now_ms` should be processed. Admitted events
    /// restart the window; discarded ones do not.
    pub fn admit(&mut self, now_ms: u64) -> bool {
        let admitted = self
            .last_processed_at
            .is_none_or(|last| now_ms.saturating_sub(last) > self.window_ms);
        if admitted {
            self.last_processed_at = Some(now_ms);
        }
        admitted
    }

    #[must_use]
    pub const fn last_processed_at(&self) -> Option<u64> {
        self.last_processed_at
    }

    #[must_use]
    pub const fn window_ms(&self) -> u64 {
        self.window_ms
    }
}

impl Default for EventDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}
