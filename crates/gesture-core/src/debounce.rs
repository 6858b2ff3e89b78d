//! Per-action debouncing.
//!
//! Keeps one timer per action so that a gesture the sensor reports on many
//! consecutive frames fires its action once per window.

use std::collections::HashMap;

use handwave_frame_model::TimestampNs;
use serde::{Deserialize, Serialize};

/// Stable identifiers for debounced one-shot actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionId {
    ToggleActivities,
    MoveNextDesktop,
    MovePreviousDesktop,
}

impl ActionId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToggleActivities => "toggle-activities",
            Self::MoveNextDesktop => "move-next-desktop",
            Self::MovePreviousDesktop => "move-previous-desktop",
        }
    }
}

/// Timer bank that runs an action at most once per interval.
#[derive(Debug, Default)]
pub struct DebounceGate {
    last_fired: HashMap<ActionId, TimestampNs>,
}

impl DebounceGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` unless `id` already fired within `min_interval_ns`.
    ///
    /// The first attempt for an id always runs. Suppressed attempts leave the
    /// timer untouched, so the window is measured from the last execution.
    /// Returns whether the action ran.
    pub fn attempt<F>(
        &mut self,
        id: ActionId,
        min_interval_ns: u64,
        now: TimestampNs,
        action: F,
    ) -> bool
    where
        F: FnOnce(),
    {
        if !self.would_fire(id, min_interval_ns, now) {
            tracing::trace!(action = id.as_str(), "Debounced");
            return false;
        }

        action();
        self.last_fired.insert(id, now);
        true
    }

    /// Whether an attempt at `now` would run.
    pub fn would_fire(&self, id: ActionId, min_interval_ns: u64, now: TimestampNs) -> bool {
        match self.last_fired.get(&id) {
            None => true,
            Some(&last) => now.saturating_sub(last) > min_interval_ns,
        }
    }

    /// Timestamp of the last execution of `id`.
    pub fn last_fired(&self, id: ActionId) -> Option<TimestampNs> {
        self.last_fired.get(&id).copied()
    }
}
