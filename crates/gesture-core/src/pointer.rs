//! Pointer hysteresis.
//!
//! A resting hand still jitters by a few millimetres, which at screen scale
//! is tens of pixels. The stabilizer keeps the pointer still until the hand
//! asks for a large jump, then follows every sample until the hand has been
//! still for `stop_timeout`.

use handwave_common::config::{ms_to_ns, PointerConfig};
use handwave_frame_model::{Point2D, TimestampNs};

/// Thresholds for the pointer state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerTuning {
    /// Distance (px) needed to start moving from rest.
    pub move_threshold_px: f64,
    /// Horizontal displacement (px) that keeps the moving state alive.
    pub min_move_px: f64,
    /// Time without a real move after which the pointer is at rest.
    pub stop_timeout_ns: u64,
}

impl Default for PointerTuning {
    fn default() -> Self {
        Self::from(&PointerConfig::default())
    }
}

impl From<&PointerConfig> for PointerTuning {
    fn from(config: &PointerConfig) -> Self {
        Self {
            move_threshold_px: config.move_threshold_px,
            min_move_px: config.min_move_px,
            stop_timeout_ns: ms_to_ns(config.stop_timeout_ms),
        }
    }
}

/// State carried across frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    /// Last position handed to the sink.
    pub last_position: Point2D,
    /// Last move that counted toward staying in the moving state.
    pub last_move: Option<TimestampNs>,
}

/// Hysteresis filter between absolute finger positions and pointer moves.
#[derive(Debug, Clone, Default)]
pub struct PointerStabilizer {
    tuning: PointerTuning,
    state: PointerState,
}

impl PointerStabilizer {
    pub fn new(tuning: PointerTuning) -> Self {
        Self {
            tuning,
            state: PointerState::default(),
        }
    }

    /// Whether the pointer moved recently enough to be following the hand.
    pub fn is_moving(&self, now: TimestampNs) -> bool {
        self.state
            .last_move
            .is_some_and(|last| now.saturating_sub(last) <= self.tuning.stop_timeout_ns)
    }

    /// Decide whether the pointer at `current` should jump to `target`.
    ///
    /// Returns the position to move to, or `None` to leave the pointer alone.
    pub fn update(
        &mut self,
        target: Point2D,
        current: Point2D,
        now: TimestampNs,
    ) -> Option<Point2D> {
        let distance = current.distance_to(&target);

        if self.is_moving(now) {
            if (current.x - target.x).abs() > self.tuning.min_move_px {
                self.state.last_move = Some(now);
            }
            self.state.last_position = target;
            return Some(target);
        }

        if distance > self.tuning.move_threshold_px {
            tracing::trace!(distance, "Pointer leaving rest");
            self.state.last_move = Some(now);
            self.state.last_position = target;
            return Some(target);
        }

        None
    }

    /// Like [`update`](Self::update), measured from the last emitted position.
    pub fn track(&mut self, target: Point2D, now: TimestampNs) -> Option<Point2D> {
        let current = self.state.last_position;
        self.update(target, current, now)
    }

    pub fn state(&self) -> &PointerState {
        &self.state
    }
}
