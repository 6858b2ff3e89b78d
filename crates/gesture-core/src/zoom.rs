//! Two-hand zoom tracking.

use handwave_common::config::{ms_to_ns, ZoomConfig};
use handwave_frame_model::TimestampNs;
use serde::{Deserialize, Serialize};

/// Outcome of one zoom sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomDecision {
    Increase,
    Decrease,
    /// Rate-limited, calibrating, or below threshold.
    Hold,
}

/// Thresholds for the zoom tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTuning {
    /// Distance change (mm) that counts as a zoom step.
    pub threshold_mm: f64,
    /// Minimum time between decisions.
    pub function_duration_ns: u64,
    /// Pause after which the baseline is forgotten.
    pub reset_timeout_ns: u64,
}

impl Default for ZoomTuning {
    fn default() -> Self {
        Self::from(&ZoomConfig::default())
    }
}

impl From<&ZoomConfig> for ZoomTuning {
    fn from(config: &ZoomConfig) -> Self {
        Self {
            threshold_mm: config.threshold_mm,
            function_duration_ns: ms_to_ns(config.function_duration_ms),
            reset_timeout_ns: ms_to_ns(config.reset_timeout_ms),
        }
    }
}

/// State carried across frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoomState {
    /// Hand distance the next sample is compared against; unset after a pause.
    pub baseline: Option<f64>,
    pub last_zoom: Option<TimestampNs>,
}

/// Classifies changes in the distance between two hands.
#[derive(Debug, Clone, Default)]
pub struct ZoomTracker {
    tuning: ZoomTuning,
    state: ZoomState,
}

impl ZoomTracker {
    pub fn new(tuning: ZoomTuning) -> Self {
        Self {
            tuning,
            state: ZoomState::default(),
        }
    }

    /// Feed the current distance between the hands (mm).
    pub fn update(&mut self, distance: f64, now: TimestampNs) -> ZoomDecision {
        if let Some(last) = self.state.last_zoom {
            let elapsed = now.saturating_sub(last);
            if elapsed < self.tuning.function_duration_ns {
                return ZoomDecision::Hold;
            }
            if elapsed > self.tuning.reset_timeout_ns {
                self.state.baseline = None;
            }
        }

        let decision = match self.state.baseline {
            None => {
                tracing::debug!(distance, "Zoom baseline calibrated");
                self.state.baseline = Some(distance);
                ZoomDecision::Hold
            }
            Some(baseline) if (distance - baseline).abs() > self.tuning.threshold_mm => {
                self.state.baseline = Some(distance);
                if distance > baseline {
                    ZoomDecision::Increase
                } else {
                    ZoomDecision::Decrease
                }
            }
            Some(_) => ZoomDecision::Hold,
        };

        self.state.last_zoom = Some(now);
        decision
    }

    pub fn state(&self) -> &ZoomState {
        &self.state
    }
}
