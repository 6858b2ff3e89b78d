//! Clock and timing utilities for frame delivery.
//!
//! Sensor frames carry their own monotonic capture timestamps. This module
//! provides:
//! - A session clock anchored at listener start
//! - Nanosecond to second conversion
//! - A pacer that replays recorded frames at their original cadence

use std::time::{Duration, Instant};

/// Monotonic timestamp in nanoseconds.
pub type TimestampNs = u64;

/// A session clock that provides monotonic timestamps relative to
/// a fixed epoch (the moment the session started).
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new session clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Get nanoseconds elapsed since session start.
    pub fn elapsed_ns(&self) -> TimestampNs {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Convert a nanosecond value to seconds.
    pub fn ns_to_secs(ns: u64) -> f64 {
        ns as f64 / 1_000_000_000.0
    }
}

/// Schedules recorded frames against a live session clock.
///
/// The first frame seen anchors the recording timeline to session time
/// zero; later frames are due once the session has advanced by the same
/// amount as the recording.
#[derive(Debug, Default)]
pub struct FramePacer {
    first_frame_ns: Option<TimestampNs>,
}

impl FramePacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// How long to wait before delivering a frame captured at `frame_ns`,
    /// given `session_ns` elapsed on the session clock. The first call
    /// never waits.
    pub fn wait_for(&mut self, frame_ns: TimestampNs, session_ns: TimestampNs) -> Duration {
        let first = *self.first_frame_ns.get_or_insert(frame_ns);
        let due_ns = frame_ns.saturating_sub(first);
        Duration::from_nanos(due_ns.saturating_sub(session_ns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed() {
        let clock = SessionClock::start();
        assert!(clock.elapsed_ns() < 1_000_000_000);
        assert!(!clock.epoch_wall().is_empty());
    }

    #[test]
    fn test_ns_to_secs_conversion() {
        assert!((SessionClock::ns_to_secs(1_500_000_000) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_pacer_anchors_on_first_frame() {
        let mut pacer = FramePacer::new();
        assert_eq!(pacer.wait_for(5_000_000_000, 0), Duration::ZERO);
        // 16ms into the recording, 10ms into the session: wait 6ms more.
        assert_eq!(
            pacer.wait_for(5_016_000_000, 10_000_000),
            Duration::from_millis(6)
        );
        // Running late never produces a negative wait.
        assert_eq!(pacer.wait_for(5_020_000_000, 50_000_000), Duration::ZERO);
    }
}
