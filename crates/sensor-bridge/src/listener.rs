//! Listener that feeds sensor frames to the gesture dispatcher.

use handwave_common::config::SensorConfig;
use handwave_frame_model::{GestureKind, SensorFrame};
use handwave_gesture_core::GestureFrameDispatcher;

use crate::{FrameListener, SensorController};

pub const CIRCLE_MIN_ARC_KEY: &str = "Gesture.Circle.MinArc";
pub const CIRCLE_MIN_RADIUS_KEY: &str = "Gesture.Circle.MinRadius";
pub const SWIPE_MIN_LENGTH_KEY: &str = "Gesture.Swipe.MinLength";

/// Push gesture thresholds to the sensor and enable every gesture kind.
///
/// Values are set in order and the first rejection stops the sequence.
/// Configuration is saved only when every value was accepted. Gestures are
/// enabled either way. Returns whether the configuration was saved.
pub fn configure_sensor(controller: &mut dyn SensorController, config: &SensorConfig) -> bool {
    let settings = [
        (CIRCLE_MIN_ARC_KEY, config.min_circle_arc_rad),
        (CIRCLE_MIN_RADIUS_KEY, config.min_circle_radius_mm),
        (SWIPE_MIN_LENGTH_KEY, config.min_swipe_length_mm),
    ];

    let rejected = settings
        .iter()
        .find(|(key, value)| !controller.set_config(key, *value));

    let saved = match rejected {
        Some((key, value)) => {
            tracing::warn!(key, value, "Sensor rejected configuration, not saving");
            false
        }
        None => {
            let saved = controller.save_config();
            if !saved {
                tracing::warn!("Sensor failed to save configuration");
            }
            saved
        }
    };

    for kind in GestureKind::ALL {
        controller.enable_gesture(kind);
    }
    tracing::info!(saved, "Sensor gestures enabled");
    saved
}

/// Forwards sensor callbacks to a [`GestureFrameDispatcher`].
pub struct GestureListener {
    dispatcher: GestureFrameDispatcher,
    sensor: SensorConfig,
    frames_seen: u64,
}

impl GestureListener {
    pub fn new(dispatcher: GestureFrameDispatcher, sensor: SensorConfig) -> Self {
        Self {
            dispatcher,
            sensor,
            frames_seen: 0,
        }
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }
}

impl FrameListener for GestureListener {
    fn on_connect(&mut self, controller: &mut dyn SensorController) {
        tracing::info!("Sensor connected");
        configure_sensor(controller, &self.sensor);
    }

    fn on_frame(&mut self, frame: &SensorFrame) {
        self.frames_seen += 1;
        self.dispatcher.on_frame(frame);
    }

    fn on_disconnect(&mut self) {
        self.dispatcher.shutdown();
        tracing::info!(frames = self.frames_seen, "Sensor disconnected");
    }
}
