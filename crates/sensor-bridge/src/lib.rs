//! Handwave Sensor Bridge
//!
//! Contracts between the controller and a hand-tracking sensor, plus the
//! pieces that plug the gesture dispatcher into one:
//!
//! - **Listener:** configuration handshake on connect, frame forwarding
//! - **Replay:** a sensor that plays recorded JSONL frames on its own thread
//! - **Action log:** a dry-run sink writing emitted actions as JSONL
//!
//! A source delivers callbacks to one listener at a time, serialized on the
//! source's thread.

pub mod action_log;
pub mod listener;
pub mod replay;

use handwave_common::error::HandwaveResult;
use handwave_frame_model::{GestureKind, SensorFrame};

pub use action_log::ActionLogSink;
pub use listener::{configure_sensor, GestureListener};
pub use replay::{ReplayController, ReplaySensor};

/// Sensor-side configuration and gesture enablement, available while a
/// listener is connecting.
pub trait SensorController {
    /// Set a numeric configuration value. Returns `false` if the sensor
    /// rejected it.
    fn set_config(&mut self, key: &str, value: f64) -> bool;

    /// Persist configuration changes. Returns `false` on failure.
    fn save_config(&mut self) -> bool;

    /// Turn on recognition of a gesture kind.
    fn enable_gesture(&mut self, kind: GestureKind);
}

/// Receives sensor callbacks.
pub trait FrameListener: Send {
    fn on_connect(&mut self, controller: &mut dyn SensorController);

    fn on_frame(&mut self, frame: &SensorFrame);

    fn on_disconnect(&mut self);
}

/// A source of frames that drives a listener.
pub trait SensorSource {
    /// Attach a listener and start delivering callbacks to it.
    fn add_listener(&mut self, listener: Box<dyn FrameListener>) -> HandwaveResult<()>;

    /// Stop delivery and detach the current listener. No callbacks arrive
    /// after this returns.
    fn remove_listener(&mut self) -> HandwaveResult<()>;
}
