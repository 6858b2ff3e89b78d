//! Handwave Gesture Core
//!
//! Turns a stream of sensor frames into a small set of intentional,
//! rate-limited desktop actions:
//! - **Debounce:** One effect per action within a time window
//! - **Pointer:** Hysteresis filter between resting and moving states
//! - **Swipe:** Same-frame clustering of open-hand swipes into workspace moves
//! - **Zoom:** Two-hand distance changes into zoom in/out steps
//! - **App switcher:** Held modifier with a cancellable deferred release
//!
//! State machines here take timestamps as arguments and never read a clock,
//! so every decision is reproducible from recorded frames. Actions leave the
//! crate only through the [`InputSink`] trait.

pub mod app_switch;
pub mod debounce;
pub mod dispatcher;
pub mod pointer;
pub mod sink;
pub mod swipe;
pub mod zoom;

pub use app_switch::AppSwitcher;
pub use debounce::{ActionId, DebounceGate};
pub use dispatcher::{DispatcherSettings, GestureFrameDispatcher};
pub use pointer::PointerStabilizer;
pub use sink::{InputSink, KeySym, RecordingSink, SharedSink, SinkCall};
pub use swipe::{SwipeClusterClassifier, SwipeSignal};
pub use zoom::{ZoomDecision, ZoomTracker};
