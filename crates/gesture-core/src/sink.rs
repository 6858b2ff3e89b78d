//! Input injection contract.
//!
//! The core never talks to the display server directly. Everything it does
//! goes through an [`InputSink`], shared behind a mutex so the app-switcher
//! release timer can reach it from a runtime task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use handwave_common::error::{HandwaveError, HandwaveResult};
use serde::{Deserialize, Serialize};

/// Keys the controller injects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySym {
    SuperLeft,
    AltLeft,
    ControlLeft,
    ShiftLeft,
    Tab,
    Up,
    Down,
    Plus,
    Minus,
}

impl KeySym {
    pub const ALL: [KeySym; 9] = [
        KeySym::SuperLeft,
        KeySym::AltLeft,
        KeySym::ControlLeft,
        KeySym::ShiftLeft,
        KeySym::Tab,
        KeySym::Up,
        KeySym::Down,
        KeySym::Plus,
        KeySym::Minus,
    ];
}

/// Opens the activities overview.
pub const ACTIVITIES_COMBO: &[KeySym] = &[KeySym::SuperLeft];
/// Moves to the workspace below.
pub const NEXT_DESKTOP_COMBO: &[KeySym] = &[KeySym::ControlLeft, KeySym::AltLeft, KeySym::Down];
/// Moves to the workspace above.
pub const PREVIOUS_DESKTOP_COMBO: &[KeySym] =
    &[KeySym::ControlLeft, KeySym::AltLeft, KeySym::Up];
pub const ZOOM_IN_COMBO: &[KeySym] = &[KeySym::ControlLeft, KeySym::Plus];
pub const ZOOM_OUT_COMBO: &[KeySym] = &[KeySym::ControlLeft, KeySym::Minus];

/// Low-level input injection provided by the platform.
pub trait InputSink: Send {
    /// Warp the pointer to absolute screen coordinates.
    fn move_pointer(&mut self, x: f64, y: f64) -> HandwaveResult<()>;

    /// Press and release the primary button.
    fn click_primary(&mut self) -> HandwaveResult<()>;

    fn press_key(&mut self, key: KeySym) -> HandwaveResult<()>;

    fn release_key(&mut self, key: KeySym) -> HandwaveResult<()>;

    /// Flush pending events to the display server.
    fn sync(&mut self) -> HandwaveResult<()>;

    /// Current pointer position, when the platform can report it.
    fn pointer_position(&self) -> Option<(f64, f64)> {
        None
    }

    /// Sink name for logging.
    fn name(&self) -> &str;
}

/// Sink shared between the dispatcher and its timers.
pub type SharedSink = Arc<Mutex<dyn InputSink>>;

/// Wrap a sink for sharing.
pub fn shared<S: InputSink + 'static>(sink: S) -> SharedSink {
    Arc::new(Mutex::new(sink))
}

/// Lock a shared sink, recovering from a panic in another holder.
pub fn lock(sink: &SharedSink) -> MutexGuard<'_, dyn InputSink + 'static> {
    sink.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Press every key of a combo in order, then release them in order.
pub fn press_combo(sink: &mut dyn InputSink, combo: &[KeySym]) -> HandwaveResult<()> {
    for &key in combo {
        sink.press_key(key)?;
    }
    sink.sync()?;
    for &key in combo {
        sink.release_key(key)?;
    }
    sink.sync()
}

/// A call observed by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum SinkCall {
    MovePointer { x: f64, y: f64 },
    Click,
    Press { key: KeySym },
    Release { key: KeySym },
    Sync,
}

/// Sink that records calls instead of injecting them.
///
/// Clones share the same log, so a test can keep one handle while the
/// dispatcher owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    calls: Arc<Mutex<Vec<SinkCall>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of primary clicks recorded.
    pub fn clicks(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SinkCall::Click))
            .count()
    }

    /// Pointer moves recorded, in order.
    pub fn moves(&self) -> Vec<(f64, f64)> {
        self.calls()
            .iter()
            .filter_map(|c| match c {
                SinkCall::MovePointer { x, y } => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    /// Make every following call fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    fn record(&self, call: SinkCall) -> HandwaveResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(HandwaveError::injection(format!("refused {call:?}")));
        }
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        Ok(())
    }
}

impl InputSink for RecordingSink {
    fn move_pointer(&mut self, x: f64, y: f64) -> HandwaveResult<()> {
        self.record(SinkCall::MovePointer { x, y })
    }

    fn click_primary(&mut self) -> HandwaveResult<()> {
        self.record(SinkCall::Click)
    }

    fn press_key(&mut self, key: KeySym) -> HandwaveResult<()> {
        self.record(SinkCall::Press { key })
    }

    fn release_key(&mut self, key: KeySym) -> HandwaveResult<()> {
        self.record(SinkCall::Release { key })
    }

    fn sync(&mut self) -> HandwaveResult<()> {
        self.record(SinkCall::Sync)
    }

    fn name(&self) -> &str {
        "recording"
    }
}
