//! Application switcher with a held modifier.
//!
//! Desktop app switchers stay open while their modifier is held. The first
//! step presses the modifier and leaves it down; every step taps the cycle
//! key; a timer releases the modifier once the hand stops asking. A new step
//! before the timer fires cancels it and re-arms a fresh one, so at most one
//! release is ever pending.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use handwave_common::config::{ms_to_ns, AppSwitchConfig};
use handwave_common::error::HandwaveResult;
use handwave_frame_model::TimestampNs;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::sink::{lock, InputSink, KeySym, SharedSink};

/// Modifier held while the switcher is open.
pub const SWITCHER_MODIFIER: KeySym = KeySym::AltLeft;
/// Key tapped to advance the switcher.
pub const SWITCHER_STEP: KeySym = KeySym::Tab;
/// Extra key held to step backwards.
pub const SWITCHER_REVERSE: KeySym = KeySym::ShiftLeft;

/// Timing for the app switcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppSwitchTuning {
    /// Delay between the last step and the modifier release.
    pub release_after: Duration,
    /// Minimum time between two steps.
    pub min_interval_ns: u64,
}

impl Default for AppSwitchTuning {
    fn default() -> Self {
        Self::from(&AppSwitchConfig::default())
    }
}

impl From<&AppSwitchConfig> for AppSwitchTuning {
    fn from(config: &AppSwitchConfig) -> Self {
        Self {
            release_after: Duration::from_millis(config.release_timeout_ms),
            min_interval_ns: ms_to_ns(config.min_interval_ms),
        }
    }
}

/// Which way to cycle through applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchDirection {
    Forward,
    Backward,
}

/// Modifier state shared with the release timer.
///
/// Only touched while the sink lock is held, which orders timer releases
/// against new steps.
#[derive(Debug, Default)]
struct HoldState {
    held: bool,
    /// Bumped on every arm; a timer only acts if it is still current.
    generation: u64,
}

/// Drives the application switcher.
pub struct AppSwitcher {
    sink: SharedSink,
    runtime: Handle,
    tuning: AppSwitchTuning,
    hold: Arc<Mutex<HoldState>>,
    pending: Option<JoinHandle<()>>,
    last_step: Option<TimestampNs>,
}

impl AppSwitcher {
    pub fn new(sink: SharedSink, runtime: Handle, tuning: AppSwitchTuning) -> Self {
        Self {
            sink,
            runtime,
            tuning,
            hold: Arc::new(Mutex::new(HoldState::default())),
            pending: None,
            last_step: None,
        }
    }

    /// Advance the switcher one entry.
    ///
    /// Returns `Ok(false)` when the request came too soon after the
    /// previous step and was ignored.
    pub fn step(&mut self, direction: SwitchDirection, now: TimestampNs) -> HandwaveResult<bool> {
        if let Some(last) = self.last_step {
            if now.saturating_sub(last) < self.tuning.min_interval_ns {
                return Ok(false);
            }
        }

        let (generation, tapped) = {
            let mut sink = lock(&self.sink);
            let mut hold = self.hold.lock().unwrap_or_else(PoisonError::into_inner);

            hold.generation += 1;
            if let Some(pending) = self.pending.take() {
                pending.abort();
            }

            if !hold.held {
                sink.press_key(SWITCHER_MODIFIER)?;
                hold.held = true;
            }
            (hold.generation, tap_step(&mut *sink, direction))
        };

        // The modifier is down from here on, so a release is always armed.
        self.last_step = Some(now);
        self.pending = Some(self.arm_release(generation));
        tapped?;
        tracing::debug!(?direction, "App switcher step");
        Ok(true)
    }

    /// Whether the modifier is currently held down.
    pub fn is_held(&self) -> bool {
        self.hold
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .held
    }

    /// Cancel any pending timer and release the modifier now.
    pub fn release_now(&mut self) -> HandwaveResult<()> {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let mut sink = lock(&self.sink);
        let mut hold = self.hold.lock().unwrap_or_else(PoisonError::into_inner);
        hold.generation += 1;
        if hold.held {
            hold.held = false;
            sink.release_key(SWITCHER_MODIFIER)?;
            sink.sync()?;
        }
        Ok(())
    }

    fn arm_release(&self, generation: u64) -> JoinHandle<()> {
        let sink = Arc::clone(&self.sink);
        let hold = Arc::clone(&self.hold);
        let delay = self.tuning.release_after;

        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            let mut sink = lock(&sink);
            let mut hold = hold.lock().unwrap_or_else(PoisonError::into_inner);
            if hold.generation != generation || !hold.held {
                return;
            }
            hold.held = false;
            let released = sink.release_key(SWITCHER_MODIFIER).and_then(|_| sink.sync());
            match released {
                Ok(()) => tracing::debug!("App switcher closed"),
                Err(e) => tracing::warn!(error = %e, "Failed to release app switcher modifier"),
            }
        })
    }
}

fn tap_step(sink: &mut dyn InputSink, direction: SwitchDirection) -> HandwaveResult<()> {
    if direction == SwitchDirection::Backward {
        sink.press_key(SWITCHER_REVERSE)?;
    }
    sink.press_key(SWITCHER_STEP)?;
    sink.release_key(SWITCHER_STEP)?;
    if direction == SwitchDirection::Backward {
        sink.release_key(SWITCHER_REVERSE)?;
    }
    sink.sync()
}

impl Drop for AppSwitcher {
    fn drop(&mut self) {
        if let Err(e) = self.release_now() {
            tracing::warn!(error = %e, "Failed to release app switcher modifier on drop");
        }
    }
}
