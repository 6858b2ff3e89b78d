//! Sensor that replays recorded frames.
//!
//! Frames come from a JSONL file (see [`handwave_frame_model::parse_frames`])
//! and are delivered on a dedicated thread, paced by their capture
//! timestamps against a session clock unless pacing is turned off.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use handwave_common::clock::{FramePacer, SessionClock};
use handwave_common::error::{HandwaveError, HandwaveResult};
use handwave_frame_model::{parse_frames, GestureKind, SensorFrame};

use crate::{FrameListener, SensorController, SensorSource};

/// Longest single sleep while waiting for a frame, so a stop request is
/// noticed promptly.
const MAX_SLEEP_SLICE: Duration = Duration::from_millis(50);

/// In-memory sensor configuration used during replay.
#[derive(Debug, Clone, Default)]
pub struct ReplayController {
    values: BTreeMap<String, f64>,
    rejected_keys: HashSet<String>,
    saved: bool,
    enabled: Vec<GestureKind>,
}

impl ReplayController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse any attempt to set `key`.
    pub fn reject_key(mut self, key: impl Into<String>) -> Self {
        self.rejected_keys.insert(key.into());
        self
    }

    pub fn value(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn enabled_gestures(&self) -> &[GestureKind] {
        &self.enabled
    }
}

impl SensorController for ReplayController {
    fn set_config(&mut self, key: &str, value: f64) -> bool {
        if self.rejected_keys.contains(key) {
            return false;
        }
        self.values.insert(key.to_string(), value);
        self.saved = false;
        true
    }

    fn save_config(&mut self) -> bool {
        self.saved = true;
        true
    }

    fn enable_gesture(&mut self, kind: GestureKind) {
        if !self.enabled.contains(&kind) {
            self.enabled.push(kind);
        }
    }
}

/// Worker output: the listener comes back so it can be disconnected.
type Worker = JoinHandle<(Box<dyn FrameListener>, ReplayController)>;

/// A [`SensorSource`] backed by recorded frames.
pub struct ReplaySensor {
    frames: Arc<Vec<SensorFrame>>,
    paced: bool,
    controller: Option<ReplayController>,
    stop_flag: Arc<AtomicBool>,
    delivered: Arc<AtomicU64>,
    worker: Option<Worker>,
}

impl ReplaySensor {
    pub fn new(frames: Vec<SensorFrame>) -> Self {
        Self {
            frames: Arc::new(frames),
            paced: true,
            controller: Some(ReplayController::new()),
            stop_flag: Arc::new(AtomicBool::new(false)),
            delivered: Arc::new(AtomicU64::new(0)),
            worker: None,
        }
    }

    /// Load frames from a JSONL file.
    pub fn from_path(path: &Path) -> HandwaveResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => HandwaveError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => HandwaveError::Io(e),
        })?;
        let frames = parse_frames(&content)
            .map_err(|e| HandwaveError::frame_format(e.line, e.source.to_string()))?;

        tracing::info!(path = %path.display(), frames = frames.len(), "Loaded replay frames");
        Ok(Self::new(frames))
    }

    /// Deliver frames as fast as the listener consumes them.
    pub fn unpaced(mut self) -> Self {
        self.paced = false;
        self
    }

    /// Use a prepared controller for the connect handshake.
    pub fn with_controller(mut self, controller: ReplayController) -> Self {
        self.controller = Some(controller);
        self
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frames handed to the listener so far.
    pub fn frames_delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Controller state after the listener was detached.
    pub fn controller(&self) -> Option<&ReplayController> {
        self.controller.as_ref()
    }

    /// Wait for every frame to be delivered, then detach the listener.
    pub fn finish(&mut self) -> HandwaveResult<()> {
        self.detach()
    }

    fn detach(&mut self) -> HandwaveResult<()> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        let (mut listener, controller) = worker
            .join()
            .map_err(|_| HandwaveError::sensor("Replay thread panicked"))?;
        self.controller = Some(controller);
        listener.on_disconnect();
        Ok(())
    }
}

impl SensorSource for ReplaySensor {
    fn add_listener(&mut self, mut listener: Box<dyn FrameListener>) -> HandwaveResult<()> {
        if self.worker.is_some() {
            return Err(HandwaveError::sensor("Replay sensor already has a listener"));
        }

        let frames = Arc::clone(&self.frames);
        let stop_flag = Arc::clone(&self.stop_flag);
        let delivered = Arc::clone(&self.delivered);
        let paced = self.paced;
        let mut controller = self.controller.take().unwrap_or_default();
        stop_flag.store(false, Ordering::SeqCst);

        let worker = std::thread::Builder::new()
            .name("handwave-replay".to_string())
            .spawn(move || {
                listener.on_connect(&mut controller);
                replay_frames(listener.as_mut(), &frames, paced, &stop_flag, &delivered);
                (listener, controller)
            })?;

        tracing::info!(frames = self.frames.len(), paced, "Replay sensor started");
        self.worker = Some(worker);
        Ok(())
    }

    fn remove_listener(&mut self) -> HandwaveResult<()> {
        if self.worker.is_none() {
            return Ok(());
        }
        self.stop_flag.store(true, Ordering::SeqCst);
        self.detach()?;
        tracing::info!(frames = self.frames_delivered(), "Replay sensor stopped");
        Ok(())
    }
}

impl Drop for ReplaySensor {
    fn drop(&mut self) {
        if let Err(e) = self.remove_listener() {
            tracing::warn!(error = %e, "Failed to stop replay sensor");
        }
    }
}

fn replay_frames(
    listener: &mut dyn FrameListener,
    frames: &[SensorFrame],
    paced: bool,
    stop_flag: &AtomicBool,
    delivered: &AtomicU64,
) {
    let clock = SessionClock::start();
    let mut pacer = FramePacer::new();

    for frame in frames {
        if paced && !sleep_until_due(&clock, &mut pacer, frame, stop_flag) {
            break;
        }
        if stop_flag.load(Ordering::Relaxed) {
            break;
        }
        listener.on_frame(frame);
        delivered.fetch_add(1, Ordering::Relaxed);
    }

    tracing::debug!(
        delivered = delivered.load(Ordering::Relaxed),
        total = frames.len(),
        "Replay finished"
    );
}

/// Sleep until the frame is due. Returns `false` if stopped while waiting.
fn sleep_until_due(
    clock: &SessionClock,
    pacer: &mut FramePacer,
    frame: &SensorFrame,
    stop_flag: &AtomicBool,
) -> bool {
    loop {
        if stop_flag.load(Ordering::Relaxed) {
            return false;
        }
        let wait = pacer.wait_for(frame.timestamp_ns, clock.elapsed_ns());
        if wait.is_zero() {
            return true;
        }
        std::thread::sleep(wait.min(MAX_SLEEP_SLICE));
    }
}
