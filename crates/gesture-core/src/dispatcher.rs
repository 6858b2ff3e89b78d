//! Per-frame gesture dispatch.
//!
//! Routing by hand and finger count:
//!
//! | Hands | Fingers | Handling |
//! |---|---|---|
//! | 0 | - | ignored |
//! | 2+ | - | zoom from the distance between the outermost hands |
//! | 1 | 0-2 | key-tap click, circle toggles activities, fingertip drives the pointer |
//! | 1 | 3-4 | nothing (ambiguous pose) |
//! | 1 | 5+ | swipe cluster moves workspace or steps the app switcher |

use handwave_common::config::{ms_to_ns, AppConfig, SwipeMode};
use handwave_common::error::HandwaveResult;
use handwave_frame_model::{Gesture, Point2D, SensorFrame};
use tokio::runtime::Handle;

use crate::app_switch::{AppSwitchTuning, AppSwitcher, SwitchDirection};
use crate::debounce::{ActionId, DebounceGate};
use crate::pointer::{PointerStabilizer, PointerTuning};
use crate::sink::{self, InputSink, SharedSink};
use crate::swipe::{SwipeClusterClassifier, SwipeSignal};
use crate::zoom::{ZoomDecision, ZoomTracker, ZoomTuning};

/// Fewer fingers than this drive the pointer.
const POINTER_MAX_FINGERS: usize = 2;
/// More fingers than this make an open-hand sweep.
const SWEEP_MIN_FINGERS: usize = 5;

/// Everything the dispatcher needs to know up front.
#[derive(Debug, Clone)]
pub struct DispatcherSettings {
    pub pointer: PointerTuning,
    pub zoom: ZoomTuning,
    pub app_switch: AppSwitchTuning,
    /// Debounce window for one-shot actions.
    pub action_interval_ns: u64,
    pub swipe_mode: SwipeMode,
    pub screen_width: u32,
    pub screen_height: u32,
}

impl DispatcherSettings {
    pub fn from_config(config: &AppConfig, screen_width: u32, screen_height: u32) -> Self {
        Self {
            pointer: PointerTuning::from(&config.pointer),
            zoom: ZoomTuning::from(&config.zoom),
            app_switch: AppSwitchTuning::from(&config.app_switch),
            action_interval_ns: ms_to_ns(config.actions.debounce_ms),
            swipe_mode: config.swipe.mode,
            screen_width,
            screen_height,
        }
    }
}

/// Top-level per-frame controller.
pub struct GestureFrameDispatcher {
    settings: DispatcherSettings,
    sink: SharedSink,
    pointer: PointerStabilizer,
    zoom: ZoomTracker,
    swipes: SwipeClusterClassifier,
    gate: DebounceGate,
    app_switcher: AppSwitcher,
}

impl GestureFrameDispatcher {
    /// Create a dispatcher. `runtime` hosts the app-switcher release timer.
    pub fn new(settings: DispatcherSettings, sink: SharedSink, runtime: Handle) -> Self {
        tracing::info!(
            sink = %sink::lock(&sink).name(),
            width = settings.screen_width,
            height = settings.screen_height,
            swipe_mode = ?settings.swipe_mode,
            "Gesture dispatcher ready"
        );

        Self {
            pointer: PointerStabilizer::new(settings.pointer),
            zoom: ZoomTracker::new(settings.zoom),
            swipes: SwipeClusterClassifier::new(),
            gate: DebounceGate::new(),
            app_switcher: AppSwitcher::new(sink.clone(), runtime, settings.app_switch),
            sink,
            settings,
        }
    }

    /// Interpret one frame. Injection failures are logged and stay local to
    /// the action that hit them.
    pub fn on_frame(&mut self, frame: &SensorFrame) {
        match frame.hand_count() {
            0 => {}
            1 => self.handle_one_hand(frame),
            _ => self.handle_two_hands(frame),
        }
    }

    /// Release anything still held. Called when the listener detaches.
    pub fn shutdown(&mut self) {
        if let Err(e) = self.app_switcher.release_now() {
            tracing::warn!(error = %e, "Failed to release held keys on shutdown");
        }
    }

    fn handle_two_hands(&mut self, frame: &SensorFrame) {
        let (Some(left), Some(right)) = (frame.leftmost_hand(), frame.rightmost_hand()) else {
            return;
        };
        let (Some(a), Some(b)) = (
            frame.frontmost_pointable_of(left),
            frame.frontmost_pointable_of(right),
        ) else {
            tracing::trace!("Two hands without pointables, skipping zoom");
            return;
        };

        let distance = a.stabilized_tip().distance_to(&b.stabilized_tip());
        let combo = match self.zoom.update(distance, frame.timestamp_ns) {
            ZoomDecision::Increase => sink::ZOOM_IN_COMBO,
            ZoomDecision::Decrease => sink::ZOOM_OUT_COMBO,
            ZoomDecision::Hold => return,
        };

        tracing::debug!(distance, ?combo, "Zoom step");
        inject(&self.sink, "zoom", |s| sink::press_combo(s, combo));
    }

    fn handle_one_hand(&mut self, frame: &SensorFrame) {
        let fingers = frame.finger_count();

        if fingers <= POINTER_MAX_FINGERS {
            for gesture in &frame.gestures {
                match gesture {
                    Gesture::KeyTap => {
                        tracing::debug!("Click");
                        inject(&self.sink, "click", |s| s.click_primary());
                        return;
                    }
                    Gesture::Circle => self.debounced(
                        ActionId::ToggleActivities,
                        frame,
                        sink::ACTIVITIES_COMBO,
                    ),
                    Gesture::ScreenTap | Gesture::Swipe { .. } => {}
                }
            }
            self.follow_fingertip(frame);
        } else if fingers >= SWEEP_MIN_FINGERS {
            let rolls = frame.swipe_rolls();
            if rolls.is_empty() {
                return;
            }
            for signal in self.swipes.classify(&rolls) {
                self.on_swipe(signal, frame);
            }
        }
    }

    fn follow_fingertip(&mut self, frame: &SensorFrame) {
        let Some(pointable) = frame.frontmost_pointable() else {
            return;
        };

        let normalized = frame
            .interaction_box
            .normalize(&pointable.tip_position, true);
        let width = f64::from(self.settings.screen_width);
        let height = f64::from(self.settings.screen_height);
        // Sensor Y grows upward, screen Y grows downward.
        let target = Point2D::new(normalized.x * width, height - normalized.y * height);

        let current = sink::lock(&self.sink)
            .pointer_position()
            .map(|(x, y)| Point2D::new(x, y))
            .unwrap_or(self.pointer.state().last_position);

        if let Some(position) = self.pointer.update(target, current, frame.timestamp_ns) {
            inject(&self.sink, "move-pointer", |s| {
                s.move_pointer(position.x, position.y)
            });
        }
    }

    fn on_swipe(&mut self, signal: SwipeSignal, frame: &SensorFrame) {
        match (self.settings.swipe_mode, signal) {
            (SwipeMode::Workspace, SwipeSignal::Next) => {
                self.debounced(ActionId::MoveNextDesktop, frame, sink::NEXT_DESKTOP_COMBO)
            }
            (SwipeMode::Workspace, SwipeSignal::Previous) => self.debounced(
                ActionId::MovePreviousDesktop,
                frame,
                sink::PREVIOUS_DESKTOP_COMBO,
            ),
            (SwipeMode::AppSwitcher, signal) => {
                let direction = match signal {
                    SwipeSignal::Next => SwitchDirection::Forward,
                    SwipeSignal::Previous => SwitchDirection::Backward,
                };
                if let Err(e) = self.app_switcher.step(direction, frame.timestamp_ns) {
                    tracing::warn!(error = %e, "App switcher step failed");
                }
            }
        }
    }

    fn debounced(&mut self, id: ActionId, frame: &SensorFrame, combo: &[sink::KeySym]) {
        let sink = &self.sink;
        let fired = self
            .gate
            .attempt(id, self.settings.action_interval_ns, frame.timestamp_ns, || {
                inject(sink, id.as_str(), |s| sink::press_combo(s, combo))
            });
        if fired {
            tracing::info!(action = id.as_str(), "Action fired");
        }
    }
}

/// Run one injection, logging instead of propagating failure.
fn inject<F>(sink: &SharedSink, action: &str, f: F)
where
    F: FnOnce(&mut dyn InputSink) -> HandwaveResult<()>,
{
    let mut guard = sink::lock(sink);
    if let Err(e) = f(&mut *guard) {
        tracing::warn!(action, sink = %guard.name(), error = %e, "Input injection failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{KeySym, RecordingSink, SinkCall};
    use handwave_frame_model::{Hand, InteractionBox, Pointable, Vector3};

    const MS: u64 = 1_000_000;

    fn dispatcher(sink: &RecordingSink, mode: SwipeMode) -> GestureFrameDispatcher {
        let mut config = AppConfig::default();
        config.swipe.mode = mode;
        GestureFrameDispatcher::new(
            DispatcherSettings::from_config(&config, 1000, 1000),
            sink::shared(sink.clone()),
            Handle::current(),
        )
    }

    fn one_hand(t: u64, fingers: usize, gestures: Vec<Gesture>) -> SensorFrame {
        SensorFrame {
            timestamp_ns: t,
            hands: vec![Hand {
                id: 1,
                palm_position: Vector3::new(0.0, 200.0, 0.0),
            }],
            pointables: (0..fingers)
                .map(|i| Pointable::finger(i as i32, 1, Vector3::new(0.0, 200.0, i as f64)))
                .collect(),
            gestures,
            interaction_box: InteractionBox {
                center: Vector3::new(0.0, 200.0, 0.0),
                size: Vector3::new(200.0, 200.0, 200.0),
            },
        }
    }

    #[tokio::test]
    async fn test_fingertip_maps_to_flipped_screen_coordinates() {
        let sink = RecordingSink::new();
        let mut d = dispatcher(&sink, SwipeMode::Workspace);
        let mut frame = one_hand(0, 1, vec![]);
        // Right and high in the box: right and near the top of the screen.
        frame.pointables[0].tip_position = Vector3::new(50.0, 250.0, 0.0);
        d.on_frame(&frame);
        assert_eq!(sink.moves(), vec![(750.0, 250.0)]);
    }

    #[tokio::test]
    async fn test_circle_toggles_activities_once_per_window() {
        let sink = RecordingSink::new();
        let mut d = dispatcher(&sink, SwipeMode::Workspace);
        for i in 0..10 {
            d.on_frame(&one_hand(i * 16 * MS, 1, vec![Gesture::Circle]));
        }
        let presses = sink
            .calls()
            .iter()
            .filter(|c| **c == SinkCall::Press { key: KeySym::SuperLeft })
            .count();
        assert_eq!(presses, 1);
    }

    #[tokio::test]
    async fn test_middle_finger_counts_do_nothing() {
        let sink = RecordingSink::new();
        let mut d = dispatcher(&sink, SwipeMode::Workspace);
        d.on_frame(&one_hand(0, 3, vec![Gesture::KeyTap]));
        d.on_frame(&one_hand(MS, 4, vec![Gesture::Circle]));
        assert!(sink.calls().is_empty());
    }

    #[tokio::test]
    async fn test_swipes_step_app_switcher_in_switcher_mode() {
        let sink = RecordingSink::new();
        let mut d = dispatcher(&sink, SwipeMode::AppSwitcher);
        let swipes = [0.1, 0.05, 0.08].map(Gesture::swipe_with_roll).to_vec();
        d.on_frame(&one_hand(0, 5, swipes));
        assert_eq!(
            sink.calls()[..2],
            [
                SinkCall::Press { key: KeySym::AltLeft },
                SinkCall::Press { key: KeySym::Tab },
            ]
        );
        d.shutdown();
        assert_eq!(
            sink.calls().last(),
            Some(&SinkCall::Sync),
        );
        assert!(sink
            .calls()
            .contains(&SinkCall::Release { key: KeySym::AltLeft }));
    }

    #[tokio::test]
    async fn test_failed_injection_does_not_poison_later_frames() {
        let sink = RecordingSink::new();
        let mut d = dispatcher(&sink, SwipeMode::Workspace);
        sink.set_failing(true);
        d.on_frame(&one_hand(0, 1, vec![Gesture::KeyTap]));
        sink.set_failing(false);
        d.on_frame(&one_hand(16 * MS, 1, vec![Gesture::KeyTap]));
        assert_eq!(sink.clicks(), 1);
    }

    #[tokio::test]
    async fn test_two_hands_without_pointables_skip_zoom() {
        let sink = RecordingSink::new();
        let mut d = dispatcher(&sink, SwipeMode::Workspace);
        let mut frame = one_hand(0, 0, vec![]);
        frame.hands.push(Hand {
            id: 2,
            palm_position: Vector3::new(100.0, 200.0, 0.0),
        });
        d.on_frame(&frame);
        assert!(sink.calls().is_empty());
    }
}
