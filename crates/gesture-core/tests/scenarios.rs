use handwave_common::config::AppConfig;
use handwave_frame_model::{Gesture, Hand, InteractionBox, Pointable, SensorFrame, Vector3};
use handwave_gesture_core::sink::{shared, KeySym, RecordingSink, SinkCall};
use handwave_gesture_core::{DispatcherSettings, GestureFrameDispatcher};
use tokio::runtime::Handle;

const MS: u64 = 1_000_000;

fn dispatcher(sink: &RecordingSink) -> GestureFrameDispatcher {
    GestureFrameDispatcher::new(
        DispatcherSettings::from_config(&AppConfig::default(), 1920, 1080),
        shared(sink.clone()),
        Handle::current(),
    )
}

fn hand(id: i32, x: f64) -> Hand {
    Hand {
        id,
        palm_position: Vector3::new(x, 200.0, 0.0),
    }
}

fn single_hand_frame(t: u64, fingers: usize, gestures: Vec<Gesture>) -> SensorFrame {
    SensorFrame {
        timestamp_ns: t,
        hands: vec![hand(1, 0.0)],
        pointables: (0..fingers)
            .map(|i| Pointable::finger(i as i32, 1, Vector3::new(10.0 * i as f64, 220.0, -5.0)))
            .collect(),
        gestures,
        interaction_box: InteractionBox::default(),
    }
}

/// Two hands whose frontmost fingertips are `distance` mm apart along X.
fn two_hand_frame(t: u64, distance: f64) -> SensorFrame {
    let half = distance / 2.0;
    let mut left = Pointable::finger(10, 1, Vector3::new(-half, 250.0, 0.0));
    left.stabilized_tip_position = Some(Vector3::new(-half, 250.0, 0.0));
    let mut right = Pointable::finger(20, 2, Vector3::new(half, 250.0, 0.0));
    right.stabilized_tip_position = Some(Vector3::new(half, 250.0, 0.0));

    SensorFrame {
        timestamp_ns: t,
        hands: vec![hand(2, 80.0), hand(1, -80.0)],
        pointables: vec![
            left,
            Pointable::finger(11, 1, Vector3::new(-half - 30.0, 250.0, 40.0)),
            right,
        ],
        gestures: vec![],
        interaction_box: InteractionBox::default(),
    }
}

fn zoom_in_calls() -> Vec<SinkCall> {
    vec![
        SinkCall::Press { key: KeySym::ControlLeft },
        SinkCall::Press { key: KeySym::Plus },
        SinkCall::Sync,
        SinkCall::Release { key: KeySym::ControlLeft },
        SinkCall::Release { key: KeySym::Plus },
        SinkCall::Sync,
    ]
}

#[tokio::test]
async fn test_key_tap_clicks_without_moving_pointer() {
    let sink = RecordingSink::new();
    let mut dispatcher = dispatcher(&sink);

    dispatcher.on_frame(&single_hand_frame(0, 2, vec![Gesture::KeyTap]));

    assert_eq!(sink.calls(), vec![SinkCall::Click]);
}

#[tokio::test]
async fn test_zoom_inside_rate_window_is_ignored() {
    let sink = RecordingSink::new();
    let mut dispatcher = dispatcher(&sink);

    dispatcher.on_frame(&two_hand_frame(0, 40.0));
    dispatcher.on_frame(&two_hand_frame(100 * MS, 65.0));

    assert!(sink.calls().is_empty());
}

#[tokio::test]
async fn test_zoom_after_rate_window_steps_in() {
    let sink = RecordingSink::new();
    let mut dispatcher = dispatcher(&sink);

    dispatcher.on_frame(&two_hand_frame(0, 40.0));
    dispatcher.on_frame(&two_hand_frame(250 * MS, 65.0));

    assert_eq!(sink.calls(), zoom_in_calls());
}

#[tokio::test]
async fn test_zoom_pause_recalibrates_instead_of_jumping() {
    let sink = RecordingSink::new();
    let mut dispatcher = dispatcher(&sink);

    dispatcher.on_frame(&two_hand_frame(0, 40.0));
    dispatcher.on_frame(&two_hand_frame(3_000 * MS, 200.0));
    assert!(sink.calls().is_empty());

    dispatcher.on_frame(&two_hand_frame(3_300 * MS, 150.0));
    assert_eq!(sink.calls()[1], SinkCall::Press { key: KeySym::Minus });
}

#[tokio::test]
async fn test_open_hand_sweep_moves_to_next_desktop_once() {
    let sink = RecordingSink::new();
    let mut dispatcher = dispatcher(&sink);

    let swipes = vec![
        Gesture::swipe_with_roll(0.1),
        Gesture::swipe_with_roll(0.05),
        Gesture::swipe_with_roll(0.08),
    ];
    dispatcher.on_frame(&single_hand_frame(0, 5, swipes));

    assert_eq!(
        sink.calls(),
        vec![
            SinkCall::Press { key: KeySym::ControlLeft },
            SinkCall::Press { key: KeySym::AltLeft },
            SinkCall::Press { key: KeySym::Down },
            SinkCall::Sync,
            SinkCall::Release { key: KeySym::ControlLeft },
            SinkCall::Release { key: KeySym::AltLeft },
            SinkCall::Release { key: KeySym::Down },
            SinkCall::Sync,
        ]
    );
}

#[tokio::test]
async fn test_sweep_held_over_frames_is_debounced() {
    let sink = RecordingSink::new();
    let mut dispatcher = dispatcher(&sink);

    let swipes: Vec<Gesture> = [2.9, 3.0, 2.95, 3.05]
        .into_iter()
        .map(Gesture::swipe_with_roll)
        .collect();
    for i in 0..10 {
        dispatcher.on_frame(&single_hand_frame(i * 20 * MS, 5, swipes.clone()));
    }

    let up_presses = sink
        .calls()
        .iter()
        .filter(|c| **c == SinkCall::Press { key: KeySym::Up })
        .count();
    assert_eq!(up_presses, 1);
}

#[tokio::test]
async fn test_dead_zone_sweep_does_nothing() {
    let sink = RecordingSink::new();
    let mut dispatcher = dispatcher(&sink);

    let swipes = vec![
        Gesture::swipe_with_roll(1.5),
        Gesture::swipe_with_roll(1.6),
        Gesture::swipe_with_roll(1.55),
    ];
    dispatcher.on_frame(&single_hand_frame(0, 5, swipes));

    assert!(sink.calls().is_empty());
}

#[tokio::test]
async fn test_empty_frame_touches_nothing() {
    let sink = RecordingSink::new();
    let mut dispatcher = dispatcher(&sink);

    dispatcher.on_frame(&SensorFrame::at(0));
    dispatcher.on_frame(&SensorFrame::at(16 * MS));

    assert!(sink.calls().is_empty());
}

#[tokio::test]
async fn test_resting_fingertip_jitter_leaves_pointer_alone() {
    let sink = RecordingSink::new();
    let mut dispatcher = dispatcher(&sink);

    // First sample jumps the pointer from the origin.
    dispatcher.on_frame(&single_hand_frame(0, 1, vec![]));
    assert_eq!(sink.moves().len(), 1);

    // A second later the hand is at rest; 1mm of drift is ~8px on screen.
    let mut frame = single_hand_frame(1_000 * MS, 1, vec![]);
    frame.pointables[0].tip_position.x += 1.0;
    dispatcher.on_frame(&frame);
    assert_eq!(sink.moves().len(), 1);
}

#[tokio::test]
async fn test_two_hand_frames_never_move_pointer() {
    let sink = RecordingSink::new();
    let mut dispatcher = dispatcher(&sink);

    let mut frame = two_hand_frame(0, 40.0);
    frame.gestures.push(Gesture::KeyTap);
    dispatcher.on_frame(&frame);

    assert!(sink.moves().is_empty());
    assert_eq!(sink.clicks(), 0);
}
