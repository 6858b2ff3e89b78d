use std::path::PathBuf;

use handwave_common::config::AppConfig;
use handwave_frame_model::GestureKind;
use handwave_gesture_core::sink::{shared, KeySym, RecordingSink, SinkCall};
use handwave_gesture_core::{DispatcherSettings, GestureFrameDispatcher};
use handwave_sensor_bridge::action_log::read_action_log;
use handwave_sensor_bridge::listener::{
    CIRCLE_MIN_ARC_KEY, CIRCLE_MIN_RADIUS_KEY, SWIPE_MIN_LENGTH_KEY,
};
use handwave_sensor_bridge::{
    ActionLogSink, GestureListener, ReplayController, ReplaySensor, SensorSource,
};
use tokio::runtime::Handle;

/// A one-handed session: pointer, a tap, then an open-hand sweep.
const SESSION: &str = r#"# recorded session
{"t":0,"hands":[{"id":1,"palm_position":{"x":0,"y":200,"z":0}}],"pointables":[{"id":0,"hand_id":1,"tip_position":{"x":0,"y":220,"z":-5}}]}
{"t":16000000,"hands":[{"id":1,"palm_position":{"x":0,"y":200,"z":0}}],"pointables":[{"id":0,"hand_id":1,"tip_position":{"x":0,"y":220,"z":-5}}],"gestures":[{"type":"key_tap"}]}

{"t":32000000}
{"t":48000000,"hands":[{"id":1,"palm_position":{"x":0,"y":200,"z":0}}],"pointables":[{"id":0,"hand_id":1,"tip_position":{"x":0,"y":220,"z":-5}},{"id":1,"hand_id":1,"tip_position":{"x":10,"y":220,"z":-5}},{"id":2,"hand_id":1,"tip_position":{"x":20,"y":220,"z":-5}},{"id":3,"hand_id":1,"tip_position":{"x":30,"y":220,"z":-5}},{"id":4,"hand_id":1,"tip_position":{"x":40,"y":220,"z":-5}}],"gestures":[{"type":"swipe","direction":{"x":0.1,"y":-1,"z":0}},{"type":"swipe","direction":{"x":0.05,"y":-1,"z":0}},{"type":"swipe","direction":{"x":0.08,"y":-1,"z":0}}]}
"#;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("handwave-{}-{name}", std::process::id()))
}

fn write_session(name: &str) -> PathBuf {
    let path = temp_path(name);
    std::fs::write(&path, SESSION).unwrap();
    path
}

fn listener(sink: handwave_gesture_core::SharedSink) -> GestureListener {
    let config = AppConfig::default();
    let dispatcher = GestureFrameDispatcher::new(
        DispatcherSettings::from_config(&config, 1920, 1080),
        sink,
        Handle::current(),
    );
    GestureListener::new(dispatcher, config.sensor)
}

#[tokio::test]
async fn test_replay_drives_dispatcher_end_to_end() {
    let path = write_session("session.jsonl");
    let mut sensor = ReplaySensor::from_path(&path).unwrap().unpaced();
    std::fs::remove_file(&path).ok();
    assert_eq!(sensor.frame_count(), 4);

    let sink = RecordingSink::new();
    sensor
        .add_listener(Box::new(listener(shared(sink.clone()))))
        .unwrap();
    sensor.finish().unwrap();

    assert_eq!(sensor.frames_delivered(), 4);
    assert_eq!(sink.moves().len(), 1);
    assert_eq!(sink.clicks(), 1);
    let down_presses = sink
        .calls()
        .iter()
        .filter(|c| **c == SinkCall::Press { key: KeySym::Down })
        .count();
    assert_eq!(down_presses, 1);

    let controller = sensor.controller().unwrap();
    assert!(controller.is_saved());
    assert_eq!(controller.value(SWIPE_MIN_LENGTH_KEY), Some(150.0));
    assert_eq!(controller.enabled_gestures(), GestureKind::ALL);
}

#[tokio::test]
async fn test_rejected_setting_skips_save_but_enables_gestures() {
    let controller = ReplayController::new().reject_key(CIRCLE_MIN_RADIUS_KEY);
    let mut sensor = ReplaySensor::new(vec![]).with_controller(controller);

    sensor
        .add_listener(Box::new(listener(shared(RecordingSink::new()))))
        .unwrap();
    sensor.remove_listener().unwrap();

    let controller = sensor.controller().unwrap();
    assert!(!controller.is_saved());
    assert!(controller.value(CIRCLE_MIN_ARC_KEY).is_some());
    assert_eq!(controller.value(SWIPE_MIN_LENGTH_KEY), None);
    assert_eq!(controller.enabled_gestures().len(), 4);
}

#[tokio::test]
async fn test_dry_run_writes_one_line_per_action() {
    let frames_path = write_session("dry-run.jsonl");
    let log_path = temp_path("actions.jsonl");
    let mut sensor = ReplaySensor::from_path(&frames_path).unwrap().unpaced();
    std::fs::remove_file(&frames_path).ok();

    let sink = ActionLogSink::create(&log_path, 1920, 1080).unwrap();
    sensor.add_listener(Box::new(listener(shared(sink)))).unwrap();
    sensor.finish().unwrap();
    drop(sensor);

    let records = read_action_log(&log_path).unwrap();
    std::fs::remove_file(&log_path).ok();

    // Move, click, then Ctrl+Alt+Down as press/press/press/sync/release x3/sync.
    assert_eq!(records.len(), 10);
    assert!(matches!(records[0].call, SinkCall::MovePointer { .. }));
    assert_eq!(records[1].call, SinkCall::Click);
    assert_eq!(records[9].call, SinkCall::Sync);
}
