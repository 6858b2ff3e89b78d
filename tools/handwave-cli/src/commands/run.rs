//! Run the gesture controller against a replayed sensor.

use std::io::Read;
use std::path::PathBuf;

use handwave_common::config::AppConfig;
use handwave_gesture_core::sink::{shared, SharedSink};
use handwave_gesture_core::{DispatcherSettings, GestureFrameDispatcher};
use handwave_platform_core::DisplayGeometry;
use handwave_platform_linux::{resolve_display, UinputSink};
use handwave_sensor_bridge::{ActionLogSink, GestureListener, ReplaySensor, SensorSource};
use tokio::runtime::Handle;
use tokio::sync::oneshot;

pub async fn run(
    config: AppConfig,
    frames: PathBuf,
    dry_run: Option<PathBuf>,
    unpaced: bool,
) -> anyhow::Result<()> {
    let display = resolve_display(&config.display)?;
    let (width, height) = (display.screen_width(), display.screen_height());

    let mut sensor = ReplaySensor::from_path(&frames)?;
    if unpaced {
        sensor = sensor.unpaced();
    }

    let sink: SharedSink = match &dry_run {
        Some(path) => shared(ActionLogSink::create(path, width, height)?),
        None => shared(UinputSink::new(&display)?),
    };

    let dispatcher = GestureFrameDispatcher::new(
        DispatcherSettings::from_config(&config, width, height),
        sink,
        Handle::current(),
    );
    let listener = GestureListener::new(dispatcher, config.sensor.clone());

    println!("Handwave running");
    println!("  Frames: {} ({})", frames.display(), sensor.frame_count());
    println!("  Screen: {width}x{height}");
    if let Some(path) = &dry_run {
        println!("  Dry run, actions logged to: {}", path.display());
    }
    println!();
    println!("Press Ctrl+D or Ctrl+C to stop...");

    sensor.add_listener(Box::new(listener))?;

    let stdin_closed = watch_for_eof(std::io::stdin())?;
    tokio::select! {
        closed = stdin_closed => {
            if let Ok(Err(e)) = closed {
                tracing::warn!(error = %e, "Failed to read stdin");
            }
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
        }
    }

    sensor.remove_listener()?;
    println!();
    println!(
        "Stopped after {} of {} frames.",
        sensor.frames_delivered(),
        sensor.frame_count()
    );

    Ok(())
}

/// Drain `reader` on its own thread and report when it reaches EOF.
///
/// A blocking read cannot be cancelled, so it runs outside the runtime and
/// is abandoned when the process exits.
fn watch_for_eof<R>(mut reader: R) -> std::io::Result<oneshot::Receiver<std::io::Result<()>>>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    std::thread::Builder::new()
        .name("handwave-stdin".to_string())
        .spawn(move || {
            let drained = std::io::copy(&mut reader, &mut std::io::sink()).map(|_| ());
            let _ = tx.send(drained);
        })?;
    Ok(rx)
}
