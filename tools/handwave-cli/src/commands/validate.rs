//! Validate a frame recording.

use std::collections::BTreeMap;
use std::path::PathBuf;

use handwave_common::clock::SessionClock;
use handwave_frame_model::parse_frames;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating frames at: {}", path.display());

    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let frames = parse_frames(&content).map_err(|e| anyhow::anyhow!("Invalid frame {e}"))?;

    let duration_ns = match (frames.first(), frames.last()) {
        (Some(first), Some(last)) => last.timestamp_ns.saturating_sub(first.timestamp_ns),
        _ => 0,
    };
    let max_hands = frames.iter().map(|f| f.hand_count()).max().unwrap_or(0);

    let mut gestures: BTreeMap<&str, usize> = BTreeMap::new();
    for gesture in frames.iter().flat_map(|f| &f.gestures) {
        *gestures.entry(gesture.kind().as_str()).or_default() += 1;
    }

    println!("  Frames: {}", frames.len());
    println!("  Duration: {:.3}s", SessionClock::ns_to_secs(duration_ns));
    println!("  Max hands in a frame: {max_hands}");
    if gestures.is_empty() {
        println!("  Gestures: none");
    } else {
        println!("  Gestures:");
        for (kind, count) in &gestures {
            println!("    {kind}: {count}");
        }
    }

    let out_of_order = frames
        .windows(2)
        .filter(|w| w[1].timestamp_ns < w[0].timestamp_ns)
        .count();
    if out_of_order == 0 {
        println!("\nRecording is valid.");
    } else {
        println!(
            "\n{out_of_order} frame(s) go back in time. Replay will deliver them without waiting."
        );
    }

    Ok(())
}
