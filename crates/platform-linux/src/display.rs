//! Display/monitor detection.

use std::path::Path;

use handwave_common::config::DisplayConfig;
use handwave_common::error::{HandwaveError, HandwaveResult};
use handwave_platform_core::{
    virtual_desktop_bounds, DisplayServer, FixedDisplay, MonitorInfo,
};

const DRM_CLASS_DIR: &str = "/sys/class/drm";

/// Detect connected monitors from the kernel's DRM connectors.
///
/// Each connected connector reports its modes with the preferred one first.
/// Connectors expose no desktop position, so monitors are laid out left to
/// right in connector order, the first one primary.
pub fn detect_monitors() -> HandwaveResult<Vec<MonitorInfo>> {
    detect_monitors_in(Path::new(DRM_CLASS_DIR))
}

/// Like [`detect_monitors`], reading connectors under `root`.
pub fn detect_monitors_in(root: &Path) -> HandwaveResult<Vec<MonitorInfo>> {
    tracing::debug!(root = %root.display(), "Detecting monitors");

    let mut connectors: Vec<_> = std::fs::read_dir(root)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.join("status").exists())
        .collect();
    connectors.sort();

    let mut monitors = Vec::new();
    let mut next_x = 0i32;
    for connector in connectors {
        let status = std::fs::read_to_string(connector.join("status")).unwrap_or_default();
        if status.trim() != "connected" {
            continue;
        }

        let modes = std::fs::read_to_string(connector.join("modes")).unwrap_or_default();
        let Some((width, height)) = modes.lines().find_map(parse_mode) else {
            tracing::debug!(connector = %connector.display(), "Connected without modes");
            continue;
        };

        let name = connector
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        monitors.push(MonitorInfo {
            name: connector_name(&name).to_string(),
            width,
            height,
            x: next_x,
            y: 0,
            scale_factor: 1.0,
            refresh_rate_hz: 60,
            primary: monitors.is_empty(),
        });
        next_x += width as i32;
    }

    Ok(monitors)
}

/// Parse a DRM mode line such as `1920x1080` or `1920x1080i`.
pub fn parse_mode(line: &str) -> Option<(u32, u32)> {
    let (w, h) = line.trim().split_once('x')?;
    let digits: String = h.chars().take_while(char::is_ascii_digit).collect();
    let width: u32 = w.parse().ok()?;
    let height: u32 = digits.parse().ok()?;
    (width > 0 && height > 0).then_some((width, height))
}

/// Strip the card prefix: `card0-HDMI-A-1` becomes `HDMI-A-1`.
fn connector_name(entry: &str) -> &str {
    entry.split_once('-').map_or(entry, |(_, rest)| rest)
}

/// Detect the current display server.
pub fn detect_display_server() -> DisplayServer {
    if std::env::var("WAYLAND_DISPLAY").is_ok() {
        DisplayServer::Wayland
    } else if std::env::var("DISPLAY").is_ok() {
        DisplayServer::X11
    } else {
        DisplayServer::Unknown
    }
}

/// Resolve the screen size once at startup.
///
/// A complete override in the config wins; otherwise the virtual desktop
/// spanning all detected monitors is used. Fails when neither is available.
pub fn resolve_display(config: &DisplayConfig) -> HandwaveResult<FixedDisplay> {
    resolve_display_in(config, Path::new(DRM_CLASS_DIR))
}

/// Like [`resolve_display`], reading connectors under `root`.
pub fn resolve_display_in(config: &DisplayConfig, root: &Path) -> HandwaveResult<FixedDisplay> {
    if let (Some(width), Some(height)) = (config.width, config.height) {
        tracing::info!(width, height, "Using configured screen size");
        return Ok(FixedDisplay { width, height });
    }

    let monitors = detect_monitors_in(root)
        .map_err(|e| HandwaveError::display(format!("Failed to detect monitors: {e}")))?;
    let (_, _, detected_width, detected_height) = virtual_desktop_bounds(&monitors)
        .ok_or_else(|| HandwaveError::display("No connected monitors found"))?;

    let width = config.width.unwrap_or(detected_width);
    let height = config.height.unwrap_or(detected_height);
    tracing::info!(monitors = monitors.len(), width, height, "Detected screen size");
    Ok(FixedDisplay { width, height })
}
