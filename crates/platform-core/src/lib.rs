//! Handwave platform core contracts.
//!
//! Cross-platform display data structures and the screen geometry contract
//! used by the controller without coupling to a concrete OS backend.

use serde::{Deserialize, Serialize};

/// Information about a connected monitor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitorInfo {
    /// Monitor name/identifier.
    pub name: String,
    /// Resolution in physical pixels.
    pub width: u32,
    pub height: u32,
    /// Position in the virtual desktop (pixels).
    pub x: i32,
    pub y: i32,
    /// Scale factor (for example 1.0, 1.25, 2.0).
    pub scale_factor: f64,
    /// Refresh rate in Hz.
    pub refresh_rate_hz: u32,
    /// Whether this monitor is primary.
    pub primary: bool,
}

/// Display server / platform family the controller injects into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayServer {
    Wayland,
    X11,
    #[default]
    Unknown,
}

/// Screen size the pointer is scaled to.
///
/// Queried once at startup; the controller does not follow later
/// resolution changes.
pub trait DisplayGeometry {
    fn screen_width(&self) -> u32;
    fn screen_height(&self) -> u32;
}

/// Geometry with a known, fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDisplay {
    pub width: u32,
    pub height: u32,
}

impl DisplayGeometry for FixedDisplay {
    fn screen_width(&self) -> u32 {
        self.width
    }

    fn screen_height(&self) -> u32 {
        self.height
    }
}

/// Compute virtual desktop bounds that include all connected monitors.
/// Returns `(min_x, min_y, width, height)` in physical pixels, or `None`
/// when there are no monitors.
pub fn virtual_desktop_bounds(monitors: &[MonitorInfo]) -> Option<(i32, i32, u32, u32)> {
    let min_x = monitors.iter().map(|m| m.x).min()?;
    let min_y = monitors.iter().map(|m| m.y).min()?;
    let max_x = monitors.iter().map(|m| m.x + m.width as i32).max()?;
    let max_y = monitors.iter().map(|m| m.y + m.height as i32).max()?;

    let width = (max_x - min_x).max(1) as u32;
    let height = (max_y - min_y).max(1) as u32;
    Some((min_x, min_y, width, height))
}

impl DisplayGeometry for [MonitorInfo] {
    fn screen_width(&self) -> u32 {
        virtual_desktop_bounds(self).map_or(0, |(_, _, w, _)| w)
    }

    fn screen_height(&self) -> u32 {
        virtual_desktop_bounds(self).map_or(0, |(_, _, _, h)| h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor(name: &str, width: u32, height: u32, x: i32, primary: bool) -> MonitorInfo {
        MonitorInfo {
            name: name.to_string(),
            width,
            height,
            x,
            y: 0,
            scale_factor: 1.0,
            refresh_rate_hz: 60,
            primary,
        }
    }

    #[test]
    fn test_virtual_bounds_cover_negative_origin_layout() {
        let monitors = vec![
            monitor("left", 1920, 1080, -1920, false),
            monitor("main", 2560, 1440, 0, true),
        ];

        let (x, y, w, h) = virtual_desktop_bounds(&monitors).unwrap();
        assert_eq!(x, -1920);
        assert_eq!(y, 0);
        assert_eq!(w, 4480);
        assert_eq!(h, 1440);

        assert_eq!(monitors.screen_width(), 4480);
        assert_eq!(monitors.screen_height(), 1440);
    }

    #[test]
    fn test_no_monitors_have_no_bounds() {
        assert_eq!(virtual_desktop_bounds(&[]), None);
        let none: &[MonitorInfo] = &[];
        assert_eq!(none.screen_width(), 0);
    }

    #[test]
    fn test_fixed_display_reports_its_size() {
        let display = FixedDisplay {
            width: 1280,
            height: 800,
        };
        assert_eq!(display.screen_width(), 1280);
        assert_eq!(display.screen_height(), 800);
    }
}
