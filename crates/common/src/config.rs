//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Pointer hysteresis tuning.
    pub pointer: PointerConfig,

    /// Two-hand zoom tuning.
    pub zoom: ZoomConfig,

    /// Debounce window for one-shot actions.
    pub actions: ActionConfig,

    /// Application switcher timing.
    pub app_switch: AppSwitchConfig,

    /// What open-hand swipes do.
    pub swipe: SwipeConfig,

    /// Gesture recognition options pushed to the sensor on connect.
    pub sensor: SensorConfig,

    /// Screen geometry override.
    pub display: DisplayConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Pointer stabilizer thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Distance (px) a resting pointer must be asked to travel before it moves.
    pub move_threshold_px: f64,

    /// Horizontal displacement (px) that keeps a moving pointer in the moving state.
    pub min_move_px: f64,

    /// Time (ms) without a real move after which the pointer is at rest.
    pub stop_timeout_ms: u64,
}

/// Zoom tracker thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Change in hand distance (mm) that counts as a zoom step.
    pub threshold_mm: f64,

    /// Minimum time (ms) between two zoom decisions.
    pub function_duration_ms: u64,

    /// Pause (ms) after which the baseline distance is forgotten.
    pub reset_timeout_ms: u64,
}

/// One-shot action debounce.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    pub debounce_ms: u64,
}

/// Application switcher timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSwitchConfig {
    /// How long (ms) the switcher modifier stays held after the last step.
    pub release_timeout_ms: u64,

    /// Minimum time (ms) between two switcher steps.
    pub min_interval_ms: u64,
}

/// Target of classified open-hand swipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SwipeMode {
    /// Move to the next/previous workspace.
    #[default]
    Workspace,
    /// Step through the application switcher.
    AppSwitcher,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SwipeConfig {
    pub mode: SwipeMode,
}

/// Gesture options written to the sensor during the connect handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Minimum arc (radians) for a circle gesture.
    pub min_circle_arc_rad: f64,

    /// Minimum radius (mm) for a circle gesture.
    pub min_circle_radius_mm: f64,

    /// Minimum length (mm) for a swipe gesture.
    pub min_swipe_length_mm: f64,
}

/// Screen size override; detected geometry is used when unset.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "handwave=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            move_threshold_px: 150.0,
            min_move_px: 2.0,
            stop_timeout_ms: 500,
        }
    }
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            threshold_mm: 20.0,
            function_duration_ms: 200,
            reset_timeout_ms: 2000,
        }
    }
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}

impl Default for AppSwitchConfig {
    fn default() -> Self {
        Self {
            release_timeout_ms: 1500,
            min_interval_ms: 500,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            min_circle_arc_rad: 2.0 * std::f64::consts::PI,
            min_circle_radius_mm: 100.0,
            min_swipe_length_mm: 150.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Convert a millisecond setting to nanoseconds.
pub fn ms_to_ns(ms: u64) -> u64 {
    ms.saturating_mul(1_000_000)
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("handwave").join("config.json")
}
