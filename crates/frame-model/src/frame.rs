//! Sensor frame types.
//!
//! A frame is an immutable snapshot of everything the sensor tracked at one
//! instant: hands, pointables (fingers and tools), recognized gestures, and
//! the interaction box used to normalize positions.

use serde::{Deserialize, Serialize};

use crate::geometry::{InteractionBox, Vector3};

/// Monotonic capture timestamp in nanoseconds.
pub type TimestampNs = u64;

/// A tracked hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub id: i32,
    /// Palm center (mm); used to order hands left to right.
    pub palm_position: Vector3,
}

/// A tracked finger or tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pointable {
    pub id: i32,
    /// Owning hand, if the sensor attributed one.
    #[serde(default)]
    pub hand_id: Option<i32>,
    /// Fingers count toward the frame's finger count; tools do not.
    #[serde(default = "default_is_finger")]
    pub is_finger: bool,
    /// Raw tip position (mm).
    pub tip_position: Vector3,
    /// Tip position smoothed by the sensor (mm). Falls back to the raw tip.
    #[serde(default)]
    pub stabilized_tip_position: Option<Vector3>,
}

fn default_is_finger() -> bool {
    true
}

impl Pointable {
    pub fn finger(id: i32, hand_id: i32, tip_position: Vector3) -> Self {
        Self {
            id,
            hand_id: Some(hand_id),
            is_finger: true,
            tip_position,
            stabilized_tip_position: None,
        }
    }

    pub fn stabilized_tip(&self) -> Vector3 {
        self.stabilized_tip_position.unwrap_or(self.tip_position)
    }
}

/// A gesture recognized by the sensor within one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Gesture {
    /// A fingertip traced a full circle.
    Circle,
    /// A finger tapped downward, like pressing a key.
    KeyTap,
    /// A finger poked forward, like touching a screen.
    ScreenTap,
    /// The hand swept in a straight line.
    Swipe {
        /// Unit direction of travel.
        direction: Vector3,
    },
}

/// Gesture type discriminant, used when enabling recognition on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Circle,
    KeyTap,
    ScreenTap,
    Swipe,
}

impl GestureKind {
    /// Every gesture type the controller reacts to.
    pub const ALL: [GestureKind; 4] = [
        GestureKind::Circle,
        GestureKind::ScreenTap,
        GestureKind::KeyTap,
        GestureKind::Swipe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::KeyTap => "key_tap",
            Self::ScreenTap => "screen_tap",
            Self::Swipe => "swipe",
        }
    }
}

impl Gesture {
    /// Create a swipe travelling along the given roll angle.
    pub fn swipe_with_roll(roll: f64) -> Self {
        Self::Swipe {
            direction: Vector3::from_roll(roll),
        }
    }

    pub fn kind(&self) -> GestureKind {
        match self {
            Self::Circle => GestureKind::Circle,
            Self::KeyTap => GestureKind::KeyTap,
            Self::ScreenTap => GestureKind::ScreenTap,
            Self::Swipe { .. } => GestureKind::Swipe,
        }
    }

    /// Roll angle of a swipe's direction; `None` for other gestures.
    pub fn swipe_roll(&self) -> Option<f64> {
        match self {
            Self::Swipe { direction } => Some(direction.roll()),
            Self::Circle | Self::KeyTap | Self::ScreenTap => None,
        }
    }
}

/// One snapshot of tracking data, delivered once per sensor callback.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorFrame {
    /// Monotonic capture time.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    #[serde(default)]
    pub hands: Vec<Hand>,

    #[serde(default)]
    pub pointables: Vec<Pointable>,

    #[serde(default)]
    pub gestures: Vec<Gesture>,

    #[serde(default)]
    pub interaction_box: InteractionBox,
}

impl SensorFrame {
    /// Create an empty frame at the given time.
    pub fn at(timestamp_ns: TimestampNs) -> Self {
        Self {
            timestamp_ns,
            ..Self::default()
        }
    }

    pub fn hand_count(&self) -> usize {
        self.hands.len()
    }

    /// Number of tracked fingers across all hands (tools excluded).
    pub fn finger_count(&self) -> usize {
        self.pointables.iter().filter(|p| p.is_finger).count()
    }

    /// The pointable closest to the screen (smallest Z).
    pub fn frontmost_pointable(&self) -> Option<&Pointable> {
        frontmost(self.pointables.iter())
    }

    /// The frontmost pointable belonging to a specific hand.
    pub fn frontmost_pointable_of(&self, hand: &Hand) -> Option<&Pointable> {
        frontmost(
            self.pointables
                .iter()
                .filter(|p| p.hand_id == Some(hand.id)),
        )
    }

    /// The hand furthest to the left (smallest palm X).
    pub fn leftmost_hand(&self) -> Option<&Hand> {
        self.hands
            .iter()
            .min_by(|a, b| a.palm_position.x.total_cmp(&b.palm_position.x))
    }

    /// The hand furthest to the right (largest palm X).
    pub fn rightmost_hand(&self) -> Option<&Hand> {
        self.hands
            .iter()
            .max_by(|a, b| a.palm_position.x.total_cmp(&b.palm_position.x))
    }

    /// Roll angles of this frame's swipe gestures, in report order.
    pub fn swipe_rolls(&self) -> Vec<f64> {
        self.gestures.iter().filter_map(Gesture::swipe_roll).collect()
    }
}

fn frontmost<'a>(pointables: impl Iterator<Item = &'a Pointable>) -> Option<&'a Pointable> {
    pointables.min_by(|a, b| a.tip_position.z.total_cmp(&b.tip_position.z))
}

/// A frame line that could not be decoded.
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {source}")]
pub struct FrameParseError {
    /// One-based line number in the input.
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Parse frames from JSONL content (one JSON object per line).
///
/// Blank lines and `#` comment lines are skipped.
pub fn parse_frames(jsonl: &str) -> Result<Vec<SensorFrame>, FrameParseError> {
    jsonl
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, content)| {
            serde_json::from_str(content).map_err(|source| FrameParseError { line, source })
        })
        .collect()
}

/// Serialize frames to JSONL format.
pub fn serialize_frames(frames: &[SensorFrame]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}
