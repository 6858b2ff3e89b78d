//! Handwave Frame Model
//!
//! Defines the data contracts delivered by the hand-tracking sensor:
//! - **Geometry:** 3D vectors and the interaction box normalizer
//! - **Frames:** Per-callback snapshots of hands, pointables, and gestures
//!
//! Positions are in millimetres in the sensor's coordinate system
//! (Y up, Z toward the user). Frames are exchanged as JSONL, one frame
//! per line.

pub mod frame;
pub mod geometry;

pub use frame::*;
pub use geometry::*;
