//! Geometry types for tracked positions.

use serde::{Deserialize, Serialize};

/// A point or direction in sensor space (millimetres).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Vector3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Rotation of this direction around the Z axis, in radians.
    ///
    /// Zero points straight down (negative Y); the angle grows toward
    /// positive X and lies in `(-π, π]`.
    pub fn roll(&self) -> f64 {
        self.x.atan2(-self.y)
    }

    /// Unit direction in the XY plane with the given roll angle.
    pub fn from_roll(roll: f64) -> Self {
        Self {
            x: roll.sin(),
            y: -roll.cos(),
            z: 0.0,
        }
    }
}

/// A point in screen space (pixels, Y down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// The box in which tracked positions are considered in range.
///
/// Maps sensor positions into the unit cube so that callers can scale them
/// to any target area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionBox {
    /// Center of the box (mm).
    pub center: Vector3,
    /// Width (x), height (y), and depth (z) of the box (mm).
    pub size: Vector3,
}

impl Default for InteractionBox {
    fn default() -> Self {
        Self {
            center: Vector3::new(0.0, 200.0, 0.0),
            size: Vector3::new(235.0, 235.0, 147.0),
        }
    }
}

impl InteractionBox {
    /// Normalize a sensor position into `[0, 1]` per axis.
    ///
    /// With `clamp` set, positions outside the box are pinned to its faces.
    pub fn normalize(&self, point: &Vector3, clamp: bool) -> Vector3 {
        let axis = |value: f64, center: f64, size: f64| {
            let n = if size.abs() < f64::EPSILON {
                0.5
            } else {
                (value - center) / size + 0.5
            };
            if clamp {
                n.clamp(0.0, 1.0)
            } else {
                n
            }
        };

        Vector3 {
            x: axis(point.x, self.center.x, self.size.x),
            y: axis(point.y, self.center.y, self.size.y),
            z: axis(point.z, self.center.z, self.size.z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_roll_of_axis_directions() {
        assert!(Vector3::new(0.0, -1.0, 0.0).roll().abs() < 1e-12);
        assert!((Vector3::new(1.0, 0.0, 0.0).roll() - PI / 2.0).abs() < 1e-12);
        assert!((Vector3::new(-1.0, 0.0, 0.0).roll() + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_roll_inverts_roll() {
        for roll in [0.1, 0.05, -1.2, 2.9] {
            assert!((Vector3::from_roll(roll).roll() - roll).abs() < 1e-9);
        }
    }

    #[test]
    fn test_distance_is_euclidean() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(3.0, 4.0, 12.0);
        assert!((a.distance_to(&b) - 13.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_maps_center_to_half() {
        let ibox = InteractionBox::default();
        let n = ibox.normalize(&ibox.center, true);
        assert!((n.x - 0.5).abs() < 1e-12);
        assert!((n.y - 0.5).abs() < 1e-12);
        assert!((n.z - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_clamps_outside_points() {
        let ibox = InteractionBox {
            center: Vector3::new(0.0, 100.0, 0.0),
            size: Vector3::new(100.0, 100.0, 100.0),
        };
        let far = Vector3::new(500.0, -500.0, 0.0);
        let clamped = ibox.normalize(&far, true);
        assert_eq!(clamped.x, 1.0);
        assert_eq!(clamped.y, 0.0);

        let raw = ibox.normalize(&far, false);
        assert!((raw.x - 5.5).abs() < 1e-12);
    }

    proptest::proptest! {
        #[test]
        fn test_clamped_normalize_stays_in_unit_cube(
            x in -2000.0f64..2000.0,
            y in -2000.0f64..2000.0,
            z in -2000.0f64..2000.0,
        ) {
            let n = InteractionBox::default().normalize(&Vector3::new(x, y, z), true);
            proptest::prop_assert!((0.0..=1.0).contains(&n.x));
            proptest::prop_assert!((0.0..=1.0).contains(&n.y));
            proptest::prop_assert!((0.0..=1.0).contains(&n.z));
        }
    }
}
