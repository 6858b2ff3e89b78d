//! Same-frame swipe clustering.
//!
//! An open-hand sweep makes the sensor report several swipe gestures in the
//! same frame, one per finger. Swipes that agree with the first one form a
//! cluster; once enough fingers agree, the direction of the sweep decides
//! the workspace move.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Direction decided from a swipe cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeSignal {
    Next,
    Previous,
}

/// Groups one frame's swipe samples and classifies their direction.
#[derive(Debug, Clone)]
pub struct SwipeClusterClassifier {
    /// Max roll difference (rad) from the seed for a sample to join.
    pub cluster_tolerance: f64,
    /// Cluster size that makes the sweep intentional.
    pub min_cluster_size: usize,
    /// Normalized roll below which the sweep means "next".
    pub next_below: f64,
    /// Normalized roll above which the sweep means "previous".
    pub previous_above: f64,
}

impl Default for SwipeClusterClassifier {
    fn default() -> Self {
        Self {
            cluster_tolerance: PI / 2.0,
            min_cluster_size: 3,
            next_below: PI / 4.0,
            previous_above: 3.0 * PI / 4.0,
        }
    }
}

impl SwipeClusterClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify the roll angles of one frame's swipes, in report order.
    ///
    /// After every sample, if the cluster is large enough, the sample just
    /// seen is classified; a frame may therefore yield several signals.
    /// Nothing is kept between calls.
    pub fn classify(&self, rolls: &[f64]) -> Vec<SwipeSignal> {
        let mut cluster: Vec<f64> = Vec::with_capacity(rolls.len());
        let mut signals = Vec::new();

        for &roll in rolls {
            let Some(&seed) = cluster.first() else {
                cluster.push(roll);
                continue;
            };

            if (seed - roll).abs() < self.cluster_tolerance {
                cluster.push(roll);
            }

            if cluster.len() >= self.min_cluster_size {
                if let Some(signal) = self.direction(roll) {
                    signals.push(signal);
                }
            }
        }

        tracing::trace!(
            samples = rolls.len(),
            clustered = cluster.len(),
            signals = signals.len(),
            "Swipe cluster"
        );
        signals
    }

    /// Map a roll angle to a direction; `None` inside the dead zone.
    pub fn direction(&self, roll: f64) -> Option<SwipeSignal> {
        let angle = normalized_roll(roll);
        if angle < self.next_below {
            Some(SwipeSignal::Next)
        } else if angle > self.previous_above {
            Some(SwipeSignal::Previous)
        } else {
            None
        }
    }
}

/// Fold a roll angle into `[0, π)`.
pub fn normalized_roll(roll: f64) -> f64 {
    roll.abs() % PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_three_agreeing_swipes_signal_next_once() {
        let signals = SwipeClusterClassifier::new().classify(&[0.1, 0.05, 0.08]);
        assert_eq!(signals, vec![SwipeSignal::Next]);
    }

    #[test]
    fn test_two_swipes_are_not_enough() {
        assert!(SwipeClusterClassifier::new().classify(&[0.1, 0.05]).is_empty());
    }

    #[test]
    fn test_near_pi_rolls_signal_previous() {
        let signals = SwipeClusterClassifier::new().classify(&[2.9, 3.0, 2.8]);
        assert_eq!(signals, vec![SwipeSignal::Previous]);
    }

    #[test]
    fn test_disagreeing_samples_are_dropped() {
        // 2.0 is more than 90° away from the seed and never joins.
        let signals = SwipeClusterClassifier::new().classify(&[0.1, 2.0, 0.05]);
        assert!(signals.is_empty());
    }

    #[test]
    fn test_every_sample_after_threshold_is_classified() {
        let signals = SwipeClusterClassifier::new().classify(&[0.1, 0.05, 0.08, 0.12]);
        assert_eq!(signals, vec![SwipeSignal::Next, SwipeSignal::Next]);
    }

    #[test]
    fn test_classification_uses_the_latest_sample() {
        // Seed at 0.7 admits 1.2 (diff 0.5); 1.2 sits in the dead zone.
        let signals = SwipeClusterClassifier::new().classify(&[0.7, 0.3, 1.2]);
        assert!(signals.is_empty());
    }

    #[test]
    fn test_negative_rolls_fold_by_magnitude() {
        assert!((normalized_roll(-0.2) - 0.2).abs() < 1e-12);
        assert_eq!(
            SwipeClusterClassifier::new().direction(-3.0),
            Some(SwipeSignal::Previous)
        );
    }

    #[test]
    fn test_no_state_survives_between_frames() {
        let classifier = SwipeClusterClassifier::new();
        assert!(classifier.classify(&[0.1, 0.05]).is_empty());
        assert!(classifier.classify(&[0.08]).is_empty());
    }

    proptest! {
        #[test]
        fn test_dead_zone_never_signals(
            angle in (PI / 4.0)..=(3.0 * PI / 4.0),
            extra in 0usize..5,
        ) {
            // Every sample identical, so all join the cluster.
            let rolls = vec![angle; 3 + extra];
            prop_assert!(SwipeClusterClassifier::new().classify(&rolls).is_empty());
        }
    }
}
