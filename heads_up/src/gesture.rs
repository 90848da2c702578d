//! Accelerometer gesture detection.
//!
//! The host feeds raw 3-axis acceleration samples (m/s²) together with a
//! millisecond timestamp. Samples are processed at most once per
//! [`SAMPLE_INTERVAL_MS`], and each processed sample yields at most one
//! gesture.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::entities::Answer;

/// Vertical acceleration below this means the device was tipped forward.
pub const TILT_FORWARD_THRESHOLD: f32 = -5.0;
/// Vertical acceleration above this means the device was tipped back.
pub const TILT_BACK_THRESHOLD: f32 = 5.0;
pub const SHAKE_THRESHOLD: f32 = 1200.0;
pub const SAMPLE_INTERVAL_MS: u64 = 100;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Gesture {
    TiltFront,
    TiltBack,
    Shake,
}

impl Gesture {
    /// The answer a gesture stands for while a card is in play. Shaking
    /// isn't bound to anything.
    #[must_use]
    pub fn answer(self) -> Option<Answer> {
        match self {
            Self::TiltFront => Some(Answer::Correct),
            Self::TiltBack => Some(Answer::Skip),
            Self::Shake => None,
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::TiltFront => "tilt front",
            Self::TiltBack => "tilt back",
            Self::Shake => "shake",
        };
        write!(f, "{repr}")
    }
}

/// One accelerometer reading.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Sample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Sample {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn sum(self) -> f32 {
        self.x + self.y + self.z
    }
}

#[derive(Debug)]
pub struct GestureClassifier {
    last_update_ms: u64,
    last: Sample,
}

impl GestureClassifier {
    /// Starts listening at `now_ms`; the first sample is processed
    /// [`SAMPLE_INTERVAL_MS`] later at the earliest.
    #[must_use]
    pub fn new(now_ms: u64) -> Self {
        Self {
            last_update_ms: now_ms,
            last: Sample::default(),
        }
    }

    /// Classifies a sample taken at `timestamp_ms`.
    ///
    /// Samples arriving less than [`SAMPLE_INTERVAL_MS`] after the last
    /// processed one are ignored. Tilts are checked first on the vertical
    /// axis; otherwise the rate of change of the summed axes decides whether
    /// the device was shaken.
    pub fn classify(&mut self, timestamp_ms: u64, sample: Sample) -> Option<Gesture> {
        let elapsed_ms = timestamp_ms.saturating_sub(self.last_update_ms);
        if elapsed_ms < SAMPLE_INTERVAL_MS {
            return None;
        }
        self.last_update_ms = timestamp_ms;
        // Tilted samples become the baseline for the next shake check too.
        let previous = std::mem::replace(&mut self.last, sample);

        if sample.z < TILT_FORWARD_THRESHOLD {
            return Some(Gesture::TiltFront);
        }
        if sample.z > TILT_BACK_THRESHOLD {
            return Some(Gesture::TiltBack);
        }

        #[allow(clippy::cast_precision_loss)]
        let speed = (sample.sum() - previous.sum()).abs() / elapsed_ms as f32 * 10_000.0;
        (speed > SHAKE_THRESHOLD).then_some(Gesture::Shake)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESTING: Sample = Sample::new(0.0, 0.0, 0.0);

    #[test]
    fn test_tilt_front() {
        let mut classifier = GestureClassifier::new(0);
        assert_eq!(
            classifier.classify(150, Sample::new(0.0, 0.0, -9.0)),
            Some(Gesture::TiltFront)
        );
    }

    #[test]
    fn test_tilt_back() {
        let mut classifier = GestureClassifier::new(0);
        assert_eq!(
            classifier.classify(150, Sample::new(0.0, 0.0, 9.0)),
            Some(Gesture::TiltBack)
        );
    }

    #[test]
    fn test_samples_inside_interval_ignored() {
        let mut classifier = GestureClassifier::new(0);
        assert_eq!(classifier.classify(50, Sample::new(0.0, 0.0, -9.0)), None);
        assert_eq!(classifier.classify(99, Sample::new(0.0, 0.0, -9.0)), None);
        assert_eq!(
            classifier.classify(100, Sample::new(0.0, 0.0, -9.0)),
            Some(Gesture::TiltFront)
        );
        assert_eq!(classifier.classify(150, Sample::new(0.0, 0.0, -9.0)), None);
    }

    #[test]
    fn test_shake() {
        let mut classifier = GestureClassifier::new(0);
        assert_eq!(classifier.classify(100, RESTING), None);
        // |(15 + 4 + 1) - 0| / 100 * 10_000 = 2000
        assert_eq!(
            classifier.classify(200, Sample::new(15.0, 4.0, 1.0)),
            Some(Gesture::Shake)
        );
    }

    #[test]
    fn test_slow_motion_is_not_shake() {
        let mut classifier = GestureClassifier::new(0);
        assert_eq!(classifier.classify(100, RESTING), None);
        // |1 - 0| / 100 * 10_000 = 100
        assert_eq!(classifier.classify(200, Sample::new(1.0, 0.0, 0.0)), None);
    }

    #[test]
    fn test_tilt_takes_priority_over_shake() {
        let mut classifier = GestureClassifier::new(0);
        assert_eq!(classifier.classify(100, RESTING), None);
        assert_eq!(
            classifier.classify(200, Sample::new(20.0, 20.0, -6.0)),
            Some(Gesture::TiltFront)
        );
    }

    #[test]
    fn test_tilt_sample_is_shake_baseline() {
        let mut classifier = GestureClassifier::new(0);
        assert_eq!(
            classifier.classify(100, Sample::new(20.0, 0.0, -6.0)),
            Some(Gesture::TiltFront)
        );
        // |0 - 14| / 100 * 10_000 = 1400
        assert_eq!(classifier.classify(200, RESTING), Some(Gesture::Shake));
    }

    #[test]
    fn test_gesture_answers() {
        assert_eq!(Gesture::TiltFront.answer(), Some(Answer::Correct));
        assert_eq!(Gesture::TiltBack.answer(), Some(Answer::Skip));
        assert_eq!(Gesture::Shake.answer(), None);
    }
}
