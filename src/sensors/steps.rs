//! Step detection from acceleration magnitude
//!
//! A simple relative-delta detector: a step is a jump in |a| between two
//! consecutive samples larger than the sensitivity, debounced in time. It
//! does not look for peaks and will count any sharp shake as a step.

use glam::Vec3;

use crate::consts::{MAX_STEP_SENSITIVITY, MIN_STEP_SENSITIVITY};

/// One raw motion event (acceleration including gravity)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionSample {
    pub acceleration: Option<Vec3>,
}

impl MotionSample {
    /// Build from possibly missing axes. Missing axes read as zero; a sample
    /// with no axes at all carries no acceleration.
    pub fn from_axes(x: Option<f32>, y: Option<f32>, z: Option<f32>) -> Self {
        if x.is_none() && y.is_none() && z.is_none() {
            return Self { acceleration: None };
        }
        Self {
            acceleration: Some(Vec3::new(
                x.unwrap_or(0.0),
                y.unwrap_or(0.0),
                z.unwrap_or(0.0),
            )),
        }
    }

    pub fn magnitude(&self) -> Option<f32> {
        self.acceleration
            .map(|a| a.length())
            .filter(|m| m.is_finite())
    }
}

#[derive(Debug, Clone)]
pub struct StepDetector {
    sensitivity: f32,
    debounce_ms: f64,
    last_magnitude: Option<f32>,
    last_step_ms: Option<f64>,
}

impl StepDetector {
    pub fn new(sensitivity: f32, debounce_ms: f64) -> Self {
        let mut detector = Self {
            sensitivity: MIN_STEP_SENSITIVITY,
            debounce_ms: debounce_ms.max(0.0),
            last_magnitude: None,
            last_step_ms: None,
        };
        detector.set_sensitivity(sensitivity);
        detector
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Set the threshold, clamped to the recognized range. Returns the value
    /// actually applied.
    pub fn set_sensitivity(&mut self, sensitivity: f32) -> f32 {
        if sensitivity.is_nan() {
            log::warn!("Ignoring NaN step sensitivity");
            return self.sensitivity;
        }
        let clamped = sensitivity.clamp(MIN_STEP_SENSITIVITY, MAX_STEP_SENSITIVITY);
        if clamped != sensitivity {
            log::warn!(
                "Step sensitivity {} clamped to {}",
                sensitivity,
                clamped
            );
        }
        self.sensitivity = clamped;
        clamped
    }

    /// Feed one sample. Returns true when it counts as a step.
    pub fn process(&mut self, sample: &MotionSample, now_ms: f64) -> bool {
        let Some(magnitude) = sample.magnitude() else {
            return false;
        };

        // First sample only establishes the baseline
        let Some(last) = self.last_magnitude.replace(magnitude) else {
            return false;
        };

        let delta = (magnitude - last).abs();
        if delta <= self.sensitivity {
            return false;
        }

        let debounced = self
            .last_step_ms
            .is_some_and(|t| now_ms - t <= self.debounce_ms);
        if debounced {
            return false;
        }

        self.last_step_ms = Some(now_ms);
        true
    }

    /// Forget the baseline and debounce window
    pub fn reset(&mut self) {
        self.last_magnitude = None;
        self.last_step_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accel(z: f32) -> MotionSample {
        MotionSample::from_axes(Some(0.0), Some(0.0), Some(z))
    }

    #[test]
    fn test_from_axes() {
        assert_eq!(MotionSample::from_axes(None, None, None).acceleration, None);
        assert_eq!(
            MotionSample::from_axes(Some(3.0), None, Some(4.0)).magnitude(),
            Some(5.0)
        );
    }

    #[test]
    fn test_first_sample_primes_baseline() {
        let mut detector = StepDetector::new(1.2, 350.0);
        assert!(!detector.process(&accel(9.8), 0.0));
        assert!(detector.process(&accel(11.3), 400.0));
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut detector = StepDetector::new(1.0, 350.0);
        detector.process(&accel(10.0), 0.0);
        assert!(!detector.process(&accel(11.0), 1000.0));
        assert!(detector.process(&accel(12.5), 2000.0));
    }

    #[test]
    fn test_drop_counts_too() {
        let mut detector = StepDetector::new(1.2, 350.0);
        detector.process(&accel(11.5), 0.0);
        assert!(detector.process(&accel(9.8), 500.0));
    }

    #[test]
    fn test_debounce() {
        let mut detector = StepDetector::new(1.2, 350.0);
        detector.process(&accel(9.8), 0.0);
        assert!(detector.process(&accel(11.3), 1000.0));
        // 100ms later: big delta but inside the window
        assert!(!detector.process(&accel(9.8), 1100.0));
        // Exactly at the window edge is still rejected
        assert!(!detector.process(&accel(11.3), 1350.0));
        assert!(detector.process(&accel(9.8), 1351.0));
    }

    #[test]
    fn test_baseline_updates_even_when_rejected() {
        let mut detector = StepDetector::new(1.2, 350.0);
        detector.process(&accel(9.8), 0.0);
        assert!(detector.process(&accel(11.3), 1000.0));
        assert!(!detector.process(&accel(20.0), 1100.0));
        // Compared against 20.0 now, so a small wobble is not a step
        assert!(!detector.process(&accel(20.5), 2000.0));
    }

    #[test]
    fn test_empty_sample_skipped() {
        let mut detector = StepDetector::new(1.2, 350.0);
        detector.process(&accel(9.8), 0.0);
        assert!(!detector.process(&MotionSample::default(), 500.0));
        assert!(detector.process(&accel(11.3), 600.0));
    }

    #[test]
    fn test_sensitivity_clamped() {
        let mut detector = StepDetector::new(10.0, 350.0);
        assert_eq!(detector.sensitivity(), MAX_STEP_SENSITIVITY);
        assert_eq!(detector.set_sensitivity(0.01), MIN_STEP_SENSITIVITY);
        assert_eq!(detector.set_sensitivity(f32::NAN), MIN_STEP_SENSITIVITY);
        assert_eq!(detector.set_sensitivity(1.5), 1.5);
    }
}
