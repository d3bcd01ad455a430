//! Sensor fusion
//!
//! Turns raw orientation and motion events into the two signals the game
//! consumes: a heading in degrees (0 = north) and a monotonic step count.
//! Also owns the permission state machine that gates those events.

pub mod heading;
pub mod manual;
pub mod permission;
pub mod shared;
pub mod steps;

pub use heading::{Cardinal, GridDirection, HeadingSource, OrientationSample};
pub use manual::ManualCommand;
pub use permission::{PermissionResponse, PermissionState};
pub use shared::SensorHandle;
pub use steps::{MotionSample, StepDetector};

use serde::{Deserialize, Serialize};

use crate::consts::HEADING_NUDGE;
use crate::error::SensorError;
use crate::normalize_heading;
use crate::settings::Settings;

/// Heading and step count read together, once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    pub heading: f32,
    pub step_count: u64,
}

#[derive(Debug, Clone)]
pub struct SensorFusion {
    source: HeadingSource,
    permission: PermissionState,
    heading: f32,
    step_count: u64,
    detector: StepDetector,
    activation_timeout_ms: f64,
    last_error: Option<SensorError>,
}

impl SensorFusion {
    pub fn new(source: HeadingSource, permission: PermissionState, settings: &Settings) -> Self {
        Self {
            source,
            permission,
            heading: 0.0,
            step_count: 0,
            detector: StepDetector::new(settings.step_sensitivity, settings.step_debounce_ms),
            activation_timeout_ms: settings.activation_timeout_ms,
            last_error: None,
        }
    }

    pub fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            heading: self.heading,
            step_count: self.step_count,
        }
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    pub fn source(&self) -> HeadingSource {
        self.source
    }

    pub fn sensitivity(&self) -> f32 {
        self.detector.sensitivity()
    }

    pub fn cardinal(&self) -> Cardinal {
        Cardinal::from_heading(self.heading)
    }

    pub fn direction(&self) -> GridDirection {
        self.cardinal().direction()
    }

    /// Most recent sensor degradation, if any
    pub fn last_error(&self) -> Option<&SensorError> {
        self.last_error.as_ref()
    }

    // === Sensor events ===

    /// Apply an orientation event. Returns true if the heading changed.
    pub fn on_orientation(&mut self, sample: &OrientationSample, _now_ms: f64) -> bool {
        if !self.permission.accepts_samples() {
            return false;
        }
        let Some(heading) = self.source.derive(sample) else {
            return false;
        };
        self.mark_sample();
        self.heading = heading;
        true
    }

    /// Apply a motion event. Returns true if it counted as a step.
    pub fn on_motion(&mut self, sample: &MotionSample, now_ms: f64) -> bool {
        if !self.permission.accepts_samples() || sample.acceleration.is_none() {
            return false;
        }
        self.mark_sample();
        if !self.detector.process(sample, now_ms) {
            return false;
        }
        self.step_count += 1;
        log::debug!("Step {} detected", self.step_count);
        true
    }

    fn mark_sample(&mut self) {
        if self.permission.is_pending() {
            log::info!("First sensor sample received; sensors granted");
            self.permission = self.permission.on_sample();
            self.last_error = None;
        }
    }

    // === Manual overrides ===

    /// Count one step without a motion sample
    pub fn simulate_step(&mut self) {
        self.step_count += 1;
        log::debug!("Manual step {}", self.step_count);
    }

    /// Override the heading. Non-finite values are ignored.
    pub fn set_heading(&mut self, heading: f32) {
        if !heading.is_finite() {
            log::warn!("Ignoring non-finite heading {}", heading);
            return;
        }
        self.heading = normalize_heading(heading);
    }

    pub fn apply_command(&mut self, command: ManualCommand) {
        match command {
            ManualCommand::Step => self.simulate_step(),
            ManualCommand::TurnLeft => self.set_heading(self.heading - HEADING_NUDGE),
            ManualCommand::TurnRight => self.set_heading(self.heading + HEADING_NUDGE),
        }
    }

    /// Returns the sensitivity actually applied after clamping
    pub fn set_sensitivity(&mut self, sensitivity: f32) -> f32 {
        self.detector.set_sensitivity(sensitivity)
    }

    // === Activation ===

    /// Explicit user-gesture activation
    pub fn request_activation(&mut self, now_ms: f64) -> Result<PermissionState, SensorError> {
        match self.permission.request(now_ms) {
            Ok(next) => {
                if next != self.permission {
                    log::info!("Requesting sensor activation");
                    self.detector.reset();
                }
                self.permission = next;
                Ok(next)
            }
            Err(err) => {
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Deliver the platform's answer to a pending activation
    pub fn permission_response(
        &mut self,
        response: PermissionResponse,
    ) -> Result<PermissionState, SensorError> {
        let (next, failure) = self.permission.respond(response)?;
        self.permission = next;
        match failure {
            Some(err) => {
                log::warn!("Sensor activation failed: {}", err);
                self.last_error = Some(err.clone());
                Err(err)
            }
            None => Ok(next),
        }
    }

    /// Resolve a pending activation whose deadline has passed
    pub fn poll(&mut self, now_ms: f64) -> Result<(), SensorError> {
        let next = self
            .permission
            .check_deadline(now_ms, self.activation_timeout_ms);
        if next == self.permission {
            return Ok(());
        }
        self.permission = next;
        let err = SensorError::ActivationTimeout {
            timeout_ms: self.activation_timeout_ms as u64,
        };
        log::warn!("{}", err);
        self.last_error = Some(err.clone());
        Err(err)
    }
}
