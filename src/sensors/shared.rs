//! Shared handle between sensor callbacks and the tick loop
//!
//! Callbacks may arrive from a different task than the one ticking the game.
//! Every access goes through one lock so a tick never sees a heading from one
//! event and a step count from another.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{
    ManualCommand, MotionSample, OrientationSample, PermissionResponse, PermissionState,
    SensorFusion, SensorSnapshot,
};
use crate::error::SensorError;

struct Shared {
    fusion: SensorFusion,
    attached: bool,
}

/// Cloneable handle to one session's sensor state.
///
/// After [`SensorHandle::detach`] every mutating call is a no-op, so late
/// callbacks from a torn-down session cannot touch it.
#[derive(Clone)]
pub struct SensorHandle {
    inner: Arc<Mutex<Shared>>,
}

impl SensorHandle {
    pub fn new(fusion: SensorFusion) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Shared {
                fusion,
                attached: true,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        // The state stays consistent across a panicking callback
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the engine while attached
    fn update<R>(&self, f: impl FnOnce(&mut SensorFusion) -> R) -> Option<R> {
        let mut shared = self.lock();
        if !shared.attached {
            return None;
        }
        Some(f(&mut shared.fusion))
    }

    /// Read-only access, allowed after detach
    pub fn read<R>(&self, f: impl FnOnce(&SensorFusion) -> R) -> R {
        f(&self.lock().fusion)
    }

    pub fn snapshot(&self) -> SensorSnapshot {
        self.read(SensorFusion::snapshot)
    }

    pub fn permission(&self) -> PermissionState {
        self.read(SensorFusion::permission)
    }

    pub fn is_attached(&self) -> bool {
        self.lock().attached
    }

    /// Stop accepting events for good
    pub fn detach(&self) {
        let mut shared = self.lock();
        if shared.attached {
            log::debug!("Sensor handle detached");
        }
        shared.attached = false;
    }

    pub fn on_orientation(&self, sample: &OrientationSample, now_ms: f64) -> bool {
        self.update(|f| f.on_orientation(sample, now_ms))
            .unwrap_or(false)
    }

    pub fn on_motion(&self, sample: &MotionSample, now_ms: f64) -> bool {
        self.update(|f| f.on_motion(sample, now_ms)).unwrap_or(false)
    }

    pub fn simulate_step(&self) {
        self.update(SensorFusion::simulate_step);
    }

    pub fn set_heading(&self, heading: f32) {
        self.update(|f| f.set_heading(heading));
    }

    pub fn apply_command(&self, command: ManualCommand) {
        self.update(|f| f.apply_command(command));
    }

    /// Returns the applied value, or `None` once detached
    pub fn set_sensitivity(&self, sensitivity: f32) -> Option<f32> {
        self.update(|f| f.set_sensitivity(sensitivity))
    }

    /// Detached handles report the current state unchanged
    pub fn request_activation(&self, now_ms: f64) -> Result<PermissionState, SensorError> {
        self.update(|f| f.request_activation(now_ms))
            .unwrap_or_else(|| Ok(self.permission()))
    }

    pub fn permission_response(
        &self,
        response: PermissionResponse,
    ) -> Result<PermissionState, SensorError> {
        self.update(|f| f.permission_response(response))
            .unwrap_or_else(|| Ok(self.permission()))
    }

    pub fn poll(&self, now_ms: f64) -> Result<(), SensorError> {
        self.update(|f| f.poll(now_ms)).unwrap_or(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::HeadingSource;
    use crate::settings::Settings;

    fn handle() -> SensorHandle {
        SensorHandle::new(SensorFusion::new(
            HeadingSource::DirectHeading,
            PermissionState::Granted,
            &Settings::default(),
        ))
    }

    #[test]
    fn test_clones_share_state() {
        let a = handle();
        let b = a.clone();
        a.simulate_step();
        b.set_heading(90.0);
        assert_eq!(
            a.snapshot(),
            SensorSnapshot {
                heading: 90.0,
                step_count: 1
            }
        );
    }

    #[test]
    fn test_detached_ignores_events() {
        let handle = handle();
        handle.simulate_step();
        handle.detach();

        handle.simulate_step();
        handle.set_heading(180.0);
        handle.apply_command(ManualCommand::Step);
        let sample = OrientationSample {
            compass_heading: Some(45.0),
            alpha: None,
        };
        assert!(!handle.on_orientation(&sample, 0.0));
        assert_eq!(handle.set_sensitivity(2.0), None);

        assert!(!handle.is_attached());
        assert_eq!(
            handle.snapshot(),
            SensorSnapshot {
                heading: 0.0,
                step_count: 1
            }
        );
    }

    #[test]
    fn test_callbacks_from_other_thread() {
        let handle = handle();
        let remote = handle.clone();
        std::thread::spawn(move || {
            for _ in 0..100 {
                remote.simulate_step();
            }
        })
        .join()
        .unwrap();
        assert_eq!(handle.snapshot().step_count, 100);
    }
}
