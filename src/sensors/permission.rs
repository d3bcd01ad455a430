//! Sensor permission state machine
//!
//! ```text
//! Unknown ─┬─> NotSupported
//!          ├─> NotAvailable
//!          ├─> NeedsActivation ──request──┐
//!          └─> Requesting <───────────────┘ (also retried from Timeout/Error)
//!                 ├─ first sample ──> Granted
//!                 ├─ denied ────────> Denied
//!                 ├─ failure ───────> Error
//!                 └─ deadline ──────> Timeout
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SensorError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PermissionState {
    /// Capabilities not probed yet
    Unknown,
    /// No orientation API on this platform
    NotSupported,
    /// API present but not usable (desktop, insecure context)
    NotAvailable,
    /// Needs an explicit user gesture before sensors can start
    NeedsActivation,
    /// Waiting for the first sample or a permission answer
    Requesting { started_ms: f64 },
    Granted,
    Denied,
    Timeout,
    Error,
}

/// Answer from the platform's permission prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionResponse {
    Granted,
    Denied,
    Failed(String),
}

impl PermissionState {
    pub fn name(&self) -> &'static str {
        match self {
            PermissionState::Unknown => "unknown",
            PermissionState::NotSupported => "not-supported",
            PermissionState::NotAvailable => "not-available",
            PermissionState::NeedsActivation => "needs-activation",
            PermissionState::Requesting { .. } => "requesting",
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
            PermissionState::Timeout => "timeout",
            PermissionState::Error => "error",
        }
    }

    /// Samples are only processed while requesting or granted
    pub fn accepts_samples(&self) -> bool {
        matches!(
            self,
            PermissionState::Requesting { .. } | PermissionState::Granted
        )
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, PermissionState::Requesting { .. })
    }

    /// Start (or retry) activation at `now_ms`.
    ///
    /// Already pending or granted states are returned unchanged.
    pub fn request(self, now_ms: f64) -> Result<PermissionState, SensorError> {
        match self {
            PermissionState::Unknown
            | PermissionState::NeedsActivation
            | PermissionState::Timeout
            | PermissionState::Error => Ok(PermissionState::Requesting { started_ms: now_ms }),
            PermissionState::Requesting { .. } | PermissionState::Granted => Ok(self),
            PermissionState::NotSupported => Err(SensorError::Unsupported),
            PermissionState::NotAvailable => Err(SensorError::Unavailable),
            PermissionState::Denied => Err(SensorError::PermissionDenied),
        }
    }

    /// Apply a prompt answer. A grant keeps waiting for the first sample.
    ///
    /// Returns the next state, plus the error that caused it for denials and
    /// failures.
    pub fn respond(
        self,
        response: PermissionResponse,
    ) -> Result<(PermissionState, Option<SensorError>), SensorError> {
        if !self.is_pending() {
            return Err(SensorError::InvalidActivation { state: self.name() });
        }
        Ok(match response {
            PermissionResponse::Granted => (self, None),
            PermissionResponse::Denied => {
                (PermissionState::Denied, Some(SensorError::PermissionDenied))
            }
            PermissionResponse::Failed(reason) => {
                (PermissionState::Error, Some(SensorError::Platform(reason)))
            }
        })
    }

    /// A sample carrying data arrived
    pub fn on_sample(self) -> PermissionState {
        match self {
            PermissionState::Requesting { .. } => PermissionState::Granted,
            other => other,
        }
    }

    /// `Timeout` once a pending request has waited `timeout_ms`
    pub fn check_deadline(self, now_ms: f64, timeout_ms: f64) -> PermissionState {
        match self {
            PermissionState::Requesting { started_ms } if now_ms - started_ms >= timeout_ms => {
                PermissionState::Timeout
            }
            other => other,
        }
    }
}
