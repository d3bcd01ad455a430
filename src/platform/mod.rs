//! Platform abstraction layer
//!
//! Resolves once per session what the host can offer:
//! - Which orientation field carries the heading
//! - Whether sensors need an explicit user gesture first
//! - Browser bindings (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod web;

use serde::{Deserialize, Serialize};

use crate::sensors::{HeadingSource, PermissionState};

/// Capabilities of the host device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformProfile {
    /// Orientation events exist at all
    pub has_orientation_api: bool,
    /// Phone or tablet; desktop browsers expose the API without hardware
    pub is_mobile: bool,
    /// Sensors stay silent until a permission prompt is accepted (iOS 13+)
    pub requires_permission_prompt: bool,
    /// Orientation events carry a true compass heading (iOS)
    pub reports_compass_heading: bool,
}

impl PlatformProfile {
    /// No sensors; manual control only
    pub fn headless() -> Self {
        Self {
            has_orientation_api: false,
            is_mobile: false,
            requires_permission_prompt: false,
            reports_compass_heading: false,
        }
    }

    pub fn desktop() -> Self {
        Self {
            has_orientation_api: true,
            ..Self::headless()
        }
    }

    /// Sniff a browser user agent string
    pub fn from_user_agent(user_agent: &str, has_orientation_api: bool) -> Self {
        let ios = ["iPhone", "iPad", "iPod"]
            .iter()
            .any(|token| user_agent.contains(token));
        let android = user_agent.contains("Android");
        let is_mobile = ios || android || user_agent.contains("Mobile");

        Self {
            has_orientation_api,
            is_mobile,
            requires_permission_prompt: ios,
            reports_compass_heading: ios,
        }
    }

    /// Account for a `DeviceOrientationEvent.requestPermission` function.
    ///
    /// Only iOS WebKit ships it, including iPadOS Safari that reports a
    /// desktop "Macintosh" user agent.
    pub fn with_permission_api(self, has_request_permission: bool) -> Self {
        if !has_request_permission {
            return self;
        }
        Self {
            is_mobile: true,
            requires_permission_prompt: true,
            reports_compass_heading: true,
            ..self
        }
    }

    pub fn heading_source(&self) -> HeadingSource {
        if !self.has_orientation_api {
            HeadingSource::Unavailable
        } else if self.reports_compass_heading {
            HeadingSource::DirectHeading
        } else {
            HeadingSource::RotationAngle
        }
    }

    /// Permission state a new session starts in.
    ///
    /// Platforms without a prompt start listening right away, so they begin
    /// pending and still need a first sample before `now_ms` + timeout.
    pub fn initial_permission(&self, now_ms: f64) -> PermissionState {
        if !self.has_orientation_api {
            PermissionState::NotSupported
        } else if !self.is_mobile {
            PermissionState::NotAvailable
        } else if self.requires_permission_prompt {
            PermissionState::NeedsActivation
        } else {
            PermissionState::Requesting { started_ms: now_ms }
        }
    }

    pub fn probe(&self, now_ms: f64) -> (HeadingSource, PermissionState) {
        let source = self.heading_source();
        let permission = self.initial_permission(now_ms);
        log::info!(
            "Platform probe: heading via {:?}, sensors {}",
            source,
            permission.name()
        );
        (source, permission)
    }
}
