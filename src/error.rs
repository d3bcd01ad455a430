//! Error types
//!
//! Sensor errors are never fatal: the session degrades to manual control.
//! Grid errors signal contract violations (bad level data or an out-of-range
//! query) and surface as typed values instead of being clamped.

use thiserror::Error;

use crate::sim::CellKind;

/// Why the motion sensors cannot drive the game
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    /// The platform has no orientation API at all
    #[error("device orientation is not supported on this platform")]
    Unsupported,
    /// Not a mobile device (desktop browser, headless host)
    #[error("motion sensors are not available on this device")]
    Unavailable,
    /// The user declined the permission prompt
    #[error("sensor permission denied")]
    PermissionDenied,
    /// No sensor sample arrived before the activation deadline
    #[error("no sensor data within {timeout_ms} ms; sensors likely unsupported")]
    ActivationTimeout { timeout_ms: u64 },
    /// Platform-reported failure
    #[error("sensor failure: {0}")]
    Platform(String),
    /// Permission answer delivered while no activation was pending
    #[error("no activation pending (state: {state})")]
    InvalidActivation { state: &'static str },
}

/// Tile grid contract violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell ({col}, {row}) is outside the {width}x{height} grid")]
    OutOfBounds {
        col: i32,
        row: i32,
        width: usize,
        height: usize,
    },
    #[error("level has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile code {code} at ({col}, {row})")]
    UnknownCode { code: u8, col: usize, row: usize },
    #[error("level has no {0:?} cell")]
    MissingStart(CellKind),
    #[error("grid declares {width}x{height} but holds {found} cells")]
    SizeMismatch {
        width: usize,
        height: usize,
        found: usize,
    },
}

/// Item placement failures (shopping-list variant)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("{requested} items requested but only {available} pellet cells are free")]
    NotEnoughCells { requested: usize, available: usize },
}

/// Settings loading and validation failures
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Session construction failures
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("session has been torn down")]
    TornDown,
}
