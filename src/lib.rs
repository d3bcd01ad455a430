//! Market Run - a motion-controlled maze game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, motion, collisions, adversaries, scoring)
//! - `sensors`: Sensor fusion (heading, step detection, permission state machine)
//! - `platform`: Capability probing and browser bindings
//! - `session`: Owns one running game and its fixed-step scheduler
//! - `settings`: Externally supplied tuning and level data

pub mod error;
pub mod platform;
pub mod sensors;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{GridError, PlacementError, SensorError, SessionError, SettingsError};
pub use session::{GameListener, Session};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed scheduler interval (one logical tick per display frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Tile edge length in world units
    pub const TILE_SIZE: f32 = 30.0;
    /// Entity radius as a fraction of the tile size
    pub const ENTITY_RADIUS_FACTOR: f32 = 0.4;

    /// Velocity impulse added per detected step
    pub const STEP_FORCE: f32 = 25.0;
    /// Per-tick multiplicative friction
    pub const MOVE_DECAY: f32 = 0.92;
    /// Integration factor: position += velocity * TIME_STEP each tick
    pub const TIME_STEP: f32 = 0.16;
    /// Velocity kept (and inverted) on the blocked axis after a wall hit
    pub const WALL_BOUNCE: f32 = 0.3;

    /// Adversary movement per tick
    pub const ADVERSARY_SPEED: f32 = 1.5;
    /// Radius of the wobble around the player that adversaries aim for
    pub const ADVERSARY_NOISE: f32 = 15.0;
    /// Wobble angular rate (radians per tick)
    pub const ADVERSARY_NOISE_RATE: f32 = 0.05;

    /// Score for an ordinary pellet
    pub const PELLET_SCORE: u32 = 10;
    /// Score for a special item
    pub const SPECIAL_ITEM_SCORE: u32 = 100;

    /// Default step threshold (g-force delta)
    pub const DEFAULT_STEP_SENSITIVITY: f32 = 1.2;
    /// Recognized sensitivity range
    pub const MIN_STEP_SENSITIVITY: f32 = 0.2;
    pub const MAX_STEP_SENSITIVITY: f32 = 3.0;
    /// Minimum time between two accepted steps (ms)
    pub const STEP_DEBOUNCE_MS: f64 = 350.0;

    /// Time a pending activation may wait for its first sample (ms)
    pub const ACTIVATION_TIMEOUT_MS: f64 = 5000.0;
    pub const MIN_ACTIVATION_TIMEOUT_MS: f64 = 5000.0;
    pub const MAX_ACTIVATION_TIMEOUT_MS: f64 = 8000.0;

    /// Heading change applied by one keyboard turn (degrees)
    pub const HEADING_NUDGE: f32 = 15.0;
}

/// Normalize a compass heading to [0, 360)
#[inline]
pub fn normalize_heading(degrees: f32) -> f32 {
    let h = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if h >= 360.0 { 0.0 } else { h }
}

/// Unit vector in engine axes for a compass heading.
///
/// Engine y grows downward (row index), so heading 0 (north) points to
/// decreasing y and heading 90 (east) points to increasing x.
#[inline]
pub fn heading_to_vector(heading: f32) -> Vec2 {
    let angle = (heading - 90.0).to_radians();
    Vec2::new(angle.cos(), angle.sin())
}

/// Compass heading pointing along `v` (inverse of [`heading_to_vector`])
#[inline]
pub fn vector_to_heading(v: Vec2) -> f32 {
    normalize_heading(v.x.atan2(-v.y).to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_heading() {
        assert_eq!(normalize_heading(0.0), 0.0);
        assert_eq!(normalize_heading(360.0), 0.0);
        assert!((normalize_heading(-15.0) - 345.0).abs() < 1e-4);
        assert!((normalize_heading(725.0) - 5.0).abs() < 1e-3);
        assert!(normalize_heading(-1e-9) < 360.0);
    }

    #[test]
    fn test_heading_to_vector() {
        let north = heading_to_vector(0.0);
        assert!(north.x.abs() < 1e-5 && (north.y + 1.0).abs() < 1e-5);

        let east = heading_to_vector(90.0);
        assert!((east.x - 1.0).abs() < 1e-5 && east.y.abs() < 1e-5);

        let south = heading_to_vector(180.0);
        assert!((south.y - 1.0).abs() < 1e-5);

        let west = heading_to_vector(270.0);
        assert!((west.x + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_vector_to_heading() {
        assert!(vector_to_heading(Vec2::new(0.0, -1.0)).abs() < 1e-4);
        assert!((vector_to_heading(Vec2::new(1.0, 0.0)) - 90.0).abs() < 1e-4);
        assert!((vector_to_heading(Vec2::new(0.0, 3.0)) - 180.0).abs() < 1e-4);
        assert!((vector_to_heading(Vec2::new(-2.0, 0.0)) - 270.0).abs() < 1e-4);

        let h = vector_to_heading(heading_to_vector(123.0));
        assert!((h - 123.0).abs() < 1e-3);
    }
}
