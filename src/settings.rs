//! Game settings and tuning
//!
//! Everything the core treats as an externally supplied constant. Settings
//! deserialize from JSON with every field optional.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::{DEFAULT_LEVEL, WinCondition};

/// Physics and scoring constants copied into each game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Velocity impulse per step
    pub step_force: f32,
    /// Per-tick velocity multiplier (friction)
    pub move_decay: f32,
    /// Integration factor per tick
    pub time_step: f32,
    /// Velocity kept on the blocked axis after hitting a wall (inverted)
    pub wall_bounce: f32,
    /// Entity radius as a fraction of the tile size
    pub entity_radius_factor: f32,
    pub pellet_score: u32,
    pub special_item_score: u32,
    /// Wobble radius around the player adversaries aim for
    pub adversary_noise: f32,
    /// Wobble rate (radians per tick)
    pub adversary_noise_rate: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            step_force: STEP_FORCE,
            move_decay: MOVE_DECAY,
            time_step: TIME_STEP,
            wall_bounce: WALL_BOUNCE,
            entity_radius_factor: ENTITY_RADIUS_FACTOR,
            pellet_score: PELLET_SCORE,
            special_item_score: SPECIAL_ITEM_SCORE,
            adversary_noise: ADVERSARY_NOISE,
            adversary_noise_rate: ADVERSARY_NOISE_RATE,
        }
    }
}

/// One pursuing adversary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdversarySettings {
    /// Movement per tick
    pub speed: f32,
    pub color: String,
}

impl Default for AdversarySettings {
    fn default() -> Self {
        Self {
            speed: ADVERSARY_SPEED,
            color: "#ff0000".to_string(),
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Sensors ===
    /// Acceleration magnitude delta (g-force) that counts as a step
    pub step_sensitivity: f32,
    /// Minimum gap between accepted steps (ms)
    pub step_debounce_ms: f64,
    /// How long a pending activation waits for its first sample (ms)
    pub activation_timeout_ms: f64,

    // === Maze ===
    /// Rows of tile codes (0 empty, 1 wall, 2 pellet, 3 item, 8 adversary, 9 player)
    pub level: Vec<Vec<u8>>,
    /// Tile edge length in world units
    pub tile_size: f32,
    /// Items to hide on pellet cells (shopping-list mode)
    pub shopping_list: Vec<String>,
    pub win_condition: WinCondition,

    // === Entities ===
    pub adversaries: Vec<AdversarySettings>,
    pub tuning: Tuning,

    // === Scheduler ===
    /// Seconds per logical tick
    pub frame_interval: f32,
    /// Maximum ticks run for one frame
    pub max_substeps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            step_sensitivity: DEFAULT_STEP_SENSITIVITY,
            step_debounce_ms: STEP_DEBOUNCE_MS,
            activation_timeout_ms: ACTIVATION_TIMEOUT_MS,

            level: DEFAULT_LEVEL.iter().map(|row| row.to_vec()).collect(),
            tile_size: TILE_SIZE,
            shopping_list: Vec::new(),
            win_condition: WinCondition::Auto,

            adversaries: vec![AdversarySettings::default()],
            tuning: Tuning::default(),

            frame_interval: SIM_DT,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check ranges the simulation relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
            SettingsError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if !(MIN_STEP_SENSITIVITY..=MAX_STEP_SENSITIVITY).contains(&self.step_sensitivity) {
            return Err(invalid(
                "step_sensitivity",
                format!(
                    "{} is outside {}..={}",
                    self.step_sensitivity, MIN_STEP_SENSITIVITY, MAX_STEP_SENSITIVITY
                ),
            ));
        }
        if !(self.step_debounce_ms >= 0.0) {
            return Err(invalid("step_debounce_ms", "must be non-negative"));
        }
        if !(MIN_ACTIVATION_TIMEOUT_MS..=MAX_ACTIVATION_TIMEOUT_MS)
            .contains(&self.activation_timeout_ms)
        {
            return Err(invalid(
                "activation_timeout_ms",
                format!(
                    "{} is outside {}..={}",
                    self.activation_timeout_ms, MIN_ACTIVATION_TIMEOUT_MS, MAX_ACTIVATION_TIMEOUT_MS
                ),
            ));
        }
        if !(self.tile_size > 0.0) {
            return Err(invalid("tile_size", "must be positive"));
        }
        if !(self.frame_interval > 0.0) {
            return Err(invalid("frame_interval", "must be positive"));
        }
        if self.max_substeps == 0 {
            return Err(invalid("max_substeps", "must be at least 1"));
        }

        let t = &self.tuning;
        let finite = [
            ("step_debounce_ms", self.step_debounce_ms),
            ("tile_size", f64::from(self.tile_size)),
            ("frame_interval", f64::from(self.frame_interval)),
            ("tuning.step_force", f64::from(t.step_force)),
            ("tuning.time_step", f64::from(t.time_step)),
            ("tuning.adversary_noise", f64::from(t.adversary_noise)),
            ("tuning.adversary_noise_rate", f64::from(t.adversary_noise_rate)),
        ];
        if let Some((field, value)) = finite.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(field, format!("{} is not finite", value)));
        }
        if !(0.0..1.0).contains(&t.move_decay) {
            return Err(invalid("tuning.move_decay", "must be in [0, 1)"));
        }
        if !(0.0..=1.0).contains(&t.wall_bounce) {
            return Err(invalid("tuning.wall_bounce", "must be in [0, 1]"));
        }
        if !(t.entity_radius_factor > 0.0 && t.entity_radius_factor < 0.5) {
            return Err(invalid(
                "tuning.entity_radius_factor",
                "must be in (0, 0.5) so entities fit in a corridor",
            ));
        }
        if !(t.time_step > 0.0) {
            return Err(invalid("tuning.time_step", "must be positive"));
        }
        if let Some(a) = self
            .adversaries
            .iter()
            .find(|a| !(a.speed >= 0.0 && a.speed.is_finite()))
        {
            return Err(invalid(
                "adversaries.speed",
                format!("{} must be finite and non-negative", a.speed),
            ));
        }

        Ok(())
    }
}
