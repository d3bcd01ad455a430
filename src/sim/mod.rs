//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod adversary;
pub mod collision;
pub mod grid;
pub mod interaction;
pub mod items;
pub mod motion;
pub mod state;
pub mod tick;

pub use collision::{AxisBlock, circle_hits_walls, move_circle};
pub use grid::{CellKind, DEFAULT_LEVEL, TileGrid};
pub use items::ItemPlacement;
pub use state::{Adversary, GameEvent, GamePhase, GameState, Player, RngState, WinCondition};
pub use tick::tick;
