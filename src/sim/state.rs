//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in `GameState`, which the session
//! owns and passes by `&mut` into each subsystem.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{CellKind, TileGrid};
use super::items::ItemPlacement;
use crate::error::{GridError, SessionError};
use crate::settings::{Settings, Tuning};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended; no further ticks mutate state
    GameOver { won: bool },
}

/// Which cells must all be eaten to win
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WinCondition {
    /// Special items if the level starts with any, otherwise pellets
    #[default]
    Auto,
    AllPellets,
    AllSpecialItems,
}

impl WinCondition {
    /// Resolve `Auto` against a freshly built grid
    pub fn resolve(self, grid: &TileGrid) -> CellKind {
        match self {
            WinCondition::AllPellets => CellKind::Pellet,
            WinCondition::AllSpecialItems => CellKind::SpecialItem,
            WinCondition::Auto => {
                if grid.remaining(CellKind::SpecialItem) > 0 {
                    CellKind::SpecialItem
                } else {
                    CellKind::Pellet
                }
            }
        }
    }
}

/// Notifications for the presentation layer, drained after each tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreUpdate(u32),
    ItemCollected(String),
    GameOver { won: bool },
}

/// Cosmetic chomping animation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MouthAnimation {
    /// Half-angle of the mouth opening (radians)
    pub opening: f32,
    pub speed: f32,
}

impl Default for MouthAnimation {
    fn default() -> Self {
        Self {
            opening: 0.0,
            speed: 0.2,
        }
    }
}

impl MouthAnimation {
    pub fn advance(&mut self) {
        self.opening += self.speed;
        if self.opening > 0.25 * std::f32::consts::PI || self.opening < 0.0 {
            self.speed = -self.speed;
        }
    }
}

/// The player's cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Step count seen on the previous tick
    pub last_step_count: u64,
    #[serde(skip)]
    pub mouth: MouthAnimation,
}

impl Player {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            last_step_count: 0,
            mouth: MouthAnimation::default(),
        }
    }
}

/// A pursuing entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adversary {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Movement per tick
    pub speed: f32,
    pub color: String,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete state of one game session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub grid: TileGrid,
    pub items: ItemPlacement,
    /// Cell kind that must be cleared to win
    pub win_kind: CellKind,
    pub player: Player,
    /// Sorted by id for deterministic iteration
    pub adversaries: Vec<Adversary>,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub tuning: Tuning,
    /// Pending notifications
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Build a fresh session from settings and a seed
    pub fn new(settings: &Settings, seed: u64) -> Result<Self, SessionError> {
        let rng_state = RngState::new(seed);
        let mut grid = TileGrid::from_codes(&settings.level, settings.tile_size)?;

        let items = if settings.shopping_list.is_empty() {
            ItemPlacement::default()
        } else {
            ItemPlacement::place(&mut grid, &settings.shopping_list, &rng_state)?
        };
        let win_kind = settings.win_condition.resolve(&grid);

        let tuning = settings.tuning.clone();
        let radius = grid.tile_size() * tuning.entity_radius_factor;

        let (col, row) = grid
            .find_first(CellKind::PlayerStart)
            .ok_or(GridError::MissingStart(CellKind::PlayerStart))?;
        let player = Player::new(grid.cell_center(col, row), radius);

        let starts: Vec<(i32, i32)> = grid.cells_of(CellKind::AdversaryStart).collect();
        if !settings.adversaries.is_empty() && starts.is_empty() {
            return Err(GridError::MissingStart(CellKind::AdversaryStart).into());
        }
        let adversaries = settings
            .adversaries
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let (col, row) = starts[i % starts.len()];
                Adversary {
                    id: i as u32 + 1,
                    pos: grid.cell_center(col, row),
                    radius,
                    speed: spec.speed,
                    color: spec.color.clone(),
                }
            })
            .collect();

        log::info!(
            "New session: seed={}, grid={}x{}, items={}, win on {:?}",
            seed,
            grid.width(),
            grid.height(),
            items.len(),
            win_kind
        );

        Ok(Self {
            seed,
            rng_state,
            grid,
            items,
            win_kind,
            player,
            adversaries,
            score: 0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            tuning,
            events: Vec::new(),
        })
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver { .. })
    }

    /// End the run. Only the first call has any effect.
    pub fn finish(&mut self, won: bool) {
        if self.is_over() {
            return;
        }
        log::info!(
            "Game over ({}) at tick {} with score {}",
            if won { "won" } else { "lost" },
            self.time_ticks,
            self.score
        );
        self.phase = GamePhase::GameOver { won };
        self.events.push(GameEvent::GameOver { won });
    }

    /// Add score and queue the notification
    pub fn award(&mut self, points: u32) {
        self.score += u64::from(points);
        self.events.push(GameEvent::ScoreUpdate(points));
    }

    /// Take queued notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
