//! Adversary pursuit
//!
//! Each adversary seeks a point wobbling around the player rather than the
//! player itself, with a per-adversary phase so a pack spreads out.

use glam::Vec2;

use super::collision::move_circle;
use super::grid::TileGrid;
use super::state::{Adversary, Player};

/// Phase spacing between adversaries (golden angle, radians)
const PHASE_SPREAD: f32 = 2.399_963;

/// Below this distance an adversary holds still instead of jittering
const MIN_SEEK_DISTANCE: f32 = 1.0;

/// Wobble phase for adversary `index` at tick `time_ticks`
#[inline]
pub fn phase_offset(time_ticks: u64, index: usize, rate: f32) -> f32 {
    time_ticks as f32 * rate + index as f32 * PHASE_SPREAD
}

/// Point near the player that an adversary steers toward
pub fn seek_target(player_pos: Vec2, phase: f32, amplitude: f32) -> Vec2 {
    player_pos + Vec2::new(phase.sin(), phase.cos()) * amplitude
}

/// Move one adversary a single tick toward its target, sliding along walls
pub fn step_adversary(adversary: &mut Adversary, target: Vec2, grid: &TileGrid) {
    let to_target = target - adversary.pos;
    if to_target.length() <= MIN_SEEK_DISTANCE {
        return;
    }
    let delta = to_target.normalize() * adversary.speed;
    move_circle(grid, &mut adversary.pos, delta, adversary.radius);
}

/// Circles overlap
#[inline]
pub fn touches(adversary: &Adversary, player: &Player) -> bool {
    adversary.pos.distance(player.pos) < adversary.radius + player.radius
}

/// Move every adversary, then check for a catch.
///
/// Returns the id of the first adversary touching the player after its move.
pub fn update_adversaries(
    adversaries: &mut [Adversary],
    player: &Player,
    grid: &TileGrid,
    time_ticks: u64,
    noise_amplitude: f32,
    noise_rate: f32,
) -> Option<u32> {
    for (i, adversary) in adversaries.iter_mut().enumerate() {
        let phase = phase_offset(time_ticks, i, noise_rate);
        let target = seek_target(player.pos, phase, noise_amplitude);
        step_adversary(adversary, target, grid);

        if touches(adversary, player) {
            return Some(adversary.id);
        }
    }
    None
}
