//! Player motion integration
//!
//! Steps become velocity impulses along the current heading; friction decays
//! velocity every tick. The maze wraps horizontally.

use glam::Vec2;

use super::collision::{bounce_velocity, move_circle};
use super::grid::TileGrid;
use super::state::Player;
use crate::heading_to_vector;
use crate::sensors::SensorSnapshot;
use crate::settings::Tuning;

/// Apply a step impulse if the step count moved since the last tick.
///
/// Returns true when an impulse was added. Several steps landing between two
/// ticks still produce a single impulse.
pub fn apply_step_impulse(player: &mut Player, sensors: &SensorSnapshot, step_force: f32) -> bool {
    if sensors.step_count <= player.last_step_count {
        return false;
    }
    player.vel += heading_to_vector(sensors.heading) * step_force;
    player.last_step_count = sensors.step_count;
    true
}

/// Wrap x into [0, world_width); y is left alone
#[inline]
pub fn wrap_horizontal(pos: Vec2, world_width: f32) -> Vec2 {
    let mut pos = pos;
    if pos.x >= world_width {
        pos.x -= world_width;
    } else if pos.x < 0.0 {
        pos.x += world_width;
    }
    pos
}

/// Advance the player one tick: impulse, friction, collide, wrap
pub fn integrate_player(
    player: &mut Player,
    grid: &TileGrid,
    sensors: &SensorSnapshot,
    tuning: &Tuning,
    dt: f32,
) {
    if apply_step_impulse(player, sensors, tuning.step_force) {
        log::debug!(
            "Step {} at heading {:.0}: vel=({:.1}, {:.1})",
            sensors.step_count,
            sensors.heading,
            player.vel.x,
            player.vel.y
        );
    }

    player.vel *= tuning.move_decay;

    let blocked = move_circle(grid, &mut player.pos, player.vel * dt, player.radius);
    if blocked.any() {
        log::trace!("Player bumped a wall at ({:.1}, {:.1})", player.pos.x, player.pos.y);
        player.vel = bounce_velocity(player.vel, blocked, tuning.wall_bounce);
    }

    player.pos = wrap_horizontal(player.pos, grid.world_width());
    player.mouth.advance();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_row() -> TileGrid {
        TileGrid::from_codes(
            &[
                [1u8, 1, 1, 1, 1, 1],
                [0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0],
                [1, 1, 1, 1, 1, 1],
            ],
            30.0,
        )
        .unwrap()
    }

    fn snapshot(heading: f32, step_count: u64) -> SensorSnapshot {
        SensorSnapshot {
            heading,
            step_count,
        }
    }

    #[test]
    fn test_impulse_once_per_new_step() {
        let mut player = Player::new(Vec2::ZERO, 10.0);
        assert!(!apply_step_impulse(&mut player, &snapshot(0.0, 0), 25.0));
        assert!(apply_step_impulse(&mut player, &snapshot(0.0, 1), 25.0));
        assert!((player.vel.y + 25.0).abs() < 1e-4);
        assert!(player.vel.x.abs() < 1e-4);
        // Same count again: no new impulse
        assert!(!apply_step_impulse(&mut player, &snapshot(0.0, 1), 25.0));
        // Three steps at once still give one impulse
        assert!(apply_step_impulse(&mut player, &snapshot(90.0, 4), 25.0));
        assert!((player.vel.x - 25.0).abs() < 1e-4);
        assert_eq!(player.last_step_count, 4);
    }

    #[test]
    fn test_friction_decays_velocity() {
        let grid = open_row();
        let tuning = Tuning::default();
        let mut player = Player::new(grid.cell_center(2, 2), 12.0);
        player.vel = Vec2::new(10.0, 0.0);

        integrate_player(&mut player, &grid, &snapshot(0.0, 0), &tuning, tuning.time_step);

        assert!((player.vel.x - 9.2).abs() < 1e-4);
        let expected_x = 75.0 + 9.2 * tuning.time_step;
        assert!((player.pos.x - expected_x).abs() < 1e-3);
    }

    #[test]
    fn test_step_moves_up() {
        let grid = open_row();
        let tuning = Tuning::default();
        let start = grid.cell_center(2, 2);
        let mut player = Player::new(start, 12.0);

        integrate_player(&mut player, &grid, &snapshot(0.0, 1), &tuning, tuning.time_step);

        assert!(player.vel.y < 0.0);
        assert!(player.pos.y < start.y);
        assert!((player.pos.x - start.x).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_horizontal() {
        assert_eq!(wrap_horizontal(Vec2::new(181.0, 50.0), 180.0), Vec2::new(1.0, 50.0));
        assert_eq!(wrap_horizontal(Vec2::new(180.0, 50.0), 180.0), Vec2::new(0.0, 50.0));
        assert_eq!(wrap_horizontal(Vec2::new(-2.0, 50.0), 180.0), Vec2::new(178.0, 50.0));
        assert_eq!(wrap_horizontal(Vec2::new(90.0, 50.0), 180.0), Vec2::new(90.0, 50.0));
    }

    #[test]
    fn test_wraps_through_tunnel() {
        let grid = open_row();
        let tuning = Tuning::default();
        let mut player = Player::new(Vec2::new(grid.world_width() + 0.5, 75.0), 12.0);
        player.vel = Vec2::new(0.0, 0.0);

        integrate_player(&mut player, &grid, &snapshot(0.0, 0), &tuning, tuning.time_step);

        assert!((player.pos.x - 0.5).abs() < 1e-3);
        assert_eq!(player.pos.y, 75.0);
        assert_eq!(player.vel, Vec2::ZERO);
    }

    #[test]
    fn test_wall_bounce() {
        let grid = open_row();
        let tuning = Tuning::default();
        // Just under the top wall, pushed upward hard
        let mut player = Player::new(Vec2::new(75.0, 43.0), 12.0);
        player.vel = Vec2::new(5.0, -50.0);

        integrate_player(&mut player, &grid, &snapshot(0.0, 0), &tuning, tuning.time_step);

        // Y blocked and softly inverted, X still free
        assert!(player.vel.y > 0.0);
        assert!((player.vel.y - 50.0 * 0.92 * 0.3).abs() < 1e-3);
        assert!((player.vel.x - 5.0 * 0.92).abs() < 1e-4);
        assert_eq!(player.pos.y, 43.0);
        assert!(player.pos.x > 75.0);
    }
}
