//! Circle-vs-tile collision
//!
//! A moving circle is tested against the wall tiles in the 3x3 block around
//! the tile it occupies. Movement is resolved one axis at a time so entities
//! slide along walls instead of stopping dead on diagonal contact.

use glam::Vec2;

use super::grid::TileGrid;

/// Which axes were blocked by a resolved move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisBlock {
    pub x: bool,
    pub y: bool,
}

impl AxisBlock {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Closest point on an axis-aligned rectangle to `p`
#[inline]
pub fn closest_point_on_rect(min: Vec2, max: Vec2, p: Vec2) -> Vec2 {
    p.clamp(min, max)
}

/// Check a circle against the wall tiles around its center
pub fn circle_hits_walls(grid: &TileGrid, center: Vec2, radius: f32) -> bool {
    let (tile_x, tile_y) = grid.world_to_cell(center);
    let tile = grid.tile_size();
    let radius_sq = radius * radius;

    for row in tile_y - 1..=tile_y + 1 {
        for col in tile_x - 1..=tile_x + 1 {
            // Off-grid neighbours (tunnel mouths) never block
            if !grid.contains(col, row) || !matches!(grid.is_wall(col, row), Ok(true)) {
                continue;
            }

            let min = Vec2::new(col as f32 * tile, row as f32 * tile);
            let max = min + Vec2::splat(tile);
            let closest = closest_point_on_rect(min, max, center);

            if center.distance_squared(closest) < radius_sq {
                return true;
            }
        }
    }
    false
}

/// Move a circle by `delta`, X first then Y, rejecting any axis that would
/// overlap a wall. Returns which axes were blocked.
pub fn move_circle(grid: &TileGrid, pos: &mut Vec2, delta: Vec2, radius: f32) -> AxisBlock {
    let mut blocked = AxisBlock::default();

    let next_x = Vec2::new(pos.x + delta.x, pos.y);
    if circle_hits_walls(grid, next_x, radius) {
        blocked.x = true;
    } else {
        pos.x = next_x.x;
    }

    let next_y = Vec2::new(pos.x, pos.y + delta.y);
    if circle_hits_walls(grid, next_y, radius) {
        blocked.y = true;
    } else {
        pos.y = next_y.y;
    }

    blocked
}

/// Soft bounce on the blocked axes: invert and damp the velocity component
#[inline]
pub fn bounce_velocity(vel: Vec2, blocked: AxisBlock, restitution: f32) -> Vec2 {
    Vec2::new(
        if blocked.x { -vel.x * restitution } else { vel.x },
        if blocked.y { -vel.y * restitution } else { vel.y },
    )
}
