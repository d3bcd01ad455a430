//! Fixed timestep simulation tick
//!
//! One logical frame: move the player, eat, then move adversaries.

use super::adversary::update_adversaries;
use super::interaction::evaluate_player_cell;
use super::motion::integrate_player;
use super::state::GameState;
use crate::sensors::SensorSnapshot;

/// Advance the game state by one tick.
///
/// `input` is a consistent snapshot of heading and step count taken before
/// the tick. `dt` is the integration factor applied to player velocity.
pub fn tick(state: &mut GameState, input: &SensorSnapshot, dt: f32) {
    if state.is_over() {
        return;
    }

    state.time_ticks += 1;

    integrate_player(&mut state.player, &state.grid, input, &state.tuning, dt);

    if evaluate_player_cell(state) {
        state.finish(true);
        return;
    }

    let caught = update_adversaries(
        &mut state.adversaries,
        &state.player,
        &state.grid,
        state.time_ticks,
        state.tuning.adversary_noise,
        state.tuning.adversary_noise_rate,
    );
    if let Some(id) = caught {
        log::debug!("Adversary {} caught the player", id);
        state.finish(false);
    }
}
