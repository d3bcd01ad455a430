//! Pellet/item consumption and the win check

use super::grid::CellKind;
use super::state::{GameEvent, GameState};

/// What the player ate this tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consumed {
    Nothing,
    Pellet,
    SpecialItem { label: Option<String> },
}

/// Eat whatever is under the player and queue score/item events.
///
/// Returns true when the win condition is met by this consumption.
pub fn evaluate_player_cell(state: &mut GameState) -> bool {
    let (col, row) = state.grid.world_to_cell(state.player.pos);
    // Mid-wrap the player can sit just outside the grid
    if !state.grid.contains(col, row) {
        return false;
    }

    let consumed = match state.grid.consume(col, row) {
        Ok(CellKind::Pellet) => Consumed::Pellet,
        Ok(CellKind::SpecialItem) => Consumed::SpecialItem {
            label: state.items.take(col, row),
        },
        Ok(_) => Consumed::Nothing,
        Err(err) => {
            log::error!("Player cell lookup failed: {}", err);
            return false;
        }
    };

    match consumed {
        Consumed::Nothing => return false,
        Consumed::Pellet => {
            let points = state.tuning.pellet_score;
            state.award(points);
        }
        Consumed::SpecialItem { label } => {
            let points = state.tuning.special_item_score;
            state.award(points);
            if let Some(label) = label {
                log::info!("Collected '{}' at ({}, {})", label, col, row);
                state.events.push(GameEvent::ItemCollected(label));
            }
        }
    }

    state.grid.remaining(state.win_kind) == 0
}
