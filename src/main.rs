//! Market Run entry point
//!
//! The browser build is driven by the host page through `WebGame`. Native
//! builds run a headless demo: an autopilot walks the maze through the manual
//! override controls while every game event is logged.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::collections::VecDeque;

    use glam::Vec2;

    use market_run::consts::SIM_DT;
    use market_run::platform::PlatformProfile;
    use market_run::sim::{CellKind, TileGrid};
    use market_run::{GameListener, Session, SessionError, Settings, vector_to_heading};

    /// Ten simulated minutes at 60 Hz
    const MAX_TICKS: u32 = 60 * 60 * 10;
    /// Only step again once the cart has nearly stopped
    const SETTLE_SPEED: f32 = 4.0;

    struct LogListener;

    impl GameListener for LogListener {
        fn on_score_update(&mut self, delta: u32) {
            log::debug!("+{} points", delta);
        }

        fn on_item_collected(&mut self, label: &str) {
            log::info!("Picked up {}", label);
        }

        fn on_game_over(&mut self, won: bool) {
            if won {
                log::info!("Shopping done!");
            } else {
                log::info!("Caught by security");
            }
        }
    }

    /// Neighbouring open cells, wrapping horizontally like the player does
    fn neighbours(grid: &TileGrid, (col, row): (i32, i32)) -> impl Iterator<Item = (i32, i32)> + '_ {
        let width = grid.width() as i32;
        [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .into_iter()
            .map(move |(dc, dr)| ((col + dc).rem_euclid(width), row + dr))
            .filter(move |&(c, r)| matches!(grid.is_wall(c, r), Ok(false)))
    }

    /// First cell on a shortest path from `start` to the nearest `target` cell
    fn next_cell(grid: &TileGrid, start: (i32, i32), target: CellKind) -> Option<(i32, i32)> {
        if !grid.contains(start.0, start.1) {
            return None;
        }
        let width = grid.width();
        let index = |(c, r): (i32, i32)| r as usize * width + c as usize;

        let mut came_from: Vec<Option<(i32, i32)>> = vec![None; width * grid.height()];
        let mut queue = VecDeque::from([start]);
        came_from[index(start)] = Some(start);

        while let Some(cell) = queue.pop_front() {
            if cell != start && matches!(grid.cell_at(cell.0, cell.1), Ok(kind) if kind == target) {
                // Walk back to the step right after start
                let mut step = cell;
                while let Some(prev) = came_from[index(step)] {
                    if prev == start {
                        return Some(step);
                    }
                    step = prev;
                }
                return None;
            }
            for next in neighbours(grid, cell) {
                if came_from[index(next)].is_none() {
                    came_from[index(next)] = Some(cell);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Shortest offset from `from` to `to` in a horizontally wrapping world
    fn wrapped_offset(from: Vec2, to: Vec2, world_width: f32) -> Vec2 {
        let mut d = to - from;
        if d.x > world_width / 2.0 {
            d.x -= world_width;
        } else if d.x < -world_width / 2.0 {
            d.x += world_width;
        }
        d
    }

    pub fn run(settings: Settings, seed: u64) -> Result<(), SessionError> {
        let mut session = Session::new(settings, &PlatformProfile::headless(), LogListener, seed, 0.0)?;
        let mut now_ms = 0.0;

        for _ in 0..MAX_TICKS {
            if session.is_over() {
                break;
            }

            let state = session.state();
            if state.player.vel.length() < SETTLE_SPEED {
                let here = state.grid.world_to_cell(state.player.pos);
                let waypoint = next_cell(&state.grid, here, state.win_kind);
                if let Some((col, row)) = waypoint {
                    let offset = wrapped_offset(
                        state.player.pos,
                        state.grid.cell_center(col, row),
                        state.grid.world_width(),
                    );
                    session.sensors().set_heading(vector_to_heading(offset));
                    session.sensors().simulate_step();
                }
            }

            now_ms += f64::from(SIM_DT) * 1000.0;
            session.advance(SIM_DT, now_ms);
        }

        let state = session.state();
        log::info!(
            "Demo finished after {} ticks: score {}, {} left, phase {:?}",
            state.time_ticks,
            state.score,
            state.grid.remaining(state.win_kind),
            state.phase
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Market Run (native) starting headless demo...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match market_run::Settings::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("{}", err);
                std::process::exit(1);
            }
        },
        None => market_run::Settings::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);

    if let Err(err) = demo::run(settings, seed) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `platform::web::start`, this is just to satisfy the compiler
}
