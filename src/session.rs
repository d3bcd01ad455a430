//! One running game
//!
//! A `Session` owns the game state, the sensor handle and the listener, and
//! drives the simulation either one tick at a time or from frame deltas via
//! a fixed-step accumulator.

use crate::error::SessionError;
use crate::platform::PlatformProfile;
use crate::sensors::{SensorFusion, SensorHandle};
use crate::settings::Settings;
use crate::sim::{self, GameEvent, GameState};

/// Longest frame delta fed into the accumulator (seconds)
const MAX_FRAME_DT: f32 = 0.1;

/// Receives game notifications, each at most once per cause.
/// `on_game_over` is always the last call.
pub trait GameListener {
    fn on_score_update(&mut self, _delta: u32) {}
    fn on_item_collected(&mut self, _label: &str) {}
    fn on_game_over(&mut self, _won: bool) {}
}

/// Ignore all notifications
impl GameListener for () {}

/// Record notifications in order
impl GameListener for Vec<GameEvent> {
    fn on_score_update(&mut self, delta: u32) {
        self.push(GameEvent::ScoreUpdate(delta));
    }

    fn on_item_collected(&mut self, label: &str) {
        self.push(GameEvent::ItemCollected(label.to_string()));
    }

    fn on_game_over(&mut self, won: bool) {
        self.push(GameEvent::GameOver { won });
    }
}

pub struct Session<L> {
    settings: Settings,
    state: GameState,
    sensors: SensorHandle,
    listener: L,
    accumulator: f32,
    torn_down: bool,
}

impl<L: GameListener> Session<L> {
    pub fn new(
        settings: Settings,
        profile: &PlatformProfile,
        listener: L,
        seed: u64,
        now_ms: f64,
    ) -> Result<Self, SessionError> {
        settings.validate()?;
        let state = GameState::new(&settings, seed)?;

        let (source, permission) = profile.probe(now_ms);
        let sensors = SensorHandle::new(SensorFusion::new(source, permission, &settings));

        Ok(Self {
            settings,
            state,
            sensors,
            listener,
            accumulator: 0.0,
            torn_down: false,
        })
    }

    /// Handle for sensor callbacks and manual controls
    pub fn sensors(&self) -> &SensorHandle {
        &self.sensors
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Run exactly one logical tick. Returns false if nothing ran.
    pub fn tick(&mut self) -> bool {
        if self.torn_down || self.state.is_over() {
            return false;
        }

        let input = self.sensors.snapshot();
        let dt = self.state.tuning.time_step;
        sim::tick(&mut self.state, &input, dt);
        self.dispatch();
        true
    }

    /// Feed one display frame of `frame_dt` seconds. Also resolves a
    /// pending sensor activation against `now_ms`.
    ///
    /// Returns the number of ticks run.
    pub fn advance(&mut self, frame_dt: f32, now_ms: f64) -> u32 {
        if self.torn_down {
            return 0;
        }

        if let Err(err) = self.sensors.poll(now_ms) {
            log::warn!("Sensors unavailable, manual controls only: {}", err);
        }

        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let interval = self.settings.frame_interval;
        let mut substeps = 0;
        while self.accumulator >= interval && substeps < self.settings.max_substeps {
            if !self.tick() {
                self.accumulator = 0.0;
                break;
            }
            self.accumulator -= interval;
            substeps += 1;
        }
        substeps
    }

    /// Start over with a fresh grid, keeping the sensor handle.
    /// A torn down session stays down: its sensors are detached for good.
    pub fn restart(&mut self, seed: u64) -> Result<(), SessionError> {
        if self.torn_down {
            return Err(SessionError::TornDown);
        }
        let mut state = GameState::new(&self.settings, seed)?;
        // Steps taken before the restart must not push the new player
        state.player.last_step_count = self.sensors.snapshot().step_count;
        self.state = state;
        self.accumulator = 0.0;
        log::info!("Session restarted with seed {}", seed);
        Ok(())
    }

    /// Stop ticking and detach sensors. Late callbacks become no-ops.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.sensors.detach();
        self.torn_down = true;
        self.accumulator = 0.0;
        log::info!(
            "Session torn down at tick {} with score {}",
            self.state.time_ticks,
            self.state.score
        );
    }

    fn dispatch(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::ScoreUpdate(delta) => self.listener.on_score_update(delta),
                GameEvent::ItemCollected(label) => self.listener.on_item_collected(&label),
                GameEvent::GameOver { won } => self.listener.on_game_over(won),
            }
        }
    }
}

impl<L> Drop for Session<L> {
    fn drop(&mut self) {
        self.sensors.detach();
    }
}
