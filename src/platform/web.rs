//! Browser bindings
//!
//! The host page owns rendering, DOM event listeners and the permission
//! prompt. It forwards raw events into a `WebGame` and calls `frame` from
//! `requestAnimationFrame`.

use js_sys::{Function, Reflect};
use wasm_bindgen::prelude::*;

use super::PlatformProfile;
use crate::sensors::{ManualCommand, MotionSample, OrientationSample, PermissionResponse};
use crate::session::{GameListener, Session};
use crate::settings::Settings;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Market Run wasm module loaded");
}

/// Forwards notifications to optional JS callbacks
struct JsListener {
    on_score: Option<Function>,
    on_item: Option<Function>,
    on_game_over: Option<Function>,
}

impl JsListener {
    fn call(callback: &Option<Function>, arg: JsValue) {
        if let Some(f) = callback {
            if let Err(err) = f.call1(&JsValue::NULL, &arg) {
                log::error!("Game callback threw: {:?}", err);
            }
        }
    }
}

impl GameListener for JsListener {
    fn on_score_update(&mut self, delta: u32) {
        Self::call(&self.on_score, JsValue::from(delta));
    }

    fn on_item_collected(&mut self, label: &str) {
        Self::call(&self.on_item, JsValue::from_str(label));
    }

    fn on_game_over(&mut self, won: bool) {
        Self::call(&self.on_game_over, JsValue::from_bool(won));
    }
}

fn now_ms() -> f64 {
    js_sys::Date::now()
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Probe the current browser
fn detect_profile() -> PlatformProfile {
    let Some(window) = web_sys::window() else {
        return PlatformProfile::headless();
    };
    let orientation_event = Reflect::get(&window, &JsValue::from_str("DeviceOrientationEvent"))
        .ok()
        .filter(|ctor| !ctor.is_undefined());
    let has_request_permission = orientation_event
        .as_ref()
        .and_then(|ctor| Reflect::get(ctor, &JsValue::from_str("requestPermission")).ok())
        .is_some_and(|f| f.is_function());

    let user_agent = window.navigator().user_agent().unwrap_or_default();
    PlatformProfile::from_user_agent(&user_agent, orientation_event.is_some())
        .with_permission_api(has_request_permission)
}

#[wasm_bindgen]
pub struct WebGame {
    session: Session<JsListener>,
    last_time: Option<f64>,
}

#[wasm_bindgen]
impl WebGame {
    /// `settings_json` may be omitted for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(
        settings_json: Option<String>,
        on_score: Option<Function>,
        on_item: Option<Function>,
        on_game_over: Option<Function>,
    ) -> Result<WebGame, JsValue> {
        let settings = match settings_json {
            Some(json) => Settings::from_json(&json).map_err(to_js_error)?,
            None => Settings::default(),
        };
        let listener = JsListener {
            on_score,
            on_item,
            on_game_over,
        };
        let now = now_ms();
        let session = Session::new(settings, &detect_profile(), listener, now as u64, now)
            .map_err(to_js_error)?;
        Ok(WebGame {
            session,
            last_time: None,
        })
    }

    /// Call once per animation frame with the rAF timestamp. Returns ticks run.
    pub fn frame(&mut self, time: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => ((time - last) / 1000.0) as f32,
            None => crate::consts::SIM_DT,
        };
        self.last_time = Some(time);
        self.session.advance(dt, now_ms())
    }

    /// Single logical tick, for hosts driving their own timer
    pub fn tick(&mut self) -> bool {
        self.session.tick()
    }

    /// Must be called from a user gesture. Returns the permission state name.
    pub fn request_activation(&self) -> Result<String, JsValue> {
        self.session
            .sensors()
            .request_activation(now_ms())
            .map(|state| state.name().to_string())
            .map_err(to_js_error)
    }

    /// Forward the result of `DeviceOrientationEvent.requestPermission()`
    pub fn permission_response(&self, granted: bool, failure: Option<String>) -> Result<String, JsValue> {
        let response = match (granted, failure) {
            (_, Some(reason)) => PermissionResponse::Failed(reason),
            (true, None) => PermissionResponse::Granted,
            (false, None) => PermissionResponse::Denied,
        };
        self.session
            .sensors()
            .permission_response(response)
            .map(|state| state.name().to_string())
            .map_err(to_js_error)
    }

    pub fn on_orientation(&self, compass_heading: Option<f32>, alpha: Option<f32>) -> bool {
        let sample = OrientationSample {
            compass_heading,
            alpha,
        };
        self.session.sensors().on_orientation(&sample, now_ms())
    }

    pub fn on_motion(&self, x: Option<f32>, y: Option<f32>, z: Option<f32>) -> bool {
        let sample = MotionSample::from_axes(x, y, z);
        self.session.sensors().on_motion(&sample, now_ms())
    }

    /// Keyboard override. Returns true if the key was handled.
    pub fn key_down(&self, key: &str) -> bool {
        match ManualCommand::from_key(key) {
            Some(command) => {
                self.session.sensors().apply_command(command);
                true
            }
            None => false,
        }
    }

    pub fn simulate_step(&self) {
        self.session.sensors().simulate_step();
    }

    pub fn set_heading(&self, heading: f32) {
        self.session.sensors().set_heading(heading);
    }

    /// Returns the value applied after clamping
    pub fn set_sensitivity(&self, sensitivity: f32) -> f32 {
        self.session
            .sensors()
            .set_sensitivity(sensitivity)
            .unwrap_or_else(|| self.session.sensors().read(|f| f.sensitivity()))
    }

    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.last_time = None;
        self.session
            .restart(now_ms() as u64)
            .map_err(to_js_error)
    }

    pub fn teardown(&mut self) {
        self.session.teardown();
    }

    #[wasm_bindgen(getter)]
    pub fn heading(&self) -> f32 {
        self.session.sensors().snapshot().heading
    }

    #[wasm_bindgen(getter)]
    pub fn step_count(&self) -> f64 {
        self.session.sensors().snapshot().step_count as f64
    }

    #[wasm_bindgen(getter)]
    pub fn direction(&self) -> String {
        let direction = self.session.sensors().read(|f| f.direction());
        format!("{:?}", direction).to_lowercase()
    }

    #[wasm_bindgen(getter)]
    pub fn permission(&self) -> String {
        self.session.sensors().permission().name().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn last_error(&self) -> Option<String> {
        self.session
            .sensors()
            .read(|f| f.last_error().map(|err| err.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> f64 {
        self.session.state().score as f64
    }

    #[wasm_bindgen(getter)]
    pub fn is_over(&self) -> bool {
        self.session.is_over()
    }

    /// Full game state as JSON for the renderer
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.state()).map_err(to_js_error)
    }
}
