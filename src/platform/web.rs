//! Browser binding
//!
//! `WebGame` wraps the simulation for a JS host: key events go in, the host
//! calls [`WebGame::advance`] from `requestAnimationFrame`, and reads back the
//! strip pixels and a JSON snapshot for its HUD.

use wasm_bindgen::prelude::*;

use super::InputState;
use crate::consts::MAX_SUBSTEPS;
use crate::renderer::{FrameBuffer, FrameView};
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, tick};

/// Install the panic hook and console logger (safe to call more than once)
#[wasm_bindgen]
pub fn init() {
    console_error_panic_hook::set_once();
    // Already initialized is fine
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    input: InputState,
    frame_buffer: FrameBuffer,
    accumulator: f64,
    last_time: Option<f64>,
    last_phase: GamePhase,
}

impl WebGame {
    fn from_settings(settings: Settings) -> Self {
        let seed = js_sys::Date::now() as u64;
        let frame_buffer = FrameBuffer::new(settings.display_size);
        let state = GameState::new(settings, seed);
        let last_phase = state.phase;
        log::info!("Surviving MBTA ready (seed {seed})");
        Self {
            state,
            input: InputState::new(),
            frame_buffer,
            accumulator: 0.0,
            last_time: None,
            last_phase,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }
}

#[wasm_bindgen]
impl WebGame {
    /// New game with settings from LocalStorage
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        Self::from_settings(Settings::load())
    }

    /// New game with explicit settings; rejects invalid JSON
    pub fn with_settings(json: &str) -> Result<WebGame, JsValue> {
        let settings = Settings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        settings.save();
        Ok(Self::from_settings(settings))
    }

    /// Returns true if the key is bound
    pub fn key_down(&mut self, key: &str, repeat: bool) -> bool {
        self.input.key_down(key, repeat)
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.key_up(key);
    }

    /// Drop held keys when the page loses focus
    pub fn release_keys(&mut self) {
        self.input.release_all();
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.input.idle_mode = idle;
    }

    /// Run exactly one simulation frame
    pub fn step(&mut self) {
        let input = self.input.take_tick_input();
        tick(&mut self.state, &input);

        if self.state.phase != self.last_phase {
            log::info!("Phase {:?} -> {:?}", self.last_phase, self.state.phase);
            self.last_phase = self.state.phase;
        }
        self.frame_buffer.compose(&self.state);
    }

    /// Advance by wall-clock time (ms, from `requestAnimationFrame`) with a
    /// fixed timestep. Returns the number of frames simulated.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let frame_ms = 1000.0 / self.state.settings.assumed_fps.max(1) as f64;
        let dt = match self.last_time {
            // Clamp long pauses (background tab)
            Some(last) => (now_ms - last).clamp(0.0, 100.0),
            None => frame_ms,
        };
        self.last_time = Some(now_ms);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= frame_ms && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= frame_ms;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(frame_ms);
        }
        substeps
    }

    /// RGBA bytes, four per cell; alpha 0 = transparent
    pub fn pixels(&self) -> Vec<u8> {
        self.frame_buffer.as_bytes().to_vec()
    }

    pub fn snapshot_json(&self) -> String {
        FrameView::capture(&self.state).to_json()
    }

    pub fn display_size(&self) -> usize {
        self.state.settings.display_size
    }

    pub fn pixel_size(&self) -> f32 {
        self.state.settings.pixel_size
    }

    pub fn frame(&self) -> u64 {
        self.state.frame
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
