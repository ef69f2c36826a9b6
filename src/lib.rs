//! Surviving MBTA - A 1D train-surfing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (layout, players, hazards, game phase)
//! - `renderer`: Per-cell frame buffer and read-only snapshot for the host renderer
//! - `platform`: Keyboard bindings and the browser binding
//! - `settings`: Data-driven game tuning, converted to frame counts once

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError, Timings};

/// Game configuration constants
pub mod consts {
    /// Number of cells on the strip
    pub const DISPLAY_SIZE: usize = 30;
    /// Width of one cell on the host canvas (used to map tree scroll onto cells)
    pub const PIXEL_SIZE: f32 = 25.0;
    /// Frame rate every duration is converted with
    pub const ASSUMED_FPS: u32 = 60;
    /// Maximum simulation ticks per host frame (prevents spiral of death)
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Train layout
    pub const WAGON_LENGTH: usize = 7;
    pub const GAP_LENGTH: usize = 2;
    pub const NUM_WAGONS: usize = 3;

    pub const STARTING_LIVES: u8 = 3;
    pub const MAX_PLAYERS: usize = 2;

    /// Tunnel width in cells
    pub const TUNNEL_WIDTH: i32 = 5;

    /// Tree scroll speed (canvas pixels per frame)
    pub const SCROLL_SPEED: f32 = 1.5;
    /// Trees guaranteed to stand in the corridor
    pub const CORRIDOR_TREES: usize = 4;
    /// Trees scattered over random bands and layers
    pub const SCATTERED_TREES: usize = 4;
}

/// Wrap a signed cell index onto a strip of `size` cells
#[inline]
pub fn wrap_index(index: i64, size: usize) -> usize {
    if size == 0 {
        return 0;
    }
    index.rem_euclid(size as i64) as usize
}
