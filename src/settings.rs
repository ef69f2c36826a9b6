//! Game settings and tuning
//!
//! Every duration is configured in seconds and converted once to frame counts
//! (see [`Timings`]) using `assumed_fps`. Persisted as JSON: LocalStorage on
//! the web, a file named by `SURVIVING_MBTA_SETTINGS` on native.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How the tunnel treats a player standing on the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TrackTunnelPolicy {
    /// Survives only with a survival tap inside the tap window
    #[default]
    RequireTap,
    /// Any track cell is safe from the tunnel
    AlwaysSafe,
}

/// Where a player comes back after losing a life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RespawnPolicy {
    /// A fresh random wagon cell
    #[default]
    RandomWagon,
    /// The cell the player died on, if it is a free wagon cell
    DeathPosition,
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Strip & train ===
    /// Number of cells on the strip
    pub display_size: usize,
    /// Host canvas pixels per cell (tree scroll is measured in these)
    pub pixel_size: f32,
    pub wagon_length: usize,
    pub gap_length: usize,
    pub num_wagons: usize,

    // === Players ===
    /// 1 or 2
    pub players: u8,
    pub starting_lives: u8,

    // === Timing ===
    /// Tick rate the host is expected to call `tick` at
    pub assumed_fps: u32,
    /// How long a jump on top of a wagon lasts
    pub jump_seconds: f32,
    /// A survival tap this recent protects a track player from hazards
    pub track_tap_window_seconds: f32,
    /// Going this long on the track without a tap is fatal
    pub track_death_after_seconds: f32,
    pub respawn_after_seconds: f32,
    /// Grace period after respawn during which hazards are ignored
    pub invulnerable_seconds: f32,

    // === Tunnel ===
    pub time_until_tunnel_seconds: f32,
    pub tunnel_warning_seconds: f32,
    /// Width in cells
    pub tunnel_width: i32,
    /// Cells per second, moving right to left
    pub tunnel_speed: f32,
    /// Delay before the next tunnel once one has passed (None = one tunnel per game)
    pub tunnel_rearm_seconds: Option<f32>,

    // === Trees ===
    pub trees_enabled: bool,
    /// Canvas pixels per frame
    pub scroll_speed: f32,

    // === Rules ===
    pub track_tunnel_policy: TrackTunnelPolicy,
    pub respawn_policy: RespawnPolicy,
    /// Airborne players pass under the tunnel unharmed
    pub airborne_tunnel_immunity: bool,

    // === Presentation timing ===
    /// Blink period (frames) of a player on the track who tapped recently
    pub blink_period_normal: u32,
    /// Fastest blink period, reached right before neglect death
    pub blink_period_panic_min: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_size: DISPLAY_SIZE,
            pixel_size: PIXEL_SIZE,
            wagon_length: WAGON_LENGTH,
            gap_length: GAP_LENGTH,
            num_wagons: NUM_WAGONS,

            players: MAX_PLAYERS as u8,
            starting_lives: STARTING_LIVES,

            assumed_fps: ASSUMED_FPS,
            jump_seconds: 1.0,
            track_tap_window_seconds: 0.5,
            track_death_after_seconds: 5.0,
            respawn_after_seconds: 5.0,
            invulnerable_seconds: 2.0,

            time_until_tunnel_seconds: 10.0,
            tunnel_warning_seconds: 2.0,
            tunnel_width: TUNNEL_WIDTH,
            tunnel_speed: 8.0,
            tunnel_rearm_seconds: Some(10.0),

            trees_enabled: true,
            scroll_speed: SCROLL_SPEED,

            track_tunnel_policy: TrackTunnelPolicy::RequireTap,
            respawn_policy: RespawnPolicy::RandomWagon,
            airborne_tunnel_immunity: false,

            blink_period_normal: 20,
            blink_period_panic_min: 4,
        }
    }
}

/// Why a settings document was rejected
#[derive(Debug)]
pub enum SettingsError {
    /// Not valid JSON for [`Settings`]
    Parse(serde_json::Error),
    /// Parsed, but a value is out of range
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "failed to parse settings: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid setting `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl Settings {
    /// Parse and validate a JSON settings document (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(1..=MAX_DISPLAY_SIZE).contains(&self.display_size) {
            return invalid("display_size", "must be between 1 and 4096");
        }
        if !(1..=MAX_FPS).contains(&self.assumed_fps) {
            return invalid("assumed_fps", "must be between 1 and 1000");
        }
        if !(1..=MAX_PLAYERS as u8).contains(&self.players) {
            return invalid("players", "must be 1 or 2");
        }

        // Train pieces may overhang the strip (it is clipped), but only by so much
        let size = self.display_size;
        if !(1..=size).contains(&self.num_wagons) {
            return invalid("num_wagons", "must be between 1 and display_size");
        }
        if !(1..=size).contains(&self.wagon_length) {
            return invalid("wagon_length", "must be between 1 and display_size");
        }
        if self.gap_length > size {
            return invalid("gap_length", "must not exceed display_size");
        }

        if self.tunnel_width <= 0 || self.tunnel_width as usize > size {
            return invalid("tunnel_width", "must be between 1 and display_size");
        }
        if !self.tunnel_speed.is_finite() || self.tunnel_speed <= 0.0 {
            return invalid("tunnel_speed", "must be positive");
        }
        if !self.pixel_size.is_finite() || self.pixel_size <= 0.0 {
            return invalid("pixel_size", "must be positive");
        }
        if !(self.screen_width() * 2.0).is_finite() {
            return invalid("pixel_size", "too large for display_size");
        }
        if !self.scroll_speed.is_finite() {
            return invalid("scroll_speed", "must be a finite number");
        }

        let durations = [
            ("jump_seconds", Some(self.jump_seconds)),
            ("track_tap_window_seconds", Some(self.track_tap_window_seconds)),
            ("track_death_after_seconds", Some(self.track_death_after_seconds)),
            ("respawn_after_seconds", Some(self.respawn_after_seconds)),
            ("invulnerable_seconds", Some(self.invulnerable_seconds)),
            ("time_until_tunnel_seconds", Some(self.time_until_tunnel_seconds)),
            ("tunnel_warning_seconds", Some(self.tunnel_warning_seconds)),
            ("tunnel_rearm_seconds", self.tunnel_rearm_seconds),
        ];
        for (field, seconds) in durations {
            if let Some(s) = seconds {
                if !s.is_finite() || !(0.0..=MAX_SECONDS).contains(&s) {
                    return invalid(field, "must be between 0 and 3600 seconds");
                }
            }
        }
        Ok(())
    }

    /// Width of the host canvas the trees scroll across
    pub fn screen_width(&self) -> f32 {
        self.display_size as f32 * self.pixel_size
    }

    /// Frame counts derived from this configuration
    pub fn timings(&self) -> Timings {
        Timings::from_settings(self)
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "surviving_mbta_settings";

    /// Environment variable naming a settings file (native only)
    pub const PATH_ENV: &'static str = "SURVIVING_MBTA_SETTINGS";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from the file named by `SURVIVING_MBTA_SETTINGS`, if set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::PATH_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {path}");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring {path}: {e}");
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {path}: {e}");
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Upper bounds keep every derived frame count and cell index far from overflow
const MAX_DISPLAY_SIZE: usize = 4096;
const MAX_FPS: u32 = 1000;
const MAX_SECONDS: f32 = 3600.0;

fn invalid(field: &'static str, reason: &'static str) -> Result<(), SettingsError> {
    Err(SettingsError::Invalid { field, reason })
}

/// Durations converted to frames, once, at configuration load
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timings {
    pub jump_frames: u64,
    pub tap_window_frames: u64,
    pub death_after_frames: u64,
    pub respawn_frames: u64,
    pub invulnerable_frames: u64,
    /// From game start to the first tunnel
    pub tunnel_delay_frames: u64,
    pub tunnel_warn_frames: u64,
    pub tunnel_rearm_frames: Option<u64>,
    /// Cells per frame
    pub tunnel_speed: f32,
}

impl Timings {
    pub fn from_settings(settings: &Settings) -> Self {
        let fps = settings.assumed_fps.max(1);
        Self {
            jump_frames: window_frames(settings.jump_seconds, fps),
            tap_window_frames: window_frames(settings.track_tap_window_seconds, fps),
            death_after_frames: window_frames(settings.track_death_after_seconds, fps),
            respawn_frames: window_frames(settings.respawn_after_seconds, fps),
            invulnerable_frames: seconds_to_frames(settings.invulnerable_seconds, fps),
            tunnel_delay_frames: seconds_to_frames(settings.time_until_tunnel_seconds, fps),
            tunnel_warn_frames: seconds_to_frames(settings.tunnel_warning_seconds, fps),
            tunnel_rearm_frames: settings
                .tunnel_rearm_seconds
                .map(|s| seconds_to_frames(s, fps)),
            tunnel_speed: settings.tunnel_speed / fps as f32,
        }
    }

    /// Seconds represented by a frame count
    pub fn frames_to_seconds(frames: u64, fps: u32) -> f32 {
        frames as f32 / fps.max(1) as f32
    }
}

/// Whole frames in `seconds` (negative clamps to zero)
pub fn seconds_to_frames(seconds: f32, fps: u32) -> u64 {
    (seconds * fps as f32).floor().max(0.0) as u64
}

/// Like [`seconds_to_frames`], but a timer window is never shorter than one frame
fn window_frames(seconds: f32, fps: u32) -> u64 {
    seconds_to_frames(seconds, fps).max(1)
}
