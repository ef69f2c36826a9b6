//! Read-only view of the game for the host renderer and HUD

use serde::Serialize;

use super::frame::player_visible;
use crate::settings::Timings;
use crate::sim::{GamePhase, GameState, PlayerId, PlayerMode};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub position: usize,
    pub mode: PlayerMode,
    pub lives: u8,
    pub dead: bool,
    pub airborne: bool,
    pub invulnerable: bool,
    pub visible: bool,
    /// Whole seconds until respawn (0 when alive or out of lives)
    pub respawn_seconds_left: u32,
    /// 0 = safe, 1 = about to die of neglect
    pub track_panic: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TunnelView {
    pub active: bool,
    /// Covered cells `[start, end)` while active
    pub interval: Option<(i64, i64)>,
    pub warning: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub phase: GamePhase,
    pub frame: u64,
    pub players: Vec<PlayerView>,
    pub tunnel: TunnelView,
    /// Cells blocked by corridor trees
    pub tree_cells: Vec<usize>,
    /// Scenery scroll in canvas pixels
    pub scroll_offset: f32,
}

impl FrameView {
    pub fn capture(state: &GameState) -> Self {
        let frame = state.frame;
        let fps = state.settings.assumed_fps;
        let players = state
            .active_players()
            .iter()
            .map(|&id| {
                let p = state.player(id);
                let respawn_seconds_left = if p.is_dead && p.lives > 0 {
                    Timings::frames_to_seconds(p.dead_frames_left, fps).ceil() as u32
                } else {
                    0
                };
                PlayerView {
                    id,
                    position: p.position,
                    mode: p.mode,
                    lives: p.lives,
                    dead: p.is_dead,
                    airborne: p.is_airborne,
                    invulnerable: p.is_invulnerable(frame),
                    visible: state.phase == GamePhase::Play && player_visible(state, p),
                    respawn_seconds_left,
                    track_panic: p.track_panic(
                        frame,
                        state.timings.tap_window_frames,
                        state.timings.death_after_frames,
                    ),
                }
            })
            .collect();

        let tree_cells = if state.settings.trees_enabled {
            state
                .forest
                .blocked_cells(state.settings.screen_width(), state.settings.display_size)
        } else {
            Vec::new()
        };

        Self {
            phase: state.phase,
            frame,
            players,
            tunnel: TunnelView {
                active: state.tunnel.is_active(),
                interval: state.tunnel.interval(),
                warning: state.is_tunnel_warning(),
            },
            tree_cells,
            scroll_offset: state.forest.offset,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
