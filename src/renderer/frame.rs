//! Per-cell frame buffer
//!
//! One RGBA pixel per strip cell. Alpha 0 means "draw nothing here" so the
//! host renderer can let its scenery show through.

use bytemuck::{Pod, Zeroable};

use crate::sim::{GamePhase, GameState, Player, PlayerId, PlayerMode};

/// Single strip pixel
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

/// Colors for game elements
pub mod colors {
    use super::Rgba;

    pub const WAGON: Rgba = Rgba::opaque(180, 180, 180);
    pub const TUNNEL: Rgba = Rgba::opaque(20, 20, 20);
    pub const PLAYER_ONE: Rgba = Rgba::opaque(255, 0, 0);
    pub const PLAYER_TWO: Rgba = Rgba::opaque(0, 0, 255);
}

pub fn player_color(id: PlayerId) -> Rgba {
    match id {
        PlayerId::One => colors::PLAYER_ONE,
        PlayerId::Two => colors::PLAYER_TWO,
    }
}

/// Whether a player's pixel is lit this frame.
///
/// Dead and airborne players are hidden. Invulnerable players blink fast,
/// and a neglected track player blinks faster as death approaches.
pub fn player_visible(state: &GameState, player: &Player) -> bool {
    if player.is_dead || player.is_airborne {
        return false;
    }
    let frame = state.frame;

    if player.is_invulnerable(frame) && frame % 10 >= 5 {
        return false;
    }

    if player.mode == PlayerMode::Track {
        let period = blink_period(state, player);
        return (frame % period) * 2 < period;
    }
    true
}

/// Blink period for a track player, shrinking from normal to panic minimum
pub fn blink_period(state: &GameState, player: &Player) -> u64 {
    let normal = state.settings.blink_period_normal.max(1) as f32;
    let panic_min = state.settings.blink_period_panic_min.max(1) as f32;
    let progress = player.track_panic(
        state.frame,
        state.timings.tap_window_frames,
        state.timings.death_after_frames,
    );
    let period = (normal - progress * (normal - panic_min)).floor();
    period.max(panic_min) as u64
}

/// Pixel buffer handed to the host each frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Vec<Rgba>,
}

impl FrameBuffer {
    pub fn new(size: usize) -> Self {
        Self {
            pixels: vec![Rgba::TRANSPARENT; size],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Rgba::TRANSPARENT);
    }

    /// Out-of-range writes are dropped
    pub fn set(&mut self, cell: usize, color: Rgba) {
        if let Some(p) = self.pixels.get_mut(cell) {
            *p = color;
        }
    }

    pub fn get(&self, cell: usize) -> Rgba {
        self.pixels.get(cell).copied().unwrap_or_default()
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Raw RGBA bytes, 4 per cell
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Draw the current state: wagons always, tunnel and players while playing
    pub fn compose(&mut self, state: &GameState) {
        let size = state.settings.display_size;
        if self.pixels.len() != size {
            self.pixels.resize(size, Rgba::TRANSPARENT);
        }
        self.clear();

        for cell in state.layout.wagon_cells() {
            self.set(cell, colors::WAGON);
        }

        if state.phase != GamePhase::Play {
            return;
        }

        if let Some((start, end)) = state.tunnel.interval() {
            for cell in start.max(0)..end.min(size as i64) {
                self.set(cell as usize, colors::TUNNEL);
            }
        }

        for &id in state.active_players() {
            let player = state.player(id);
            if player_visible(state, player) {
                self.set(player.position, player_color(id));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn playing() -> GameState {
        let settings = Settings {
            trees_enabled: false,
            ..Default::default()
        };
        let mut state = GameState::new(settings, 3);
        state.start_game();
        state
    }

    #[test]
    fn test_idle_screen_shows_only_wagons() {
        let state = GameState::new(Settings::default(), 1);
        let mut fb = FrameBuffer::new(30);
        fb.compose(&state);
        assert!(fb.get(0).is_transparent());
        assert_eq!(fb.get(3), colors::WAGON);
        assert!(fb.get(10).is_transparent());
        assert_eq!(fb.as_bytes().len(), 120);
        assert_eq!(&fb.as_bytes()[12..16], &[180, 180, 180, 255]);
    }

    #[test]
    fn test_players_drawn_over_wagons() {
        let mut state = playing();
        state.frame = 1;
        state.player_mut(PlayerId::One).position = 4;
        state.player_mut(PlayerId::Two).position = 22;
        let mut fb = FrameBuffer::new(30);
        fb.compose(&state);
        assert_eq!(fb.get(4), colors::PLAYER_ONE);
        assert_eq!(fb.get(22), colors::PLAYER_TWO);
    }

    #[test]
    fn test_airborne_and_dead_players_hidden() {
        let mut state = playing();
        state.player_mut(PlayerId::One).start_jump(10);
        assert!(!player_visible(&state, state.player(PlayerId::One)));
        state.kill_player(PlayerId::Two, crate::sim::DeathCause::Tree);
        assert!(!player_visible(&state, state.player(PlayerId::Two)));
    }

    #[test]
    fn test_invulnerable_blink() {
        let mut state = playing();
        state.player_mut(PlayerId::One).invulnerable_until_frame = 100;
        state.frame = 42;
        assert!(player_visible(&state, state.player(PlayerId::One)));
        state.frame = 47;
        assert!(!player_visible(&state, state.player(PlayerId::One)));
    }

    #[test]
    fn test_track_blink_speeds_up() {
        let mut state = playing();
        let one = state.player_mut(PlayerId::One);
        one.mode = PlayerMode::Track;
        one.position = 10;
        one.tap(0);

        state.frame = 10;
        assert_eq!(blink_period(&state, state.player(PlayerId::One)), 20);
        state.frame = 299;
        assert_eq!(blink_period(&state, state.player(PlayerId::One)), 4);
        // Halfway between the tap window and death
        state.frame = 165;
        assert_eq!(blink_period(&state, state.player(PlayerId::One)), 12);
    }

    #[test]
    fn test_tunnel_painted_while_active() {
        let mut state = playing();
        state.tunnel.schedule(state.frame, 0, 30);
        state.tunnel.advance(state.frame, 0.0, 30);
        state.tunnel.x = 27.0;
        state.player_mut(PlayerId::One).position = 4;
        state.player_mut(PlayerId::Two).position = 22;
        let mut fb = FrameBuffer::new(30);
        fb.compose(&state);
        assert_eq!(fb.get(27), colors::TUNNEL);
        assert_eq!(fb.get(29), colors::TUNNEL);
        assert_eq!(fb.get(26), colors::WAGON);
    }
}
