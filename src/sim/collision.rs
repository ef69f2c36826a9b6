//! Hazard resolution against players
//!
//! The tunnel and the corridor trees share one rule: touching a hazard on a
//! wagon is fatal, and on the track it is survived only with a recent
//! survival tap. The tunnel's track rule and its treatment of airborne
//! players are configurable.

use super::player::{Player, PlayerId, PlayerMode};
use super::state::{DeathCause, GamePhase, GameState};
use crate::settings::{Settings, Timings, TrackTunnelPolicy};

/// Which hazard is touching the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hazard {
    Tunnel,
    Tree,
}

impl Hazard {
    fn cause(self) -> DeathCause {
        match self {
            Hazard::Tunnel => DeathCause::Tunnel,
            Hazard::Tree => DeathCause::Tree,
        }
    }
}

/// Result of a player touching a hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Hazard doesn't reach the player (or they can't be hit right now)
    Clear,
    /// Hazard reached the player but they are protected
    Survived,
    Fatal,
}

/// Decide what a hazard covering the player's cell does to them
pub fn contact(
    player: &Player,
    hazard: Hazard,
    frame: u64,
    settings: &Settings,
    timings: &Timings,
) -> Contact {
    if player.is_dead || player.is_invulnerable(frame) {
        return Contact::Clear;
    }

    if player.is_airborne {
        let immune = match hazard {
            // Jumping clears a tree
            Hazard::Tree => true,
            Hazard::Tunnel => settings.airborne_tunnel_immunity,
        };
        if immune {
            return Contact::Survived;
        }
    }

    match player.mode {
        PlayerMode::Wagon => Contact::Fatal,
        PlayerMode::Track => {
            if hazard == Hazard::Tunnel && settings.track_tunnel_policy == TrackTunnelPolicy::AlwaysSafe {
                return Contact::Survived;
            }
            if player.tapped_within(frame, timings.tap_window_frames) {
                Contact::Survived
            } else {
                Contact::Fatal
            }
        }
    }
}

/// Kill the player if the active tunnel covers their cell unprotected
pub fn resolve_tunnel(state: &mut GameState, id: PlayerId) -> Contact {
    if state.phase != GamePhase::Play || !state.tunnel.is_active() {
        return Contact::Clear;
    }
    let player = state.player(id);
    if !state.tunnel.covers(player.position) {
        return Contact::Clear;
    }
    apply(state, id, Hazard::Tunnel)
}

/// Kill the player if a corridor tree stands on their cell unprotected
pub fn resolve_trees(state: &mut GameState, id: PlayerId) -> Contact {
    if state.phase != GamePhase::Play {
        return Contact::Clear;
    }
    let player = state.player(id);
    let screen_width = state.settings.screen_width();
    if !state
        .forest
        .covers(player.position, screen_width, state.settings.display_size)
    {
        return Contact::Clear;
    }
    apply(state, id, Hazard::Tree)
}

fn apply(state: &mut GameState, id: PlayerId, hazard: Hazard) -> Contact {
    let outcome = contact(
        state.player(id),
        hazard,
        state.frame,
        &state.settings,
        &state.timings,
    );
    if outcome == Contact::Fatal {
        state.kill_player(id, hazard.cause());
    }
    outcome
}
