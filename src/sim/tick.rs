//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation one frame. Commands queued
//! since the previous frame are applied first, in arrival order, then the
//! layout is rebuilt and, while playing, hazards and timers advance.

use super::autopilot;
use super::collision::{resolve_trees, resolve_tunnel};
use super::player::{DeathTick, PlayerId, PlayerMode};
use super::state::{DeathCause, GameEvent, GamePhase, GameState};
use super::tunnel::TunnelEvent;
use crate::wrap_index;

/// A single player or global command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Leave the start screen
    Start,
    /// Leave the game over screen
    Restart,
    /// Step one cell left (-1) or right (+1)
    Move { player: PlayerId, dir: i8 },
    /// Drop into the track at a wagon edge, or tap to survive on the track
    Duck { player: PlayerId },
    /// Hop onto a wagon from the track, or jump on top of a wagon
    Jump { player: PlayerId },
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Commands in the order they were received
    pub commands: Vec<Command>,
    /// Idle/demo mode - the autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();
    state.frame += 1;

    // Scenery scrolls on every screen
    let scroll_speed = state.settings.scroll_speed;
    let screen_width = state.settings.screen_width();
    state.forest.scroll(scroll_speed, screen_width);

    for &command in &input.commands {
        apply_command(state, command);
    }
    if input.idle_mode {
        for command in autopilot::plan(state) {
            apply_command(state, command);
        }
    }

    // Layout is rebuilt in every phase so the idle screens still show the train
    state.recompute_layout();

    if state.phase != GamePhase::Play {
        return;
    }

    update_tunnel(state);

    for &id in state.active_players() {
        state.player_mut(id).tick_jump_timer();
    }

    for &id in state.active_players() {
        tick_track_survival(state, id);
    }

    for &id in state.active_players() {
        resolve_tunnel(state, id);
    }

    if state.settings.trees_enabled {
        for &id in state.active_players() {
            resolve_trees(state, id);
        }
    }
}

/// Apply one command against the current phase
pub fn apply_command(state: &mut GameState, command: Command) {
    match command {
        Command::Start => state.start_game(),
        Command::Restart => state.restart(),
        Command::Move { player, dir } => try_move_side(state, player, dir),
        Command::Duck { player } => handle_duck(state, player),
        Command::Jump { player } => try_jump(state, player),
    }
}

/// Commands are ignored outside play, for inactive slots, and for dead or airborne players
fn is_locked(state: &GameState, id: PlayerId) -> bool {
    state.phase != GamePhase::Play || !state.is_active(id) || state.player(id).is_locked()
}

/// Step one cell sideways if the mode allows it
pub fn try_move_side(state: &mut GameState, id: PlayerId, dir: i8) {
    if is_locked(state, id) || dir == 0 {
        return;
    }
    let size = state.settings.display_size;
    let layout = &state.layout;
    let player = &state.players[id.index()];
    let pos = player.position;
    let next = wrap_index(pos as i64 + dir.signum() as i64, size);

    let allowed = match player.mode {
        PlayerMode::Wagon => {
            // Wagons are left only by ducking at an edge
            let at_edge = if dir < 0 {
                layout.is_left_edge(pos)
            } else {
                layout.is_right_edge(pos)
            };
            !at_edge && layout.is_wagon(next)
        }
        PlayerMode::Track => !layout.is_wagon(next),
    };

    if allowed {
        state.player_mut(id).position = next;
    }
}

/// Duck: tap to survive on the track, or drop off a wagon edge onto it
pub fn handle_duck(state: &mut GameState, id: PlayerId) {
    if is_locked(state, id) {
        return;
    }
    let frame = state.frame;
    let size = state.settings.display_size;
    let pos = state.player(id).position;

    match state.player(id).mode {
        PlayerMode::Track => state.player_mut(id).tap(frame),
        PlayerMode::Wagon => {
            let drop_to = if state.layout.is_right_edge(pos) {
                wrap_index(pos as i64 + 1, size)
            } else if state.layout.is_left_edge(pos) {
                wrap_index(pos as i64 - 1, size)
            } else {
                return;
            };

            if !state.layout.is_wagon(drop_to) {
                let player = state.player_mut(id);
                player.position = drop_to;
                player.mode = PlayerMode::Track;
                player.tap(frame);
            }
        }
    }
}

/// Jump: climb onto an adjacent wagon from the track, or jump on top of the wagon
pub fn try_jump(state: &mut GameState, id: PlayerId) {
    if is_locked(state, id) {
        return;
    }
    let size = state.settings.display_size;
    let jump_frames = state.timings.jump_frames;
    let pos = state.player(id).position;

    match state.player(id).mode {
        PlayerMode::Track => {
            let left = wrap_index(pos as i64 - 1, size);
            let right = wrap_index(pos as i64 + 1, size);
            let target = if state.layout.is_wagon(left) {
                left
            } else if state.layout.is_wagon(right) {
                right
            } else {
                return;
            };
            let player = state.player_mut(id);
            player.position = target;
            player.mode = PlayerMode::Wagon;
        }
        PlayerMode::Wagon => state.player_mut(id).start_jump(jump_frames),
    }
}

/// Respawn countdown for dead players, neglect death for living ones on the track
fn tick_track_survival(state: &mut GameState, id: PlayerId) {
    if state.phase != GamePhase::Play {
        return;
    }

    match state.player_mut(id).tick_death_timer() {
        DeathTick::Respawn => {
            state.respawn_player(id);
            return;
        }
        DeathTick::Waiting | DeathTick::Out => return,
        DeathTick::Alive => {}
    }

    let frame = state.frame;
    let death_after = state.timings.death_after_frames;
    if state.player(id).track_neglect_expired(frame, death_after) {
        state.kill_player(id, DeathCause::Neglect);
    }
}

/// Move the tunnel and re-arm it after it has passed
fn update_tunnel(state: &mut GameState) {
    let frame = state.frame;
    let size = state.settings.display_size;

    if state.tunnel.warning_started(frame) {
        state.events.push(GameEvent::TunnelWarning);
        log::debug!("Tunnel warning at frame {frame}");
    }

    match state.tunnel.advance(frame, state.timings.tunnel_speed, size) {
        Some(TunnelEvent::Arrived) => {
            state.events.push(GameEvent::TunnelArrived);
            log::debug!("Tunnel entered at frame {frame}");
        }
        Some(TunnelEvent::Passed) => {
            state.events.push(GameEvent::TunnelPassed);
            log::debug!("Tunnel passed at frame {frame}");
            if let Some(rearm) = state.timings.tunnel_rearm_frames {
                state
                    .tunnel
                    .schedule(frame.saturating_add(rearm), state.timings.tunnel_warn_frames, size);
            }
        }
        None => {}
    }
}
