//! Idle/demo mode - the computer plays both slots
//!
//! Used for the attract screen and the headless runner. The plan is derived
//! from the state alone, so replays stay deterministic.

use super::player::{PlayerId, PlayerMode};
use super::state::{GamePhase, GameState};
use super::tick::Command;

/// Commands the autopilot wants to issue this frame
pub fn plan(state: &GameState) -> Vec<Command> {
    match state.phase {
        GamePhase::Start => return vec![Command::Start],
        GamePhase::GameOver => return vec![Command::Restart],
        GamePhase::Play => {}
    }

    let mut commands = Vec::new();
    for &id in state.active_players() {
        plan_player(state, id, &mut commands);
    }
    commands
}

fn plan_player(state: &GameState, id: PlayerId, commands: &mut Vec<Command>) {
    let player = state.player(id);
    if player.is_locked() {
        return;
    }
    let pos = player.position;
    let threatened = tunnel_threatens(state, pos);

    match player.mode {
        PlayerMode::Track => {
            // Keep tapping; climb back once the tunnel has gone by
            commands.push(Command::Duck { player: id });
            if !threatened {
                commands.push(Command::Jump { player: id });
            }
        }
        PlayerMode::Wagon if threatened => {
            let layout = &state.layout;
            if layout.is_left_edge(pos) || layout.is_right_edge(pos) {
                commands.push(Command::Duck { player: id });
            } else {
                let dir = if distance_to_edge(state, pos, -1) <= distance_to_edge(state, pos, 1) {
                    -1
                } else {
                    1
                };
                commands.push(Command::Move { player: id, dir });
            }
        }
        PlayerMode::Wagon => {
            // Trees drift left, so one cell to the right arrives next
            let screen_width = state.settings.screen_width();
            let size = state.settings.display_size;
            let blocked = state.forest.blocked_cells(screen_width, size);
            if blocked.contains(&pos) || blocked.contains(&(pos + 1)) {
                commands.push(Command::Jump { player: id });
            }
        }
    }
}

/// Warning is up, or the tunnel has not yet swept past `cell` and its left neighbour
fn tunnel_threatens(state: &GameState, cell: usize) -> bool {
    state.is_tunnel_warning()
        || state
            .tunnel
            .interval()
            .is_some_and(|(_, end)| end >= cell as i64)
}

/// Steps along the wagon to its edge in direction `dir`
fn distance_to_edge(state: &GameState, pos: usize, dir: i64) -> usize {
    let layout = &state.layout;
    let mut cell = pos as i64;
    let mut steps = 0;
    while cell >= 0 && (cell as usize) < layout.len() {
        let c = cell as usize;
        let at_edge = if dir < 0 {
            layout.is_left_edge(c)
        } else {
            layout.is_right_edge(c)
        };
        if at_edge || !layout.is_wagon(c) {
            break;
        }
        cell += dir;
        steps += 1;
    }
    steps
}
