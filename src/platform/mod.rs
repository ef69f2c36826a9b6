//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Keyboard input (bindings and held-key tracking)
//! - The browser binding (`web`, wasm32 only)
//!
//! Settings storage lives with [`crate::settings::Settings`].

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::sim::{Command, PlayerId, TickInput};

/// What a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(PlayerId, i8),
    Duck(PlayerId),
    Jump(PlayerId),
    Start,
    Restart,
}

/// Map a DOM `KeyboardEvent.key` value to an action.
///
/// Player one uses A/D/S/W, player two J/L/K/I; Space starts and R restarts.
pub fn bind_key(key: &str) -> Option<Action> {
    if key == " " || key.eq_ignore_ascii_case("space") {
        return Some(Action::Start);
    }
    let mut chars = key.chars();
    let c = chars.next()?.to_ascii_lowercase();
    if chars.next().is_some() {
        return None;
    }

    let action = match c {
        'a' => Action::Move(PlayerId::One, -1),
        'd' => Action::Move(PlayerId::One, 1),
        's' => Action::Duck(PlayerId::One),
        'w' => Action::Jump(PlayerId::One),
        'j' => Action::Move(PlayerId::Two, -1),
        'l' => Action::Move(PlayerId::Two, 1),
        'k' => Action::Duck(PlayerId::Two),
        'i' => Action::Jump(PlayerId::Two),
        'r' => Action::Restart,
        _ => return None,
    };
    Some(action)
}

impl Action {
    fn command(self) -> Command {
        match self {
            Action::Move(player, dir) => Command::Move { player, dir },
            Action::Duck(player) => Command::Duck { player },
            Action::Jump(player) => Command::Jump { player },
            Action::Start => Command::Start,
            Action::Restart => Command::Restart,
        }
    }
}

/// Turns key events into one [`TickInput`] per frame.
///
/// Everything is edge-triggered except duck, which is re-sent every frame
/// while its key is held.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pending: Vec<Command>,
    duck_held: [bool; 2],
    pub idle_mode: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is bound (so the host can suppress its default)
    pub fn key_down(&mut self, key: &str, repeat: bool) -> bool {
        let Some(action) = bind_key(key) else {
            return false;
        };
        if let Action::Duck(player) = action {
            self.duck_held[player.index()] = true;
        }
        if !repeat {
            self.pending.push(action.command());
        }
        true
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(Action::Duck(player)) = bind_key(key) {
            self.duck_held[player.index()] = false;
        }
    }

    /// Forget held keys (focus lost)
    pub fn release_all(&mut self) {
        self.duck_held = [false; 2];
    }

    pub fn is_duck_held(&self, player: PlayerId) -> bool {
        self.duck_held[player.index()]
    }

    /// Drain queued commands for the next tick
    pub fn take_tick_input(&mut self) -> TickInput {
        let mut commands = std::mem::take(&mut self.pending);
        for &player in PlayerId::ALL {
            let duck = Command::Duck { player };
            if self.duck_held[player.index()] && !commands.contains(&duck) {
                commands.push(duck);
            }
        }
        TickInput {
            commands,
            idle_mode: self.idle_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings() {
        assert_eq!(bind_key("a"), Some(Action::Move(PlayerId::One, -1)));
        assert_eq!(bind_key("D"), Some(Action::Move(PlayerId::One, 1)));
        assert_eq!(bind_key("k"), Some(Action::Duck(PlayerId::Two)));
        assert_eq!(bind_key("I"), Some(Action::Jump(PlayerId::Two)));
        assert_eq!(bind_key(" "), Some(Action::Start));
        assert_eq!(bind_key("r"), Some(Action::Restart));
        assert_eq!(bind_key("ArrowLeft"), None);
        assert_eq!(bind_key("x"), None);
        assert_eq!(bind_key(""), None);
    }

    #[test]
    fn test_edge_triggered_commands_fire_once() {
        let mut input = InputState::new();
        assert!(input.key_down("w", false));
        assert!(input.key_down("w", true));
        let tick = input.take_tick_input();
        assert_eq!(tick.commands, vec![Command::Jump { player: PlayerId::One }]);
        assert!(input.take_tick_input().commands.is_empty());
    }

    #[test]
    fn test_held_duck_repeats_every_tick() {
        let mut input = InputState::new();
        input.key_down("s", false);
        assert_eq!(
            input.take_tick_input().commands,
            vec![Command::Duck { player: PlayerId::One }]
        );
        assert_eq!(
            input.take_tick_input().commands,
            vec![Command::Duck { player: PlayerId::One }]
        );

        input.key_up("S");
        assert!(input.take_tick_input().commands.is_empty());
    }

    #[test]
    fn test_quick_tap_still_counts() {
        let mut input = InputState::new();
        input.key_down("k", false);
        input.key_up("k");
        assert_eq!(
            input.take_tick_input().commands,
            vec![Command::Duck { player: PlayerId::Two }]
        );
    }

    #[test]
    fn test_release_all_and_idle_flag() {
        let mut input = InputState::new();
        input.key_down("s", false);
        input.key_down("k", false);
        input.release_all();
        input.idle_mode = true;
        let tick = input.take_tick_input();
        assert!(tick.idle_mode);
        assert_eq!(tick.commands.len(), 2);
        assert!(input.take_tick_input().commands.is_empty());
    }
}
