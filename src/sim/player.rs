//! Player record and its per-tick timers

use serde::{Deserialize, Serialize};

/// Where on the train a player is standing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerMode {
    /// On top of a wagon
    #[default]
    Wagon,
    /// Down in a gap between wagons (needs survival taps)
    Track,
}

/// Player slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const ALL: &'static [PlayerId] = &[PlayerId::One, PlayerId::Two];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    /// The other slot
    #[inline]
    pub fn other(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlayerId::One => "Player 1",
            PlayerId::Two => "Player 2",
        }
    }
}

/// One player's mutable state, reused across rounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub position: usize,
    pub mode: PlayerMode,
    pub lives: u8,
    pub is_airborne: bool,
    pub airborne_frames_left: u64,
    pub is_dead: bool,
    pub dead_frames_left: u64,
    /// Frame of the last duck/survival tap
    pub last_survival_input_frame: u64,
    /// Hazards are ignored before this frame
    pub invulnerable_until_frame: u64,
    /// Cell the player last died on
    pub death_position: usize,
}

/// What a call to [`Player::tick_death_timer`] decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathTick {
    /// Not dead
    Alive,
    /// Still waiting to respawn
    Waiting,
    /// Timer ran out and a life remains
    Respawn,
    /// Timer ran out with no lives left
    Out,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            position: 0,
            mode: PlayerMode::Wagon,
            lives: 0,
            is_airborne: false,
            airborne_frames_left: 0,
            is_dead: false,
            dead_frames_left: 0,
            last_survival_input_frame: 0,
            invulnerable_until_frame: 0,
            death_position: 0,
        }
    }

    /// Put the player on a wagon cell with all timers cleared
    pub fn spawn(&mut self, cell: usize, frame: u64) {
        self.position = cell;
        self.mode = PlayerMode::Wagon;
        self.is_airborne = false;
        self.airborne_frames_left = 0;
        self.is_dead = false;
        self.dead_frames_left = 0;
        self.last_survival_input_frame = frame;
    }

    #[inline]
    pub fn is_invulnerable(&self, frame: u64) -> bool {
        frame < self.invulnerable_until_frame
    }

    /// Dead or airborne players ignore movement commands
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.is_dead || self.is_airborne
    }

    #[inline]
    pub fn frames_since_survival_input(&self, frame: u64) -> u64 {
        frame.saturating_sub(self.last_survival_input_frame)
    }

    /// Record a survival tap
    #[inline]
    pub fn tap(&mut self, frame: u64) {
        self.last_survival_input_frame = frame;
    }

    /// Start a jump on top of the wagon
    pub fn start_jump(&mut self, jump_frames: u64) {
        self.is_airborne = true;
        self.airborne_frames_left = jump_frames;
    }

    /// Count down an active jump
    pub fn tick_jump_timer(&mut self) {
        if self.is_airborne {
            self.airborne_frames_left = self.airborne_frames_left.saturating_sub(1);
            if self.airborne_frames_left == 0 {
                self.is_airborne = false;
            }
        }
    }

    /// Neglect check for a living player on the track
    pub fn track_neglect_expired(&self, frame: u64, death_after_frames: u64) -> bool {
        !self.is_dead
            && self.mode == PlayerMode::Track
            && self.frames_since_survival_input(frame) >= death_after_frames
    }

    /// A track player survives a hazard only with a tap inside the window
    pub fn tapped_within(&self, frame: u64, window: u64) -> bool {
        self.frames_since_survival_input(frame) <= window
    }

    /// Consume a life. Returns false if the player was already dead.
    pub fn kill(&mut self, respawn_frames: u64) -> bool {
        if self.is_dead {
            return false;
        }

        self.lives = self.lives.saturating_sub(1);
        self.is_dead = true;
        self.dead_frames_left = respawn_frames;
        self.death_position = self.position;

        self.is_airborne = false;
        self.airborne_frames_left = 0;
        true
    }

    /// Count down the respawn delay
    pub fn tick_death_timer(&mut self) -> DeathTick {
        if !self.is_dead {
            return DeathTick::Alive;
        }
        self.dead_frames_left = self.dead_frames_left.saturating_sub(1);
        if self.dead_frames_left > 0 {
            DeathTick::Waiting
        } else if self.lives > 0 {
            DeathTick::Respawn
        } else {
            DeathTick::Out
        }
    }

    /// How close a neglected track player is to dying (0 = tapped recently, 1 = about to die)
    pub fn track_panic(&self, frame: u64, tap_window: u64, death_after: u64) -> f32 {
        if self.mode != PlayerMode::Track || self.is_dead {
            return 0.0;
        }
        let since = self.frames_since_survival_input(frame);
        if since <= tap_window {
            return 0.0;
        }
        let span = death_after.saturating_sub(tap_window).max(1);
        ((since - tap_window) as f32 / span as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn living(lives: u8) -> Player {
        let mut p = Player::new(PlayerId::One);
        p.lives = lives;
        p.spawn(5, 0);
        p
    }

    #[test]
    fn test_kill_consumes_one_life() {
        let mut p = living(3);
        assert!(p.kill(300));
        assert_eq!(p.lives, 2);
        assert!(p.is_dead);
        assert_eq!(p.dead_frames_left, 300);
        assert_eq!(p.death_position, 5);
    }

    #[test]
    fn test_kill_is_idempotent() {
        let mut p = living(1);
        assert!(p.kill(10));
        assert_eq!(p.lives, 0);
        assert!(!p.kill(10));
        assert_eq!(p.lives, 0);
        assert_eq!(p.dead_frames_left, 10);
    }

    #[test]
    fn test_kill_clears_airborne() {
        let mut p = living(2);
        p.start_jump(60);
        p.kill(10);
        assert!(!p.is_airborne);
        assert_eq!(p.airborne_frames_left, 0);
    }

    #[test]
    fn test_jump_timer_runs_out() {
        let mut p = living(3);
        p.start_jump(3);
        p.tick_jump_timer();
        p.tick_jump_timer();
        assert!(p.is_airborne);
        p.tick_jump_timer();
        assert!(!p.is_airborne);
        assert_eq!(p.airborne_frames_left, 0);
    }

    #[test]
    fn test_death_timer() {
        let mut p = living(2);
        assert_eq!(p.tick_death_timer(), DeathTick::Alive);
        p.kill(2);
        assert_eq!(p.tick_death_timer(), DeathTick::Waiting);
        assert_eq!(p.tick_death_timer(), DeathTick::Respawn);

        let mut last = living(1);
        last.kill(1);
        assert_eq!(last.tick_death_timer(), DeathTick::Out);
    }

    #[test]
    fn test_track_neglect() {
        let mut p = living(3);
        p.mode = PlayerMode::Track;
        p.tap(100);
        assert!(!p.track_neglect_expired(399, 300));
        assert!(p.track_neglect_expired(400, 300));

        // Wagon players never die of neglect
        p.mode = PlayerMode::Wagon;
        assert!(!p.track_neglect_expired(1000, 300));
    }

    #[test]
    fn test_track_panic_ramps() {
        let mut p = living(3);
        p.mode = PlayerMode::Track;
        p.tap(0);
        assert_eq!(p.track_panic(30, 30, 300), 0.0);
        assert!((p.track_panic(165, 30, 300) - 0.5).abs() < 1e-6);
        assert_eq!(p.track_panic(500, 30, 300), 1.0);
    }

    #[test]
    fn test_player_ids() {
        assert_eq!(PlayerId::One.other(), PlayerId::Two);
        assert_eq!(PlayerId::Two.index(), 1);
        assert_eq!(PlayerId::ALL.len(), 2);
    }
}
