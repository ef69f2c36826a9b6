//! Game state and core simulation types
//!
//! `GameState` is the whole simulation context: settings, frame counter,
//! layout, both player slots, hazards and the seeded RNG. Every operation
//! takes it explicitly.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::layout::{TrainLayout, compute_layout};
use super::player::{Player, PlayerId};
use super::trees::Forest;
use super::tunnel::Tunnel;
use crate::settings::{RespawnPolicy, Settings, Timings};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start
    #[default]
    Start,
    /// Active gameplay
    Play,
    /// A player ran out of lives; waiting for restart
    GameOver,
}

/// What took a life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Stayed on the track too long without a survival tap
    Neglect,
    Tunnel,
    Tree,
}

/// Things that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    PlayerKilled {
        player: PlayerId,
        cause: DeathCause,
        lives_left: u8,
    },
    PlayerRespawned {
        player: PlayerId,
        cell: usize,
    },
    TunnelWarning,
    TunnelArrived,
    TunnelPassed,
    GameOver,
    Restarted,
}

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub timings: Timings,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Frames since the simulation was created (ticks in every phase)
    pub frame: u64,
    pub phase: GamePhase,
    pub layout: TrainLayout,
    /// Both slots always exist; only the first `settings.players` take part
    pub players: [Player; 2],
    pub tunnel: Tunnel,
    pub forest: Forest,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game on the start screen
    pub fn new(settings: Settings, seed: u64) -> Self {
        let timings = settings.timings();
        let mut rng = Pcg32::seed_from_u64(seed);
        let forest = if settings.trees_enabled {
            Forest::plant(&mut rng, settings.screen_width())
        } else {
            Forest::empty()
        };
        let layout = compute_layout(
            settings.display_size,
            settings.wagon_length,
            settings.gap_length,
            settings.num_wagons,
        );
        let tunnel = Tunnel::new(settings.tunnel_width, settings.display_size);

        Self {
            settings,
            timings,
            seed,
            rng,
            frame: 0,
            phase: GamePhase::Start,
            layout,
            players: [Player::new(PlayerId::One), Player::new(PlayerId::Two)],
            tunnel,
            forest,
            events: Vec::new(),
        }
    }

    /// Player slots taking part in this game
    pub fn active_players(&self) -> &'static [PlayerId] {
        let count = (self.settings.players as usize).clamp(1, PlayerId::ALL.len());
        let all: &'static [PlayerId] = PlayerId::ALL;
        &all[..count]
    }

    #[inline]
    pub fn is_active(&self, id: PlayerId) -> bool {
        self.active_players().contains(&id)
    }

    #[inline]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    #[inline]
    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    /// Cell held by the other player, if they are in the game and alive
    pub fn other_player_cell(&self, id: PlayerId) -> Option<usize> {
        let other = id.other();
        if !self.is_active(other) {
            return None;
        }
        let p = self.player(other);
        (!p.is_dead).then_some(p.position)
    }

    pub fn recompute_layout(&mut self) {
        self.layout = compute_layout(
            self.settings.display_size,
            self.settings.wagon_length,
            self.settings.gap_length,
            self.settings.num_wagons,
        );
    }

    /// Random wagon cell other than `avoid`; cell 0 if there is none
    pub fn random_wagon_cell(&mut self, avoid: Option<usize>) -> usize {
        let candidates: Vec<usize> = self
            .layout
            .wagon_cells()
            .into_iter()
            .filter(|&c| Some(c) != avoid)
            .collect();
        if candidates.is_empty() {
            return 0;
        }
        candidates[self.rng.random_range(0..candidates.len())]
    }

    /// Spawn a player on a random wagon cell
    pub fn spawn_player(&mut self, id: PlayerId, avoid: Option<usize>) {
        let cell = self.random_wagon_cell(avoid);
        let frame = self.frame;
        self.player_mut(id).spawn(cell, frame);
    }

    /// Start a new game from the start screen
    pub fn start_game(&mut self) {
        if self.phase != GamePhase::Start {
            return;
        }
        self.phase = GamePhase::Play;

        let lives = self.settings.starting_lives;
        for &id in self.active_players() {
            let p = self.player_mut(id);
            p.lives = lives;
            p.invulnerable_until_frame = 0;
        }

        self.recompute_layout();

        self.spawn_player(PlayerId::One, None);
        if self.is_active(PlayerId::Two) {
            let first = self.player(PlayerId::One).position;
            self.spawn_player(PlayerId::Two, Some(first));
        }

        self.tunnel.reset(self.settings.display_size);
        self.tunnel.schedule(
            self.frame.saturating_add(self.timings.tunnel_delay_frames),
            self.timings.tunnel_warn_frames,
            self.settings.display_size,
        );

        self.events.push(GameEvent::GameStarted);
        log::info!(
            "Game started at frame {} ({} player(s), tunnel at frame {})",
            self.frame,
            self.active_players().len(),
            self.tunnel.start_frame
        );
    }

    /// Back to the start screen after game over
    pub fn restart(&mut self) {
        if self.phase != GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::Start;
        self.tunnel.reset(self.settings.display_size);
        self.events.push(GameEvent::Restarted);
        log::info!("Back to start screen");
    }

    /// Take a life from a player. Ends the game when they have none left.
    ///
    /// Returns false if the player was already dead.
    pub fn kill_player(&mut self, id: PlayerId, cause: DeathCause) -> bool {
        let respawn_frames = self.timings.respawn_frames;
        let player = self.player_mut(id);
        if !player.kill(respawn_frames) {
            return false;
        }
        let lives_left = player.lives;
        let cell = player.position;

        self.events.push(GameEvent::PlayerKilled {
            player: id,
            cause,
            lives_left,
        });
        log::debug!(
            "{} killed by {:?} at cell {} ({} lives left)",
            id.name(),
            cause,
            cell,
            lives_left
        );

        if lives_left == 0 && self.phase == GamePhase::Play {
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver);
            log::info!("Game over at frame {}: {} is out of lives", self.frame, id.name());
        }
        true
    }

    /// Bring a dead player back on a wagon with a grace period
    pub fn respawn_player(&mut self, id: PlayerId) {
        let avoid = self.other_player_cell(id);
        let death_cell = self.player(id).death_position;

        let policy = self.settings.respawn_policy;
        let cell = match policy {
            RespawnPolicy::DeathPosition
                if self.layout.is_wagon(death_cell) && Some(death_cell) != avoid =>
            {
                death_cell
            }
            _ => self.random_wagon_cell(avoid),
        };

        let frame = self.frame;
        let until = frame.saturating_add(self.timings.invulnerable_frames);
        let player = self.player_mut(id);
        player.spawn(cell, frame);
        player.invulnerable_until_frame = until;

        self.events.push(GameEvent::PlayerRespawned { player: id, cell });
        log::info!("{} respawned at cell {}", id.name(), cell);
    }

    /// Tunnel warning (only meaningful while playing)
    pub fn is_tunnel_warning(&self) -> bool {
        self.phase == GamePhase::Play && self.tunnel.is_warning(self.frame)
    }
}
