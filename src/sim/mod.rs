//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (every duration is a frame count)
//! - Seeded RNG only
//! - Stable iteration order (player one before player two)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod layout;
pub mod player;
pub mod state;
pub mod tick;
pub mod trees;
pub mod tunnel;

pub use collision::{Contact, Hazard, contact, resolve_trees, resolve_tunnel};
pub use layout::{TrainLayout, compute_layout};
pub use player::{Player, PlayerId, PlayerMode};
pub use state::{DeathCause, GameEvent, GamePhase, GameState};
pub use tick::{Command, TickInput, tick};
pub use trees::{Forest, Tree, TreeBand, TreeLayer, tree_cell};
pub use tunnel::{Tunnel, TunnelPhase};
