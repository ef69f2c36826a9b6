//! Rendering module
//!
//! The simulation is drawn as one pixel per cell. The host (canvas, LED strip,
//! terminal) owns the actual drawing; this module only produces the pixels and
//! a serializable snapshot for HUD text.

pub mod frame;
pub mod snapshot;

pub use frame::{FrameBuffer, Rgba, blink_period, colors, player_visible};
pub use snapshot::{FrameView, PlayerView, TunnelView};
