//! Tunnel hazard
//!
//! A fixed-width interval that enters off the right end of the strip and
//! sweeps left at constant speed. Position is kept in fractional cells and
//! floored for collision tests.

use serde::{Deserialize, Serialize};

/// Lifecycle of one tunnel sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TunnelPhase {
    /// No tunnel planned (START / GAME_OVER screens)
    #[default]
    Unscheduled,
    /// Waiting for `start_frame`
    Scheduled,
    /// Sweeping across the strip
    Active,
    /// Fully past the left end, not re-armed
    Done,
}

/// Lifecycle changes reported by [`Tunnel::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelEvent {
    Arrived,
    Passed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tunnel {
    pub phase: TunnelPhase,
    /// Left edge, in fractional cells
    pub x: f32,
    /// Width in cells
    pub width: i32,
    pub start_frame: u64,
    pub warn_frame: u64,
    /// Completed sweeps this game
    pub passes: u32,
    /// Warning already raised for the current schedule
    #[serde(default)]
    pub warned: bool,
}

impl Tunnel {
    pub fn new(width: i32, display_size: usize) -> Self {
        Self {
            phase: TunnelPhase::Unscheduled,
            x: display_size as f32,
            width,
            start_frame: u64::MAX,
            warn_frame: u64::MAX,
            passes: 0,
            warned: false,
        }
    }

    /// Forget any schedule and park the tunnel off the right end
    pub fn reset(&mut self, display_size: usize) {
        self.phase = TunnelPhase::Unscheduled;
        self.x = display_size as f32;
        self.start_frame = u64::MAX;
        self.warn_frame = u64::MAX;
        self.passes = 0;
        self.warned = false;
    }

    /// Plan the next sweep to enter at `start_frame`
    pub fn schedule(&mut self, start_frame: u64, warn_frames: u64, display_size: usize) {
        self.phase = TunnelPhase::Scheduled;
        self.start_frame = start_frame;
        self.warn_frame = start_frame.saturating_sub(warn_frames);
        self.x = display_size as f32;
        self.warned = false;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == TunnelPhase::Active
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.phase == TunnelPhase::Done
    }

    /// True during `[start_frame - warn_frames, start_frame)`
    pub fn is_warning(&self, frame: u64) -> bool {
        self.phase == TunnelPhase::Scheduled && frame >= self.warn_frame && frame < self.start_frame
    }

    /// True once per schedule, on the first frame of its warning window
    pub fn warning_started(&mut self, frame: u64) -> bool {
        if self.warned || !self.is_warning(frame) {
            return false;
        }
        self.warned = true;
        true
    }

    /// Left edge used for collision
    #[inline]
    pub fn cell_x(&self) -> i64 {
        self.x.floor() as i64
    }

    /// One past the right edge
    #[inline]
    pub fn end_x(&self) -> i64 {
        self.cell_x().saturating_add(self.width as i64)
    }

    /// Covered cells `[start, end)`, while active
    pub fn interval(&self) -> Option<(i64, i64)> {
        self.is_active().then(|| (self.cell_x(), self.end_x()))
    }

    pub fn covers(&self, cell: usize) -> bool {
        match self.interval() {
            Some((start, end)) => {
                let cell = cell as i64;
                cell >= start && cell < end
            }
            None => false,
        }
    }

    /// Frames until a scheduled tunnel arrives
    pub fn frames_until_arrival(&self, frame: u64) -> Option<u64> {
        (self.phase == TunnelPhase::Scheduled).then(|| self.start_frame.saturating_sub(frame))
    }

    /// Move the tunnel one frame. `speed` is in cells per frame.
    pub fn advance(&mut self, frame: u64, speed: f32, display_size: usize) -> Option<TunnelEvent> {
        let mut event = None;
        match self.phase {
            TunnelPhase::Unscheduled | TunnelPhase::Done => return None,
            TunnelPhase::Scheduled => {
                if frame < self.start_frame {
                    return None;
                }
                self.phase = TunnelPhase::Active;
                self.x = display_size as f32;
                event = Some(TunnelEvent::Arrived);
            }
            TunnelPhase::Active => {}
        }

        self.x -= speed;

        if self.end_x() < 0 {
            self.phase = TunnelPhase::Done;
            self.passes += 1;
            event = Some(TunnelEvent::Passed);
        }
        event
    }
}
