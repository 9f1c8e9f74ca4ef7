//! Playback cursor over a loaded trace.

use crate::frame_index::CollisionIndex;

/// Current-frame cursor, clamped to the trace bounds at all times.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playback {
    current: usize,
    len: usize,
}

impl Playback {
    /// Cursor over a trace of `len` frames, placed per the initial-placement
    /// policy: the first collision frame if the trace has one, else 0.
    pub fn new(len: usize, index: &CollisionIndex) -> Self {
        let current = index.first().unwrap_or(0).min(len.saturating_sub(1));
        Self { current, len }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Moves the cursor by `delta` frames. Stepping past either end stays
    /// at the bound.
    pub fn step(&mut self, delta: i64) {
        if self.len == 0 {
            return;
        }
        let last = (self.len - 1) as i64;
        self.current = (self.current as i64 + delta).clamp(0, last) as usize;
    }

    /// Jumps the cursor to `frame`, clamped to the trace bounds.
    pub fn set_frame(&mut self, frame: usize) {
        if self.len == 0 {
            return;
        }
        self.current = frame.min(self.len - 1);
    }

    /// Jumps to the next collision frame; no-op when the index has none.
    pub fn jump_to_next_collision(&mut self, index: &CollisionIndex) {
        if let Some(pos) = index.next_after(self.current) {
            self.set_frame(pos);
        }
    }

    /// Jumps to the previous collision frame; no-op when the index has none.
    pub fn jump_to_prev_collision(&mut self, index: &CollisionIndex) {
        if let Some(pos) = index.prev_before(self.current) {
            self.set_frame(pos);
        }
    }
}
