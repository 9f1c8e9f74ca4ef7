//! Replay session: the single owner of all viewer state.

use tracing::info;

use crate::error::TraceError;
use crate::frame_index::CollisionIndex;
use crate::geometry::Vec2;
use crate::loader;
use crate::playback::Playback;
use crate::render::{self, RenderFrame};
use crate::trace::{Frame, Trace};
use crate::viewport::Viewport;

/// Owns the loaded trace and every piece of derived state, and routes the
/// input events the embedding surface forwards.
///
/// Single-threaded by design: mutation happens only in event handlers and
/// the redraw tick, and a load runs to completion before any frame of the
/// new trace is referenced.
#[derive(Debug)]
pub struct ReplaySession {
    trace: Option<Trace>,
    index: CollisionIndex,
    playback: Playback,
    viewport: Viewport,
}

impl ReplaySession {
    /// Session over a render surface of the given pixel size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            trace: None,
            index: CollisionIndex::default(),
            playback: Playback::default(),
            viewport: Viewport::new(width, height),
        }
    }

    /// Ingests a dropped payload. On success the new trace replaces the old
    /// one, the collision index is rebuilt, and the cursor moves to the
    /// initial placement; on any error the previous state stays untouched.
    pub fn load_payload(&mut self, payload: &str) -> Result<(), TraceError> {
        let trace = loader::load_trace(payload)?;
        let index = CollisionIndex::build(&trace.frames);
        info!(
            frames = trace.frames.len(),
            collision_frames = index.len(),
            "trace loaded"
        );

        self.playback = Playback::new(trace.frames.len(), &index);
        self.index = index;
        self.trace = Some(trace);
        Ok(())
    }

    pub fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    /// Frame under the cursor, `None` until a non-empty trace is loaded.
    pub fn current_frame(&self) -> Option<&Frame> {
        self.trace
            .as_ref()
            .and_then(|t| t.frames.get(self.playback.current()))
    }

    pub fn cursor(&self) -> usize {
        self.playback.current()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn collision_index(&self) -> &CollisionIndex {
        &self.index
    }

    // Navigation, bound by the UI layer to keys and buttons.

    pub fn step(&mut self, delta: i64) {
        self.playback.step(delta);
    }

    pub fn set_frame(&mut self, frame: usize) {
        self.playback.set_frame(frame);
    }

    pub fn jump_to_next_collision(&mut self) {
        self.playback.jump_to_next_collision(&self.index);
    }

    pub fn jump_to_prev_collision(&mut self) {
        self.playback.jump_to_prev_collision(&self.index);
    }

    // Pointer and wheel events from the render surface.

    pub fn pointer_down(&mut self) {
        self.viewport.pointer_down();
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.viewport.pointer_move(Vec2::new(x, y));
    }

    pub fn pointer_up(&mut self) {
        self.viewport.pointer_up();
    }

    pub fn wheel(&mut self, x: f64, y: f64, scroll: f64) {
        self.viewport.wheel_zoom(Vec2::new(x, y), scroll);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
    }

    /// Façade output for this redraw tick; `None` until a trace is loaded.
    pub fn render(&self) -> Option<RenderFrame> {
        let trace = self.trace.as_ref()?;
        render::render(trace, self.playback.current(), &self.viewport)
    }
}
