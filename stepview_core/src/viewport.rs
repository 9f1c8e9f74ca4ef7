//! Viewport transform: world/screen mapping with drag-pan and
//! anchor-preserving zoom.

use crate::geometry::Vec2;

/// Lowest zoom factor the wheel can reach.
pub const MIN_ZOOM: f64 = 0.01;
/// Zoom factor change per wheel notch.
pub const ZOOM_STEP: f64 = 0.8;

/// Pan/zoom state for the render surface.
///
/// `offset` is the screen position of the world origin; `zoom` scales world
/// units to pixels uniformly. Screen position of a world point w is
/// `offset + w * zoom`.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub offset: Vec2,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
    dragging: bool,
    drag_anchor: Option<Vec2>,
}

impl Viewport {
    /// Creates a viewport sized to the render surface, framing the region
    /// around the world origin.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            offset: Vec2::new(width / 2.0 - 200.0, height / 2.0 - 120.0),
            zoom: 1.5,
            width,
            height,
            dragging: false,
            drag_anchor: None,
        }
    }

    /// Screen position of a world point.
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.offset + world * self.zoom
    }

    /// World point under a screen position.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.offset) / self.zoom
    }

    /// Applies one wheel notch at `pointer`, re-centering so the world
    /// point under the pointer stays fixed on screen.
    ///
    /// `scroll` follows wheel convention: positive scrolls away from the
    /// user and zooms out. A step that would land below `MIN_ZOOM` is
    /// rejected outright, leaving the viewport unchanged.
    pub fn wheel_zoom(&mut self, pointer: Vec2, scroll: f64) {
        let direction = if scroll > 0.0 { -1.0 } else { 1.0 };
        let dz = direction * ZOOM_STEP;
        let new_zoom = self.zoom + dz;
        if new_zoom < MIN_ZOOM {
            return;
        }

        // Anchor fractions of the viewport, measured in world units.
        let wx = (pointer.x - self.offset.x) / (self.width * self.zoom);
        let wy = (pointer.y - self.offset.y) / (self.height * self.zoom);

        self.offset.x -= wx * self.width * dz;
        self.offset.y -= wy * self.height * dz;
        self.zoom = new_zoom;
    }

    /// Pointer pressed over the render surface: begin a drag. The anchor is
    /// not set until the first move arrives.
    pub fn pointer_down(&mut self) {
        self.dragging = true;
        self.drag_anchor = None;
    }

    /// Pointer moved. The first move after pointer-down only records the
    /// anchor; subsequent moves pan by the pointer delta.
    pub fn pointer_move(&mut self, pointer: Vec2) {
        if !self.dragging {
            return;
        }
        if let Some(anchor) = self.drag_anchor {
            self.offset += pointer - anchor;
        }
        self.drag_anchor = Some(pointer);
    }

    /// Pointer released: end the drag.
    pub fn pointer_up(&mut self) {
        self.dragging = false;
        self.drag_anchor = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Adopts a new render surface size without disturbing pan/zoom.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn viewport() -> Viewport {
        Viewport::new(1600.0, 900.0)
    }

    #[test]
    fn test_world_screen_round_trip() {
        let vp = viewport();
        let world = Vec2::new(123.0, -45.0);
        let back = vp.screen_to_world(vp.world_to_screen(world));
        assert_relative_eq!(back.x, world.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, world.y, epsilon = 1e-9);
    }

    #[test]
    fn test_zoom_in_keeps_pointer_anchor_fixed() {
        let mut vp = viewport();
        let pointer = Vec2::new(400.0, 300.0);
        let anchor_world = vp.screen_to_world(pointer);

        vp.wheel_zoom(pointer, -1.0);

        let anchor_screen = vp.world_to_screen(anchor_world);
        assert_relative_eq!(anchor_screen.x, pointer.x, epsilon = 1e-9);
        assert_relative_eq!(anchor_screen.y, pointer.y, epsilon = 1e-9);
        assert_relative_eq!(vp.zoom, 1.5 + ZOOM_STEP);
    }

    #[test]
    fn test_zoom_below_floor_is_rejected() {
        let mut vp = viewport();
        // One notch out lands at 0.7; a second would land at -0.1.
        vp.wheel_zoom(Vec2::new(100.0, 100.0), 1.0);
        let before = vp.clone();

        vp.wheel_zoom(Vec2::new(100.0, 100.0), 1.0);
        assert_eq!(vp, before);
    }

    #[test]
    fn test_first_drag_move_is_suppressed() {
        let mut vp = viewport();
        let offset = vp.offset;

        vp.pointer_down();
        vp.pointer_move(Vec2::new(50.0, 60.0));
        assert_eq!(vp.offset, offset);

        vp.pointer_move(Vec2::new(57.0, 64.0));
        assert_eq!(vp.offset, offset + Vec2::new(7.0, 4.0));
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut vp = viewport();
        let before = vp.clone();
        vp.pointer_move(Vec2::new(10.0, 10.0));
        vp.pointer_move(Vec2::new(90.0, 90.0));
        assert_eq!(vp, before);
    }

    #[test]
    fn test_release_ends_the_drag() {
        let mut vp = viewport();
        vp.pointer_down();
        vp.pointer_move(Vec2::new(0.0, 0.0));
        vp.pointer_up();
        assert!(!vp.is_dragging());

        let offset = vp.offset;
        vp.pointer_move(Vec2::new(100.0, 100.0));
        assert_eq!(vp.offset, offset);
    }

    proptest! {
        #[test]
        fn prop_zoom_preserves_pointer_anchor(
            px in 0.0f64..1600.0,
            py in 0.0f64..900.0,
            zoom in 0.9f64..4.0,
            ox in -500.0f64..500.0,
            oy in -500.0f64..500.0,
            scroll in prop_oneof![Just(-1.0f64), Just(1.0f64)],
        ) {
            let mut vp = viewport();
            vp.zoom = zoom;
            vp.offset = Vec2::new(ox, oy);

            let pointer = Vec2::new(px, py);
            let anchor_world = vp.screen_to_world(pointer);
            vp.wheel_zoom(pointer, scroll);

            let anchor_screen = vp.world_to_screen(anchor_world);
            prop_assert!((anchor_screen.x - pointer.x).abs() < 1e-6);
            prop_assert!((anchor_screen.y - pointer.y).abs() < 1e-6);
        }
    }
}
