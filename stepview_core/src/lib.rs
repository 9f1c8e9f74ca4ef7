//! Stepview Core - Frame-by-Frame Replay for Recorded Physics Traces
//!
//! This library covers the three hard parts of a physics-trace debugger:
//! 1. **Contact Diagnostics**: manifold geometry and relative contact-point
//!    velocities across circle, capsule, and polygon colliders
//! 2. **Viewport Navigation**: a cursor-anchored pan/zoom transform
//! 3. **Collision Indexing**: jump-to-next/previous-collision navigation
//!
//! Drawing, file-drop plumbing, and UI widgets live in the embedding
//! application and bind against the plain state exposed here.

pub mod diagnostics;
pub mod error;
pub mod frame_index;
pub mod geometry;
pub mod loader;
pub mod playback;
pub mod render;
pub mod session;
pub mod trace;
pub mod viewport;

// Re-export key types for convenience
pub use diagnostics::{contact_kinematics, CapsuleContact, ContactKinematics};
pub use error::TraceError;
pub use frame_index::CollisionIndex;
pub use playback::Playback;
pub use render::{Drawable, Primitive, RenderFrame, Role};
pub use session::ReplaySession;
pub use trace::{Body, Collision, ContactManifold, Frame, Shape, Trace};
pub use viewport::Viewport;
