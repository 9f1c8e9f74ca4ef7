//! Trace data model: recorded frames, bodies and shapes, plus the
//! tick/substep stamps derived while normalizing a raw payload.
//!
//! Raw records mirror the capture format and carry plain `[f64; 2]` arrays;
//! the normalized model uses nalgebra vectors and is read-only after
//! ingestion.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::TraceError;
use crate::geometry::Vec2;

/// Shape id recorded for circles.
pub const SHAPE_CIRCLE: u32 = 0;
/// Shape id recorded for polygons.
pub const SHAPE_POLYGON: u32 = 2;
/// Shape id recorded for capsules.
pub const SHAPE_CAPSULE: u32 = 3;

/// Frame labels that drive the tick/substep stamps. Recorded labels may
/// carry per-tick suffixes, so matching is by prefix.
pub const LABEL_TICK_START: &str = "tick start";
pub const LABEL_SUBSTEP_START: &str = "physics step start";
pub const LABEL_PHYSICS_END: &str = "physics end";

// ---------------------------------------------------------------------------
// Raw records (capture format)
// ---------------------------------------------------------------------------

/// Shape discriminator as recorded: numeric id plus a human-readable label.
#[derive(Debug, Clone, Deserialize)]
pub struct RawShapeType {
    pub id: u32,
    #[serde(default)]
    pub label: String,
}

/// One recorded body. The `shape` payload is interpreted per `shape_type.id`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBody {
    pub shape_type: RawShapeType,
    #[serde(default)]
    pub shape: serde_json::Value,
    pub pos: [f64; 2],
    #[serde(default)]
    pub vel: [f64; 2],
    #[serde(default)]
    pub vel_d: [f64; 2],
    #[serde(default)]
    pub ang_vel: f64,
    #[serde(default)]
    pub ang_vel_d: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawManifold {
    pub depth: f64,
    pub contact: [f64; 2],
    pub normal: [f64; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCollision {
    pub manifold: RawManifold,
    pub body: RawBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStep {
    pub name: String,
    pub ball: RawBody,
    #[serde(default)]
    pub cam_offset: [f64; 2],
    #[serde(default)]
    pub collisions: Vec<RawCollision>,
}

/// Top-level recorded payload. `steps` stays optional here so a missing
/// frame sequence surfaces as `MalformedTrace` instead of a serde error.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTrace {
    pub steps: Option<Vec<RawStep>>,
    #[serde(default)]
    pub static_bodies: Vec<RawBody>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawCircle {
    p: [f64; 2],
    r: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct RawCapsule {
    a: [f64; 2],
    b: [f64; 2],
    ra: f64,
    rb: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct RawPolygon {
    verts: Vec<[f64; 2]>,
}

// ---------------------------------------------------------------------------
// Normalized model
// ---------------------------------------------------------------------------

/// Collider geometry attached to a recorded body.
///
/// Circle centers are offsets from the body position; capsule endpoints and
/// polygon vertices are recorded in world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Shape {
    Circle {
        center: Vec2,
        radius: f64,
    },
    Capsule {
        a: Vec2,
        b: Vec2,
        radius_a: f64,
        radius_b: f64,
    },
    Polygon {
        vertices: Vec<Vec2>,
    },
}

/// One recorded body state. Plain value data; bodies carry no identity
/// across frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Body {
    /// Collider geometry, `None` when the recorded shape id is unsupported
    pub shape: Option<Shape>,
    /// Shape label as recorded
    pub shape_label: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub velocity_delta: Vec2,
    pub angular_velocity: f64,
    pub angular_velocity_delta: f64,
}

/// Geometric description of one contact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactManifold {
    pub contact: Vec2,
    /// Unit contact normal as recorded. Re-normalized before use; a
    /// zero-magnitude normal marks a malformed recording and degenerates
    /// the derived geometry instead of crashing.
    pub normal: Vec2,
    pub depth: f64,
}

/// One contact between the tracked ball and another body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collision {
    pub manifold: ContactManifold,
    pub body: Body,
}

/// One recorded simulation instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub label: String,
    pub ball: Body,
    pub camera_offset: Vec2,
    pub collisions: Vec<Collision>,
    /// Engine tick this frame belongs to (counts "tick start" labels)
    pub tick_index: u32,
    /// Physics substep within the tick; 0 outside the solver
    pub substep_index: u32,
}

/// A full recorded run: the frame sequence plus the bodies that never move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub frames: Vec<Frame>,
    pub static_bodies: Vec<Body>,
}

fn vec2(a: [f64; 2]) -> Vec2 {
    Vec2::new(a[0], a[1])
}

fn decode_shape(raw: &RawBody) -> Option<Shape> {
    let decoded = match raw.shape_type.id {
        SHAPE_CIRCLE => serde_json::from_value::<RawCircle>(raw.shape.clone()).map(|c| {
            Shape::Circle {
                center: vec2(c.p),
                radius: c.r,
            }
        }),
        SHAPE_POLYGON => serde_json::from_value::<RawPolygon>(raw.shape.clone()).map(|p| {
            Shape::Polygon {
                vertices: p.verts.iter().copied().map(vec2).collect(),
            }
        }),
        SHAPE_CAPSULE => serde_json::from_value::<RawCapsule>(raw.shape.clone()).map(|c| {
            Shape::Capsule {
                a: vec2(c.a),
                b: vec2(c.b),
                radius_a: c.ra,
                radius_b: c.rb,
            }
        }),
        id => {
            warn!(id, label = %raw.shape_type.label, "unsupported shape kind, skipping geometry");
            return None;
        }
    };

    match decoded {
        Ok(shape) => Some(shape),
        Err(e) => {
            warn!(id = raw.shape_type.id, error = %e, "undecodable shape payload, skipping geometry");
            None
        }
    }
}

impl Body {
    fn from_raw(raw: &RawBody) -> Self {
        Self {
            shape: decode_shape(raw),
            shape_label: raw.shape_type.label.clone(),
            position: vec2(raw.pos),
            velocity: vec2(raw.vel),
            velocity_delta: vec2(raw.vel_d),
            angular_velocity: raw.ang_vel,
            angular_velocity_delta: raw.ang_vel_d,
        }
    }
}

impl Collision {
    fn from_raw(raw: &RawCollision) -> Self {
        Self {
            manifold: ContactManifold {
                contact: vec2(raw.manifold.contact),
                normal: vec2(raw.manifold.normal),
                depth: raw.manifold.depth,
            },
            body: Body::from_raw(&raw.body),
        }
    }
}

impl Trace {
    /// Normalizes a decoded payload, stamping every frame with the
    /// tick/substep counters derived from its label.
    ///
    /// Traces recorded without stamping labels simply keep both counters at
    /// their initial values.
    pub fn from_raw(raw: RawTrace) -> Result<Self, TraceError> {
        let steps = raw
            .steps
            .ok_or_else(|| TraceError::malformed("payload has no `steps` sequence"))?;

        let mut frames = Vec::with_capacity(steps.len());
        let mut tick_index = 0u32;
        let mut substep_index = 0u32;

        for step in &steps {
            if step.name.starts_with(LABEL_TICK_START) {
                tick_index += 1;
            } else if step.name.starts_with(LABEL_SUBSTEP_START) {
                substep_index += 1;
            } else if step.name.starts_with(LABEL_PHYSICS_END) {
                substep_index = 0;
            }

            frames.push(Frame {
                label: step.name.clone(),
                ball: Body::from_raw(&step.ball),
                camera_offset: vec2(step.cam_offset),
                collisions: step.collisions.iter().map(Collision::from_raw).collect(),
                tick_index,
                substep_index,
            });
        }

        Ok(Self {
            frames,
            static_bodies: raw.static_bodies.iter().map(Body::from_raw).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_ball() -> RawBody {
        json5::from_str(r#"{ shape_type: { id: 0, label: "circle" }, shape: { p: [0, 0], r: 5 }, pos: [10, 20], vel: [1, 0], vel_d: [0, 0], ang_vel: 0.5, ang_vel_d: 0 }"#)
            .unwrap()
    }

    fn step_named(name: &str) -> RawStep {
        RawStep {
            name: name.to_string(),
            ball: raw_ball(),
            cam_offset: [0.0, 0.0],
            collisions: vec![],
        }
    }

    #[test]
    fn test_tick_and_substep_stamps() {
        let raw = RawTrace {
            steps: Some(vec![
                step_named("tick start (frame 1)"),
                step_named("physics step start"),
                step_named("physics step start"),
                step_named("physics end"),
                step_named("tick start (frame 2)"),
            ]),
            static_bodies: vec![],
        };

        let trace = Trace::from_raw(raw).unwrap();
        let ticks: Vec<u32> = trace.frames.iter().map(|f| f.tick_index).collect();
        let substeps: Vec<u32> = trace.frames.iter().map(|f| f.substep_index).collect();
        assert_eq!(ticks, vec![1, 1, 1, 1, 2]);
        assert_eq!(substeps, vec![0, 1, 2, 0, 0]);
    }

    #[test]
    fn test_unlabeled_trace_keeps_initial_stamps() {
        let raw = RawTrace {
            steps: Some(vec![step_named("integrate"), step_named("resolve")]),
            static_bodies: vec![],
        };

        let trace = Trace::from_raw(raw).unwrap();
        assert!(trace.frames.iter().all(|f| f.tick_index == 0));
        assert!(trace.frames.iter().all(|f| f.substep_index == 0));
    }

    #[test]
    fn test_missing_steps_is_malformed() {
        let raw = RawTrace {
            steps: None,
            static_bodies: vec![],
        };
        assert!(matches!(
            Trace::from_raw(raw),
            Err(TraceError::MalformedTrace(_))
        ));
    }

    #[test]
    fn test_missing_static_bodies_defaults_to_empty() {
        let raw: RawTrace = json5::from_str(
            r#"{ steps: [{ name: "a", ball: { shape_type: { id: 0, label: "circle" }, shape: { p: [0, 0], r: 1 }, pos: [0, 0], vel: [0, 0], vel_d: [0, 0], ang_vel: 0, ang_vel_d: 0 } }] }"#,
        )
        .unwrap();

        let trace = Trace::from_raw(raw).unwrap();
        assert!(trace.static_bodies.is_empty());
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn test_circle_center_is_offset_from_position() {
        let trace = Trace::from_raw(RawTrace {
            steps: Some(vec![step_named("a")]),
            static_bodies: vec![],
        })
        .unwrap();

        let ball = &trace.frames[0].ball;
        assert_eq!(ball.position, Vec2::new(10.0, 20.0));
        assert_eq!(
            ball.shape,
            Some(Shape::Circle {
                center: Vec2::zeros(),
                radius: 5.0
            })
        );
    }

    #[test]
    fn test_capsule_shape_decodes() {
        let raw: RawBody = json5::from_str(
            r#"{ shape_type: { id: 3, label: "capsule" }, shape: { a: [0, 0], b: [10, 0], ra: 2, rb: 4 }, pos: [0, 0] }"#,
        )
        .unwrap();

        assert_eq!(
            Body::from_raw(&raw).shape,
            Some(Shape::Capsule {
                a: Vec2::zeros(),
                b: Vec2::new(10.0, 0.0),
                radius_a: 2.0,
                radius_b: 4.0
            })
        );
    }

    #[test]
    fn test_unsupported_shape_id_keeps_body_without_geometry() {
        let raw: RawBody = json5::from_str(
            r#"{ shape_type: { id: 7, label: "wedge" }, shape: { x: 1 }, pos: [3, 4], vel: [1, 1] }"#,
        )
        .unwrap();

        let body = Body::from_raw(&raw);
        assert!(body.shape.is_none());
        assert_eq!(body.shape_label, "wedge");
        assert_eq!(body.position, Vec2::new(3.0, 4.0));
    }
}
