//! Render façade: turns the current frame and viewport into a list of
//! backend-agnostic primitives.
//!
//! The core never touches a rendering API. A backend applies the viewport
//! transform to the world list, draws the overlay list in screen pixels,
//! and maps each role onto its theme.

use serde::Serialize;

use crate::diagnostics::{self, ContactKinematics};
use crate::geometry::Vec2;
use crate::trace::{Body, Collision, Frame, Shape, Trace};
use crate::viewport::Viewport;

/// Velocity arrows are stretched for visibility.
pub const VELOCITY_DRAW_SCALE: f64 = 10.0;
/// Most frames a timeline window shows at once.
pub const TIMELINE_WINDOW: usize = 300;
/// Summed penetration depth past which a timeline bar is classed deep.
pub const DEEP_PENETRATION_THRESHOLD: f64 = 3.0;

const INFO_STRIP_HEIGHT: f64 = 50.0;
const INFO_STRIP_PADDING: f64 = 20.0;
const TIMELINE_HEIGHT: f64 = 20.0;
const TIMELINE_PADDING_X: f64 = 2.0;
const TIMELINE_PADDING_Y: f64 = 6.0;
const TIMELINE_BAR_SPACING: f64 = 1.0;

/// Collision severity class of one timeline bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BarClass {
    /// The cursor frame
    Cursor,
    /// Summed penetration above `DEEP_PENETRATION_THRESHOLD`
    Deep,
    /// Any collision
    Collision,
    /// No collision
    Plain,
}

/// What a primitive depicts; backends map roles onto theme colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    StaticBody,
    Ball,
    Ghost,
    Velocity,
    VelocityDelta,
    Collider,
    ContactStart,
    ContactEnd,
    Penetration,
    Tangent,
    RelativeVelocity,
    EffectiveContact,
    Info,
    InfoPanel,
    Timeline(BarClass),
}

/// One drawable primitive. World-list primitives are in world coordinates;
/// overlay primitives in screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Primitive {
    Circle { center: Vec2, radius: f64 },
    Point { at: Vec2 },
    Segment { from: Vec2, to: Vec2 },
    Arrow { from: Vec2, to: Vec2 },
    Polygon { vertices: Vec<Vec2> },
    Rect { min: Vec2, width: f64, height: f64 },
    Label { at: Vec2, text: String },
}

impl Primitive {
    fn translated(self, by: Vec2) -> Self {
        match self {
            Self::Circle { center, radius } => Self::Circle {
                center: center + by,
                radius,
            },
            Self::Point { at } => Self::Point { at: at + by },
            Self::Segment { from, to } => Self::Segment {
                from: from + by,
                to: to + by,
            },
            Self::Arrow { from, to } => Self::Arrow {
                from: from + by,
                to: to + by,
            },
            Self::Polygon { vertices } => Self::Polygon {
                vertices: vertices.into_iter().map(|v| v + by).collect(),
            },
            Self::Rect { min, width, height } => Self::Rect {
                min: min + by,
                width,
                height,
            },
            Self::Label { at, text } => Self::Label { at: at + by, text },
        }
    }
}

/// A primitive tagged with the role a backend themes it by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drawable {
    pub role: Role,
    pub primitive: Primitive,
}

fn draw(role: Role, primitive: Primitive) -> Drawable {
    Drawable { role, primitive }
}

/// Everything one redraw tick needs: world primitives (viewport transform
/// applied by the backend), screen-space overlay primitives, and the
/// transform itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub world: Vec<Drawable>,
    pub overlay: Vec<Drawable>,
    /// Screen offset of the world origin
    pub offset: Vec2,
    /// Uniform world-to-pixel scale
    pub zoom: f64,
}

/// Outline of a body's collider, empty when its shape is unsupported.
///
/// Capsules draw as their two end circles, the spine, and the two outer
/// tangent lines.
pub fn body_outline(body: &Body, role: Role) -> Vec<Drawable> {
    let Some(shape) = &body.shape else {
        return Vec::new();
    };

    match shape {
        Shape::Circle { center, radius } => vec![draw(
            role,
            Primitive::Circle {
                center: body.position + center,
                radius: *radius,
            },
        )],
        Shape::Polygon { vertices } => vec![draw(
            role,
            Primitive::Polygon {
                vertices: vertices.clone(),
            },
        )],
        Shape::Capsule {
            a,
            b,
            radius_a,
            radius_b,
        } => {
            let theta = (b.y - a.y).atan2(b.x - a.x);
            let (sin, cos) = theta.sin_cos();
            let edge_a = Vec2::new(radius_a * cos, -radius_a * sin);
            let edge_b = Vec2::new(radius_b * cos, -radius_b * sin);

            vec![
                draw(
                    role,
                    Primitive::Circle {
                        center: *a,
                        radius: *radius_a,
                    },
                ),
                draw(
                    role,
                    Primitive::Circle {
                        center: *b,
                        radius: *radius_b,
                    },
                ),
                draw(role, Primitive::Segment { from: *a, to: *b }),
                draw(
                    role,
                    Primitive::Segment {
                        from: a + edge_a,
                        to: b + edge_b,
                    },
                ),
                draw(
                    role,
                    Primitive::Segment {
                        from: a - edge_a,
                        to: b - edge_b,
                    },
                ),
            ]
        }
    }
}

fn ball_drawables(ball: &Body) -> Vec<Drawable> {
    let mut out = Vec::new();
    let pos = ball.position;
    let radius = match &ball.shape {
        Some(Shape::Circle { radius, .. }) => *radius,
        _ => 0.0,
    };

    out.push(draw(
        Role::Info,
        Primitive::Label {
            at: pos + Vec2::new(radius + 10.0, -radius),
            text: format!(
                "pos: {}, {}\nvel: {}, {}\nvelDelta: {}, {}\nvelAng: {}\nvelAngDelta: {}",
                pos.x,
                pos.y,
                ball.velocity.x,
                ball.velocity.y,
                ball.velocity_delta.x,
                ball.velocity_delta.y,
                ball.angular_velocity,
                ball.angular_velocity_delta,
            ),
        },
    ));

    // Ghost: where the ball lands after one unit of its velocity.
    if ball.shape.is_some() {
        let ghost = pos + ball.velocity;
        out.push(draw(
            Role::Ghost,
            Primitive::Circle {
                center: ghost,
                radius,
            },
        ));
        out.push(draw(Role::Ghost, Primitive::Point { at: ghost }));
    }

    out.extend(body_outline(ball, Role::Ball));
    out.push(draw(Role::Ball, Primitive::Point { at: pos }));

    out.push(draw(
        Role::Velocity,
        Primitive::Arrow {
            from: pos,
            to: pos + ball.velocity * VELOCITY_DRAW_SCALE,
        },
    ));
    if ball.velocity_delta != Vec2::zeros() {
        out.push(draw(
            Role::VelocityDelta,
            Primitive::Arrow {
                from: pos,
                to: pos + ball.velocity_delta * VELOCITY_DRAW_SCALE,
            },
        ));
    }

    out
}

fn contact_drawables(kinematics: &ContactKinematics, frame: &Frame, depth: f64) -> Vec<Drawable> {
    let mut out = vec![
        draw(Role::ContactStart, Primitive::Point { at: kinematics.start }),
        draw(Role::ContactEnd, Primitive::Point { at: kinematics.end }),
        draw(
            Role::Penetration,
            Primitive::Segment {
                from: kinematics.start,
                to: kinematics.end,
            },
        ),
    ];

    if let Some((from, to)) = diagnostics::tangent_segment(kinematics) {
        out.push(draw(Role::Tangent, Primitive::Segment { from, to }));
    }

    if kinematics.relative_velocity != Vec2::zeros() {
        out.push(draw(
            Role::RelativeVelocity,
            Primitive::Arrow {
                from: kinematics.start,
                to: kinematics.start + kinematics.relative_velocity * VELOCITY_DRAW_SCALE,
            },
        ));
    }

    if let Some(capsule) = &kinematics.capsule {
        out.push(draw(
            Role::EffectiveContact,
            Primitive::Circle {
                center: capsule.point,
                radius: capsule.radius,
            },
        ));
        out.push(draw(
            Role::EffectiveContact,
            Primitive::Point { at: capsule.point },
        ));
    }

    out.push(draw(
        Role::Info,
        Primitive::Label {
            at: kinematics.start - Vec2::new(20.0, 0.0),
            text: format!(
                "depth: {depth}\ntick: {}.{}\nrelVel: {}, {}\nrelSpeed2: {}",
                frame.tick_index,
                frame.substep_index,
                kinematics.relative_velocity.x,
                kinematics.relative_velocity.y,
                kinematics.relative_speed_sq,
            ),
        },
    ));

    out
}

fn collision_drawables(tracked: &Body, collision: &Collision, frame: &Frame) -> Vec<Drawable> {
    let mut out = body_outline(&collision.body, Role::Collider);
    let kinematics = diagnostics::contact_kinematics(tracked, collision);
    out.extend(contact_drawables(
        &kinematics,
        frame,
        collision.manifold.depth,
    ));
    out
}

/// World-space drawables for one frame, shifted by its camera offset.
pub fn frame_scene(frame: &Frame, static_bodies: &[Body]) -> Vec<Drawable> {
    let mut out = Vec::new();

    for body in static_bodies {
        out.extend(body_outline(body, Role::StaticBody));
    }
    out.extend(ball_drawables(&frame.ball));
    for collision in &frame.collisions {
        out.extend(collision_drawables(&frame.ball, collision, frame));
    }

    out.into_iter()
        .map(|d| Drawable {
            role: d.role,
            primitive: d.primitive.translated(frame.camera_offset),
        })
        .collect()
}

fn bar_class(frame: &Frame, at: usize, cursor: usize) -> BarClass {
    if at == cursor {
        return BarClass::Cursor;
    }
    let depth: f64 = frame.collisions.iter().map(|c| c.manifold.depth).sum();
    if depth > DEEP_PENETRATION_THRESHOLD {
        BarClass::Deep
    } else if !frame.collisions.is_empty() {
        BarClass::Collision
    } else {
        BarClass::Plain
    }
}

/// Timeline strip: one bar per frame in a window of up to `TIMELINE_WINDOW`
/// frames around the cursor, classed by collision severity.
pub fn timeline(trace: &Trace, cursor: usize, origin: Vec2, width: f64) -> Vec<Drawable> {
    let len = trace.frames.len();
    let mut min = cursor.saturating_sub(TIMELINE_WINDOW / 2);
    let max = len.min(min + TIMELINE_WINDOW);
    min = max.saturating_sub(TIMELINE_WINDOW);
    let count = max - min;
    if count == 0 {
        return Vec::new();
    }

    let bar_height = TIMELINE_HEIGHT - TIMELINE_PADDING_Y * 2.0;
    let bar_width =
        (width - TIMELINE_PADDING_X * 2.0 - count as f64 * TIMELINE_BAR_SPACING) / count as f64;
    let bar_y = origin.y + TIMELINE_PADDING_Y;

    let mut out = vec![draw(
        Role::InfoPanel,
        Primitive::Rect {
            min: origin,
            width,
            height: TIMELINE_HEIGHT,
        },
    )];

    for (offset, pos) in (min..max).enumerate() {
        let bar_x = origin.x + TIMELINE_PADDING_X + offset as f64 * (bar_width + TIMELINE_BAR_SPACING);
        out.push(draw(
            Role::Timeline(bar_class(&trace.frames[pos], pos, cursor)),
            Primitive::Rect {
                min: Vec2::new(bar_x, bar_y),
                width: bar_width,
                height: bar_height,
            },
        ));
    }

    out
}

/// Screen-space frame-info strip: frame label left, cursor position right.
fn info_strip(frame: &Frame, cursor: usize, viewport: &Viewport) -> Vec<Drawable> {
    let y = viewport.height - INFO_STRIP_HEIGHT;
    vec![
        draw(
            Role::InfoPanel,
            Primitive::Rect {
                min: Vec2::new(0.0, y),
                width: viewport.width,
                height: INFO_STRIP_HEIGHT,
            },
        ),
        draw(
            Role::Info,
            Primitive::Label {
                at: Vec2::new(INFO_STRIP_PADDING, y + INFO_STRIP_PADDING),
                text: frame.label.clone(),
            },
        ),
        draw(
            Role::Info,
            Primitive::Label {
                at: Vec2::new(viewport.width - INFO_STRIP_PADDING, y + INFO_STRIP_PADDING),
                text: cursor.to_string(),
            },
        ),
    ]
}

/// Full façade output for one redraw tick, `None` when the cursor points
/// outside the trace (empty trace).
pub fn render(trace: &Trace, cursor: usize, viewport: &Viewport) -> Option<RenderFrame> {
    let frame = trace.frames.get(cursor)?;

    let mut overlay = info_strip(frame, cursor, viewport);
    let timeline_origin = Vec2::new(
        0.0,
        viewport.height - INFO_STRIP_HEIGHT - TIMELINE_HEIGHT,
    );
    overlay.extend(timeline(trace, cursor, timeline_origin, viewport.width));

    Some(RenderFrame {
        world: frame_scene(frame, &trace.static_bodies),
        overlay,
        offset: viewport.offset,
        zoom: viewport.zoom,
    })
}
