//! Contact diagnostics: the geometry and kinematics derived around one
//! collision.
//!
//! Everything here is a pure function of recorded body states and a contact
//! manifold; the render façade decides what to show.

use crate::geometry::{self, Vec2};
use crate::trace::{Body, Collision, Shape};

/// Half-length of the tangent reference segment drawn through the contact.
pub const TANGENT_HALF_LENGTH: f64 = 6.0;

/// Effective contact reconstruction against a capsule collider.
///
/// A recorded manifold fixes one contact point, but a capsule's surface
/// radius varies along its segment; this carries the segment point nearest
/// the tracked body, the interpolated radius there, and the collider's
/// velocity at that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleContact {
    /// Closest point on the capsule segment to the tracked body's center
    pub point: Vec2,
    /// Position along the segment
    pub t: f64,
    /// End radii interpolated at `t`
    pub radius: f64,
    /// Collider velocity at `point`
    pub point_velocity: Vec2,
}

/// Kinematic picture of one contact between the tracked body and another.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactKinematics {
    /// Recorded contact point
    pub start: Vec2,
    /// Contact point pushed out along the normal by the penetration depth
    pub end: Vec2,
    /// Application point on the tracked body, from its position to `end`
    pub r_tracked: Vec2,
    /// Application point on the contacted body, from its position to `start`
    pub r_other: Vec2,
    /// Tracked body's velocity at its application point
    pub v_tracked: Vec2,
    /// Contacted body's velocity at its application point
    pub v_other: Vec2,
    /// `v_tracked - v_other`
    pub relative_velocity: Vec2,
    /// Squared magnitude of the relative velocity; no square root is needed
    /// for display
    pub relative_speed_sq: f64,
    /// Unit tangent through the contact, `None` for a degenerate normal
    pub tangent: Option<Vec2>,
    /// Capsule effective-contact reconstruction, when the collider is one
    pub capsule: Option<CapsuleContact>,
}

/// Velocity of a point rigidly attached to a body, `r` away from its
/// center: `(vx - w*ry, vy + w*rx)` for angular velocity w.
pub fn point_velocity(velocity: Vec2, angular_velocity: f64, r: Vec2) -> Vec2 {
    Vec2::new(
        velocity.x - angular_velocity * r.y,
        velocity.y + angular_velocity * r.x,
    )
}

/// Computes the full kinematic picture for one collision of `tracked`.
///
/// A zero-magnitude manifold normal degenerates the contact extent
/// (`end == start`, no tangent) instead of crashing; the velocity terms
/// stay meaningful.
pub fn contact_kinematics(tracked: &Body, collision: &Collision) -> ContactKinematics {
    let manifold = &collision.manifold;
    let other = &collision.body;

    let normal = geometry::normalize_or_zero(manifold.normal);
    let start = manifold.contact;
    let end = start + normal * manifold.depth;

    let r_tracked = end - tracked.position;
    let r_other = start - other.position;

    let v_tracked = point_velocity(tracked.velocity, tracked.angular_velocity, r_tracked);
    let v_other = point_velocity(other.velocity, other.angular_velocity, r_other);
    let relative_velocity = v_tracked - v_other;

    let tangent = if normal == Vec2::zeros() {
        None
    } else {
        Some(geometry::normalize_or_zero(geometry::perpendicular(normal)))
    };

    let capsule = match &other.shape {
        Some(Shape::Capsule {
            a,
            b,
            radius_a,
            radius_b,
        }) => {
            let proj = geometry::closest_point_on_segment(*a, *b, tracked.position);
            Some(CapsuleContact {
                point: proj.point,
                t: proj.t,
                radius: geometry::lerp(*radius_a, *radius_b, proj.t),
                point_velocity: point_velocity(
                    other.velocity,
                    other.angular_velocity,
                    proj.point - other.position,
                ),
            })
        }
        _ => None,
    };

    ContactKinematics {
        start,
        end,
        r_tracked,
        r_other,
        v_tracked,
        v_other,
        relative_speed_sq: relative_velocity.norm_squared(),
        relative_velocity,
        tangent,
        capsule,
    }
}

/// Endpoints of the tangent reference segment centered on the contact, or
/// `None` when the normal is degenerate.
pub fn tangent_segment(kinematics: &ContactKinematics) -> Option<(Vec2, Vec2)> {
    kinematics.tangent.map(|t| {
        (
            kinematics.start - t * TANGENT_HALF_LENGTH,
            kinematics.start + t * TANGENT_HALF_LENGTH,
        )
    })
}
