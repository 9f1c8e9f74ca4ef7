//! Index of collision-carrying frames, for skip-navigation.

use crate::trace::Frame;

/// Strictly ascending trace positions whose frames have at least one
/// collision. Rebuilt whenever a trace is loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionIndex {
    positions: Vec<usize>,
}

impl CollisionIndex {
    /// Scans the frame sequence once, recording collision positions.
    pub fn build(frames: &[Frame]) -> Self {
        Self {
            positions: frames
                .iter()
                .enumerate()
                .filter(|(_, frame)| !frame.collisions.is_empty())
                .map(|(pos, _)| pos)
                .collect(),
        }
    }

    /// Smallest indexed position strictly after `pos`.
    pub fn next_after(&self, pos: usize) -> Option<usize> {
        let i = self.positions.partition_point(|&p| p <= pos);
        self.positions.get(i).copied()
    }

    /// Largest indexed position strictly before `pos`.
    pub fn prev_before(&self, pos: usize) -> Option<usize> {
        let i = self.positions.partition_point(|&p| p < pos);
        i.checked_sub(1).map(|i| self.positions[i])
    }

    /// First indexed position, used for initial cursor placement.
    pub fn first(&self) -> Option<usize> {
        self.positions.first().copied()
    }

    /// Number of indexed positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// All indexed positions, ascending.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{Body, Collision, ContactManifold, Frame};
    use crate::geometry::Vec2;

    fn body() -> Body {
        Body {
            shape: None,
            shape_label: String::new(),
            position: Vec2::zeros(),
            velocity: Vec2::zeros(),
            velocity_delta: Vec2::zeros(),
            angular_velocity: 0.0,
            angular_velocity_delta: 0.0,
        }
    }

    fn collision() -> Collision {
        Collision {
            manifold: ContactManifold {
                contact: Vec2::zeros(),
                normal: Vec2::new(0.0, 1.0),
                depth: 1.0,
            },
            body: body(),
        }
    }

    fn frames_with_collisions_at(positions: &[usize], len: usize) -> Vec<Frame> {
        (0..len)
            .map(|pos| Frame {
                label: format!("frame {pos}"),
                ball: body(),
                camera_offset: Vec2::zeros(),
                collisions: if positions.contains(&pos) {
                    vec![collision()]
                } else {
                    vec![]
                },
                tick_index: 0,
                substep_index: 0,
            })
            .collect()
    }

    #[test]
    fn test_queries_are_strict() {
        let index = CollisionIndex::build(&frames_with_collisions_at(&[2, 5, 9], 12));

        assert_eq!(index.next_after(2), Some(5));
        assert_eq!(index.next_after(9), None);
        assert_eq!(index.prev_before(5), Some(2));
        assert_eq!(index.prev_before(2), None);
    }

    #[test]
    fn test_queries_between_indexed_positions() {
        let index = CollisionIndex::build(&frames_with_collisions_at(&[2, 5, 9], 12));

        assert_eq!(index.next_after(0), Some(2));
        assert_eq!(index.next_after(3), Some(5));
        assert_eq!(index.prev_before(11), Some(9));
    }

    #[test]
    fn test_empty_index() {
        let index = CollisionIndex::build(&frames_with_collisions_at(&[], 4));
        assert!(index.is_empty());
        assert_eq!(index.first(), None);
        assert_eq!(index.next_after(0), None);
        assert_eq!(index.prev_before(3), None);
    }

    #[test]
    fn test_first_position_can_be_zero() {
        let index = CollisionIndex::build(&frames_with_collisions_at(&[0, 4], 6));
        assert_eq!(index.first(), Some(0));
        assert_eq!(index.positions(), &[0, 4]);
    }
}
