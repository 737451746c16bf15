//! Boat movement: free 2D translation along a continuous heading
//!
//! Heading is in degrees and unbounded. 0° points toward -Y; positive
//! rotation turns the bow clockwise.

use serde::{Deserialize, Serialize};

use super::tuning::Tuning;

/// Directions a movement command can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
    /// Strafe to port
    Left,
    /// Strafe to starboard
    Right,
    Dive,
    Surface,
}

impl Direction {
    /// Order the held-input poll re-issues directions in
    pub const POLL_ORDER: [Direction; 6] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Left,
        Direction::Right,
        Direction::Dive,
        Direction::Surface,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotateDirection {
    Left,
    Right,
}

/// Result of applying a movement command to the boat
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveDelta {
    pub dx: f64,
    pub dy: f64,
    pub depth: f64,
}

/// Movement system for projecting commands onto the world plane
pub struct MovementSystem;

impl MovementSystem {
    /// Unit forward vector for a heading in degrees
    pub fn heading_vector(rotation: f64) -> (f64, f64) {
        let rad = rotation.to_radians();
        (rad.sin(), -rad.cos())
    }

    /// Translation and depth change for one movement command
    pub fn delta(rotation: f64, direction: Direction, tuning: &Tuning) -> MoveDelta {
        let speed = tuning.move_speed;
        let rad = rotation.to_radians();
        let (fx, fy) = Self::heading_vector(rotation);
        // Strafe axis is the heading rotated 90° clockwise
        let (sx, sy) = (rad.cos(), rad.sin());

        match direction {
            Direction::Forward => MoveDelta {
                dx: fx * speed,
                dy: fy * speed,
                depth: 0.0,
            },
            Direction::Backward => MoveDelta {
                dx: -fx * speed,
                dy: -fy * speed,
                depth: 0.0,
            },
            Direction::Left => MoveDelta {
                dx: -sx * speed,
                dy: -sy * speed,
                depth: 0.0,
            },
            Direction::Right => MoveDelta {
                dx: sx * speed,
                dy: sy * speed,
                depth: 0.0,
            },
            Direction::Dive => MoveDelta {
                depth: tuning.depth_step,
                ..MoveDelta::default()
            },
            Direction::Surface => MoveDelta {
                depth: -tuning.depth_step,
                ..MoveDelta::default()
            },
        }
    }

    /// New heading after a discrete rotate command
    pub fn rotate(rotation: f64, direction: RotateDirection, tuning: &Tuning) -> f64 {
        match direction {
            RotateDirection::Left => rotation - tuning.rotation_step,
            RotateDirection::Right => rotation + tuning.rotation_step,
        }
    }

    /// New heading after a raw pointer-movement delta.
    /// A delta that would leave the heading non-finite is ignored.
    pub fn look(rotation: f64, delta_x: f64, tuning: &Tuning) -> f64 {
        let next = rotation + delta_x * tuning.look_sensitivity;
        if next.is_finite() {
            next
        } else {
            rotation
        }
    }
}
