//! Authoritative game state for one fishing session

use serde::{Deserialize, Serialize};

use super::fishing::Fish;
use super::resources::FUEL_MAX;

/// Boat position in world units. `z` mirrors depth.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// The single source of truth the renderer reads every frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Heading in degrees, unbounded
    pub rotation: f64,
    pub position: Position,
    /// 0..=100
    pub depth: f64,
    /// 0..=100
    pub fuel: f64,
    /// Append-only, in catch order
    pub inventory: Vec<Fish>,
    /// Always the sum of inventory points
    pub score: u64,
    pub is_fishing: bool,
    /// Cosmetic only, raised briefly after a movement command
    pub is_moving: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            position: Position::default(),
            depth: 0.0,
            fuel: FUEL_MAX,
            inventory: Vec::new(),
            score: 0,
            is_fishing: false,
            is_moving: false,
        }
    }
}

impl GameState {
    /// Add a caught fish and its points
    pub(crate) fn record_catch(&mut self, fish: Fish) {
        self.score += fish.points;
        self.inventory.push(fish);
    }

    pub fn inventory_points(&self) -> u64 {
        self.inventory.iter().map(|f| f.points).sum()
    }
}
