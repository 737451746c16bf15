//! Simulation tuning constants

use crate::util::time::SIMULATION_TICK_MS;

/// Every gameplay constant in one place. Clients cannot change these.
#[derive(Debug, Clone, Copy)]
pub struct Tuning {
    /// Length of one authoritative tick (also the held-input poll period)
    pub tick_ms: u64,

    /// Distance covered by a single movement command
    pub move_speed: f64,
    /// Heading change per rotate command (degrees)
    pub rotation_step: f64,
    /// Degrees of heading per unit of pointer movement
    pub look_sensitivity: f64,
    /// Depth change per dive/surface command
    pub depth_step: f64,

    /// Fuel spent by every accepted movement or rotate command
    pub fuel_cost_per_move: f64,
    /// Fuel restored per regeneration interval
    pub fuel_regen_amount: f64,
    pub fuel_regen_interval_ms: u64,

    /// How long `is_moving` stays raised after a movement command
    pub moving_window_ms: u64,

    /// Fishing duration = base + depth * per_depth
    pub fishing_base_ms: f64,
    pub fishing_ms_per_depth: f64,

    /// Catch probability at the surface
    pub base_catch_chance: f64,
    /// Added to both catch chance and rarity roll per unit of depth
    pub depth_bonus_per_unit: f64,
    /// Deep-sea fish only bite strictly below this depth
    pub deep_sea_min_depth: f64,
    pub common_below: f64,
    pub rare_below: f64,
    pub epic_below: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_ms: SIMULATION_TICK_MS,
            move_speed: 3.0,
            rotation_step: 3.0,
            look_sensitivity: 0.3,
            depth_step: 3.0,
            fuel_cost_per_move: 0.2,
            fuel_regen_amount: 0.3,
            fuel_regen_interval_ms: 1000,
            moving_window_ms: 100,
            fishing_base_ms: 1500.0,
            fishing_ms_per_depth: 10.0,
            base_catch_chance: 0.4,
            depth_bonus_per_unit: 0.01,
            deep_sea_min_depth: 50.0,
            common_below: 0.4,
            rare_below: 0.7,
            epic_below: 0.9,
        }
    }
}

impl Tuning {
    /// Bonus applied to catch and rarity rolls at the given depth
    pub fn depth_bonus(&self, depth: f64) -> f64 {
        depth * self.depth_bonus_per_unit
    }

    /// Time a fishing attempt takes at the given depth
    pub fn fishing_duration_ms(&self, depth: f64) -> f64 {
        self.fishing_base_ms + depth * self.fishing_ms_per_depth
    }
}
