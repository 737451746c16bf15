//! Fuel and depth bounds

pub const FUEL_MAX: f64 = 100.0;
pub const DEPTH_MAX: f64 = 100.0;

/// Values this close to a bound are treated as the bound itself, so repeated
/// fractional costs drain to exactly zero instead of a rounding residue.
const SNAP_EPSILON: f64 = 1e-9;

/// Resource system for the boat's fuel tank and dive depth
pub struct ResourceSystem;

impl ResourceSystem {
    pub fn clamp_fuel(fuel: f64) -> f64 {
        snap(fuel, FUEL_MAX).clamp(0.0, FUEL_MAX)
    }

    pub fn clamp_depth(depth: f64) -> f64 {
        snap(depth, DEPTH_MAX).clamp(0.0, DEPTH_MAX)
    }

    /// Spend fuel, never going below empty
    pub fn consume_fuel(fuel: f64, cost: f64) -> f64 {
        Self::clamp_fuel(fuel - cost)
    }

    /// Regenerate fuel, never going above a full tank
    pub fn regen_fuel(fuel: f64, amount: f64) -> f64 {
        Self::clamp_fuel(fuel + amount)
    }

    pub fn has_fuel(fuel: f64) -> bool {
        fuel > 0.0
    }

    /// Move depth by a signed step, clamped to the water column
    pub fn adjust_depth(depth: f64, delta: f64) -> f64 {
        Self::clamp_depth(depth + delta)
    }
}

fn snap(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else if value.abs() < SNAP_EPSILON {
        0.0
    } else if (value - max).abs() < SNAP_EPSILON {
        max
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_fuel_bounds() {
        assert_eq!(ResourceSystem::clamp_fuel(-5.0), 0.0);
        assert_eq!(ResourceSystem::clamp_fuel(150.0), 100.0);
        assert_eq!(ResourceSystem::clamp_fuel(42.5), 42.5);
        assert_eq!(ResourceSystem::clamp_fuel(f64::NAN), 0.0);
    }

    #[test]
    fn test_clamp_depth_bounds() {
        assert_eq!(ResourceSystem::clamp_depth(-0.1), 0.0);
        assert_eq!(ResourceSystem::clamp_depth(100.1), 100.0);
        assert_eq!(ResourceSystem::adjust_depth(99.0, 3.0), 100.0);
        assert_eq!(ResourceSystem::adjust_depth(2.0, -3.0), 0.0);
    }

    #[test]
    fn test_fractional_costs_drain_to_exact_zero() {
        let mut fuel = FUEL_MAX;
        for _ in 0..500 {
            fuel = ResourceSystem::consume_fuel(fuel, 0.2);
        }
        assert_eq!(fuel, 0.0);
        assert!(!ResourceSystem::has_fuel(fuel));
    }

    #[test]
    fn test_regen_saturates() {
        let mut fuel = 99.5;
        fuel = ResourceSystem::regen_fuel(fuel, 0.3);
        assert!((fuel - 99.8).abs() < 1e-9);
        fuel = ResourceSystem::regen_fuel(fuel, 0.3);
        assert_eq!(fuel, FUEL_MAX);
    }
}
