//! Fishing resolution - catch chance and rarity ladder keyed by depth

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::tuning::Tuning;

/// Rarity tier of a fish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Species that can be caught
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Sardine,
    Tuna,
    Swordfish,
    GoldenShark,
    /// Legendary deep-sea tier, only found below the deep-sea line
    AbyssalFish,
}

/// Immutable catalog entry a caught fish is cloned from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FishTemplate {
    pub species: Species,
    pub name: &'static str,
    pub rarity: Rarity,
    pub points: u64,
    pub icon: &'static str,
}

impl Species {
    pub fn template(self) -> FishTemplate {
        match self {
            Species::Sardine => FishTemplate {
                species: self,
                name: "Sardine",
                rarity: Rarity::Common,
                points: 10,
                icon: "🐟",
            },
            Species::Tuna => FishTemplate {
                species: self,
                name: "Tuna",
                rarity: Rarity::Rare,
                points: 25,
                icon: "🐠",
            },
            Species::Swordfish => FishTemplate {
                species: self,
                name: "Swordfish",
                rarity: Rarity::Epic,
                points: 50,
                icon: "🗡️",
            },
            Species::GoldenShark => FishTemplate {
                species: self,
                name: "Golden Shark",
                rarity: Rarity::Legendary,
                points: 100,
                icon: "🦈",
            },
            Species::AbyssalFish => FishTemplate {
                species: self,
                name: "Abyssal Fish",
                rarity: Rarity::Legendary,
                points: 150,
                icon: "🐙",
            },
        }
    }
}

/// A caught fish held in the inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fish {
    /// Unique within a session, never reused
    pub id: u64,
    pub species: Species,
    pub name: String,
    pub rarity: Rarity,
    pub points: u64,
    pub icon: String,
}

impl FishTemplate {
    /// Clone this template into an inventory fish with a fresh id
    pub fn mint(&self, id: u64) -> Fish {
        Fish {
            id,
            species: self.species,
            name: self.name.to_string(),
            rarity: self.rarity,
            points: self.points,
            icon: self.icon.to_string(),
        }
    }
}

/// Fishing resolver: a weighted lottery skewed by depth
pub struct FishingResolver;

impl FishingResolver {
    /// Draw a catch outcome at the given depth. `None` is a miss.
    pub fn resolve<R: Rng + ?Sized>(depth: f64, rng: &mut R, tuning: &Tuning) -> Option<Species> {
        let catch_roll: f64 = rng.gen();
        if !Self::is_catch(depth, catch_roll, tuning) {
            return None;
        }

        let rarity_roll = rng.gen::<f64>() + tuning.depth_bonus(depth);
        Some(Self::species_for_roll(depth, rarity_roll, tuning))
    }

    /// Whether a uniform catch roll lands a fish at this depth
    pub fn is_catch(depth: f64, catch_roll: f64, tuning: &Tuning) -> bool {
        catch_roll < tuning.base_catch_chance + tuning.depth_bonus(depth)
    }

    /// Map a depth-boosted rarity roll onto the species ladder
    pub fn species_for_roll(depth: f64, rarity_roll: f64, tuning: &Tuning) -> Species {
        if depth > tuning.deep_sea_min_depth && rarity_roll > tuning.epic_below {
            Species::AbyssalFish
        } else if rarity_roll < tuning.common_below {
            Species::Sardine
        } else if rarity_roll < tuning.rare_below {
            Species::Tuna
        } else if rarity_roll < tuning.epic_below {
            Species::Swordfish
        } else {
            Species::GoldenShark
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_catch_threshold() {
        let t = Tuning::default();
        assert!(FishingResolver::is_catch(0.0, 0.39, &t));
        assert!(!FishingResolver::is_catch(0.0, 0.4, &t));
        assert!(FishingResolver::is_catch(30.0, 0.69, &t));
        assert!(!FishingResolver::is_catch(30.0, 0.71, &t));
        // depth 60 pushes the threshold past 1.0
        assert!(FishingResolver::is_catch(60.0, 0.999, &t));
    }

    #[test]
    fn test_rarity_ladder_at_surface() {
        let t = Tuning::default();
        assert_eq!(FishingResolver::species_for_roll(0.0, 0.0, &t), Species::Sardine);
        assert_eq!(FishingResolver::species_for_roll(0.0, 0.39, &t), Species::Sardine);
        assert_eq!(FishingResolver::species_for_roll(0.0, 0.4, &t), Species::Tuna);
        assert_eq!(FishingResolver::species_for_roll(0.0, 0.69, &t), Species::Tuna);
        assert_eq!(FishingResolver::species_for_roll(0.0, 0.7, &t), Species::Swordfish);
        assert_eq!(FishingResolver::species_for_roll(0.0, 0.9, &t), Species::GoldenShark);
        assert_eq!(FishingResolver::species_for_roll(0.0, 1.5, &t), Species::GoldenShark);
    }

    #[test]
    fn test_deep_sea_tier_needs_depth_over_fifty() {
        let t = Tuning::default();
        assert_eq!(FishingResolver::species_for_roll(50.0, 1.2, &t), Species::GoldenShark);
        assert_eq!(FishingResolver::species_for_roll(51.0, 1.2, &t), Species::AbyssalFish);
        assert_eq!(FishingResolver::species_for_roll(51.0, 0.9, &t), Species::GoldenShark);
        assert_eq!(FishingResolver::species_for_roll(80.0, 0.5, &t), Species::Tuna);
    }

    #[test]
    fn test_templates_match_rarity_points() {
        assert_eq!(Species::Sardine.template().points, 10);
        assert_eq!(Species::Tuna.template().rarity, Rarity::Rare);
        assert_eq!(Species::Swordfish.template().points, 50);
        assert_eq!(Species::GoldenShark.template().rarity, Rarity::Legendary);
        let abyssal = Species::AbyssalFish.template();
        assert_eq!((abyssal.rarity, abyssal.points), (Rarity::Legendary, 150));

        let fish = abyssal.mint(7);
        assert_eq!(fish.id, 7);
        assert_eq!(fish.name, "Abyssal Fish");
    }

    #[test]
    fn test_depth_skews_catch_rate_and_rarity() {
        const SAMPLES: usize = 20_000;
        let t = Tuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0xF154);

        let mut tally = |depth: f64| {
            let mut caught = 0usize;
            let mut legendary = 0usize;
            for _ in 0..SAMPLES {
                if let Some(species) = FishingResolver::resolve(depth, &mut rng, &t) {
                    caught += 1;
                    if species.template().rarity == Rarity::Legendary {
                        legendary += 1;
                    }
                }
            }
            (
                caught as f64 / SAMPLES as f64,
                legendary as f64 / SAMPLES as f64,
            )
        };

        let (shallow_catch, shallow_legendary) = tally(0.0);
        let (deep_catch, deep_legendary) = tally(100.0);

        // Surface: 40% catch, 10% of catches legendary
        assert!((shallow_catch - 0.4).abs() < 0.02, "shallow catch {shallow_catch}");
        assert!((shallow_legendary - 0.04).abs() < 0.01, "shallow legendary {shallow_legendary}");
        // Full depth: the bonus saturates both rolls
        assert_eq!(deep_catch, 1.0);
        assert_eq!(deep_legendary, 1.0);
        assert!(deep_catch > shallow_catch);
        assert!(deep_legendary > shallow_legendary);
    }

    #[test]
    fn test_full_depth_always_lands_abyssal() {
        let t = Tuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..500 {
            assert_eq!(
                FishingResolver::resolve(100.0, &mut rng, &t),
                Some(Species::AbyssalFish)
            );
        }
    }

    #[test]
    fn test_same_seed_same_outcomes() {
        let t = Tuning::default();
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        for depth in [0.0, 12.0, 45.0, 70.0] {
            assert_eq!(
                FishingResolver::resolve(depth, &mut a, &t),
                FishingResolver::resolve(depth, &mut b, &t)
            );
        }
    }
}
