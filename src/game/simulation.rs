//! Deterministic fishing state machine
//!
//! `Idle` accepts movement, rotation and fishing. `Fishing` blocks every
//! movement-class command until its timer elapses. `is_moving` is a cosmetic
//! overlay on `Idle`. All timers advance only through [`Simulation::tick`], so
//! a seed plus a command/tick sequence replays exactly.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;

use super::fishing::{Fish, FishingResolver};
use super::movement::{Direction, MovementSystem, RotateDirection};
use super::resources::ResourceSystem;
use super::state::GameState;
use super::tuning::Tuning;

/// Intent commands the input router can issue
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Move(Direction),
    Rotate(RotateDirection),
    /// Key held down or released; held directions are re-issued every tick
    Hold { direction: Direction, held: bool },
    /// Raw pointer movement, applied straight to the heading
    Look { delta_x: f64 },
    Fish,
}

/// Why a command did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Fishing,
    OutOfFuel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Accepted,
    Rejected(RejectReason),
}

impl CommandOutcome {
    pub fn is_accepted(self) -> bool {
        matches!(self, CommandOutcome::Accepted)
    }
}

/// Results committed by a tick
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    FishCaught { fish: Fish },
    FishMissed,
}

/// An in-flight catch attempt
#[derive(Debug, Clone, Copy)]
struct FishingAttempt {
    /// Depth when the line went in
    depth: f64,
    remaining_ms: f64,
}

pub struct Simulation {
    state: GameState,
    tuning: Tuning,
    seed: u64,
    rng: ChaCha8Rng,
    tick: u64,
    next_fish_id: u64,
    fishing: Option<FishingAttempt>,
    moving_remaining_ms: u64,
    regen_elapsed_ms: u64,
    held: BTreeSet<Direction>,
}

impl Simulation {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            state: GameState::default(),
            tuning,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick: 0,
            next_fish_id: 1,
            fishing: None,
            moving_remaining_ms: 0,
            regen_elapsed_ms: 0,
            held: BTreeSet::new(),
        }
    }

    /// Latest committed state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Time left on the current catch attempt, if any
    pub fn fishing_remaining_ms(&self) -> Option<f64> {
        self.fishing.map(|a| a.remaining_ms)
    }

    /// Dispatch one command. Illegal commands are silent no-ops.
    pub fn apply(&mut self, command: Command) -> CommandOutcome {
        match command {
            Command::Move(direction) => self.apply_move(direction),
            Command::Rotate(direction) => self.apply_rotate(direction),
            Command::Hold { direction, held } => {
                if held {
                    self.held.insert(direction);
                } else {
                    self.held.remove(&direction);
                }
                CommandOutcome::Accepted
            }
            Command::Look { delta_x } => {
                self.state.rotation =
                    MovementSystem::look(self.state.rotation, delta_x, &self.tuning);
                CommandOutcome::Accepted
            }
            Command::Fish => self.start_fishing(),
        }
    }

    /// Advance every timer by one tick and return the outcomes it committed
    pub fn tick(&mut self) -> Vec<SimEvent> {
        let mut events = Vec::new();
        let dt = self.tuning.tick_ms;
        self.tick += 1;

        // 1. Fishing timer
        if let Some(attempt) = self.fishing.as_mut() {
            attempt.remaining_ms -= dt as f64;
            if attempt.remaining_ms <= 0.0 {
                let depth = attempt.depth;
                self.fishing = None;
                events.push(self.finish_fishing(depth));
            }
        }

        // 2. Fuel regeneration, unconditional
        self.regen_elapsed_ms += dt;
        let interval = self.tuning.fuel_regen_interval_ms.max(1);
        while self.regen_elapsed_ms >= interval {
            self.regen_elapsed_ms -= interval;
            self.state.fuel =
                ResourceSystem::regen_fuel(self.state.fuel, self.tuning.fuel_regen_amount);
        }

        // 3. Cosmetic window
        if self.state.is_moving {
            self.moving_remaining_ms = self.moving_remaining_ms.saturating_sub(dt);
            if self.moving_remaining_ms == 0 {
                self.state.is_moving = false;
            }
        }

        // 4. Held-input poll
        let held: Vec<Direction> = Direction::POLL_ORDER
            .into_iter()
            .filter(|d| self.held.contains(d))
            .collect();
        for direction in held {
            self.apply_move(direction);
        }

        events
    }

    fn movement_guard(&self) -> Option<RejectReason> {
        if self.state.is_fishing {
            Some(RejectReason::Fishing)
        } else if !ResourceSystem::has_fuel(self.state.fuel) {
            Some(RejectReason::OutOfFuel)
        } else {
            None
        }
    }

    fn apply_move(&mut self, direction: Direction) -> CommandOutcome {
        if let Some(reason) = self.movement_guard() {
            return CommandOutcome::Rejected(reason);
        }

        let delta = MovementSystem::delta(self.state.rotation, direction, &self.tuning);
        self.state.position.x += delta.dx;
        self.state.position.y += delta.dy;
        if delta.depth != 0.0 {
            self.state.depth = ResourceSystem::adjust_depth(self.state.depth, delta.depth);
            self.state.position.z = self.state.depth;
        }

        self.spend_move();
        CommandOutcome::Accepted
    }

    fn apply_rotate(&mut self, direction: RotateDirection) -> CommandOutcome {
        if let Some(reason) = self.movement_guard() {
            return CommandOutcome::Rejected(reason);
        }

        self.state.rotation = MovementSystem::rotate(self.state.rotation, direction, &self.tuning);
        self.spend_move();
        CommandOutcome::Accepted
    }

    fn spend_move(&mut self) {
        self.state.fuel =
            ResourceSystem::consume_fuel(self.state.fuel, self.tuning.fuel_cost_per_move);
        self.state.is_moving = true;
        self.moving_remaining_ms = self.tuning.moving_window_ms;
    }

    fn start_fishing(&mut self) -> CommandOutcome {
        if self.state.is_fishing {
            return CommandOutcome::Rejected(RejectReason::Fishing);
        }

        let depth = self.state.depth;
        self.fishing = Some(FishingAttempt {
            depth,
            remaining_ms: self.tuning.fishing_duration_ms(depth),
        });
        self.state.is_fishing = true;
        CommandOutcome::Accepted
    }

    fn finish_fishing(&mut self, depth: f64) -> SimEvent {
        self.state.is_fishing = false;

        match FishingResolver::resolve(depth, &mut self.rng, &self.tuning) {
            Some(species) => {
                let fish = species.template().mint(self.next_fish_id);
                self.next_fish_id += 1;
                self.state.record_catch(fish.clone());
                SimEvent::FishCaught { fish }
            }
            None => SimEvent::FishMissed,
        }
    }
}
