//! Fishing simulation modules

pub mod fishing;
pub mod movement;
pub mod resources;
pub mod session;
pub mod simulation;
pub mod snapshot;
pub mod state;
pub mod tuning;

pub use fishing::{Fish, FishingResolver, Rarity, Species};
pub use movement::{Direction, MovementSystem, RotateDirection};
pub use session::{spawn_session, GameSession, SessionError, SessionHandle, SessionRegistry};
pub use simulation::{Command, CommandOutcome, RejectReason, SimEvent, Simulation};
pub use state::{GameState, Position};
pub use tuning::Tuning;
