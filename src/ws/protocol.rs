//! WebSocket protocol message definitions
//! These are the wire types between the browser front-end and the simulation

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::{Command, Direction, Fish, GameState, RotateDirection};

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// One discrete movement step
    Move { direction: Direction },

    /// One discrete heading step
    Rotate { direction: RotateDirection },

    /// Key pressed (`held = true`) or released; held keys move every tick
    Hold { direction: Direction, held: bool },

    /// Raw horizontal pointer movement while mouse look is active
    Look { delta_x: f64 },

    /// Cast the line
    Fish,

    /// Ping for latency measurement
    Ping {
        /// Client timestamp
        t: u64,
    },
}

impl ClientMsg {
    /// Simulation command carried by this message, if any
    pub fn command(&self) -> Option<Command> {
        match *self {
            ClientMsg::Move { direction } => Some(Command::Move(direction)),
            ClientMsg::Rotate { direction } => Some(Command::Rotate(direction)),
            ClientMsg::Hold { direction, held } => Some(Command::Hold { direction, held }),
            ClientMsg::Look { delta_x } => Some(Command::Look { delta_x }),
            ClientMsg::Fish => Some(Command::Fish),
            ClientMsg::Ping { .. } => None,
        }
    }

    /// Whether this message counts against the per-connection input quota.
    /// Key presses, releases and casts are always delivered so a held key
    /// can never outlive its release.
    pub fn is_rate_limited(&self) -> bool {
        !matches!(self, ClientMsg::Hold { .. } | ClientMsg::Fish)
    }
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Welcome message after connection
    Welcome {
        session_id: Uuid,
        /// Seed of the session's catch generator
        seed: u64,
        server_time: u64,
    },

    /// Game state snapshot (sent at regular intervals)
    Snapshot {
        /// Simulation tick number
        tick: u64,
        state: GameState,
    },

    /// Line is in the water
    FishingStarted { duration_ms: f64 },

    /// Attempt ended with a catch
    FishCaught { fish: Fish },

    /// Attempt ended empty-handed
    FishMissed,

    /// Pong response
    Pong {
        /// Echo back client timestamp
        t: u64,
    },

    /// Error message
    Error { code: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_client_messages() {
        let msg: ClientMsg = serde_json::from_str(r#"{"type":"move","direction":"dive"}"#).unwrap();
        assert_eq!(msg.command(), Some(Command::Move(Direction::Dive)));

        let msg: ClientMsg =
            serde_json::from_str(r#"{"type":"hold","direction":"forward","held":true}"#).unwrap();
        assert_eq!(
            msg.command(),
            Some(Command::Hold {
                direction: Direction::Forward,
                held: true
            })
        );

        let msg: ClientMsg = serde_json::from_str(r#"{"type":"rotate","direction":"left"}"#).unwrap();
        assert_eq!(msg.command(), Some(Command::Rotate(RotateDirection::Left)));

        let msg: ClientMsg = serde_json::from_str(r#"{"type":"fish"}"#).unwrap();
        assert_eq!(msg.command(), Some(Command::Fish));

        let msg: ClientMsg = serde_json::from_str(r#"{"type":"ping","t":5}"#).unwrap();
        assert_eq!(msg.command(), None);
    }

    #[test]
    fn test_only_high_frequency_messages_are_rate_limited() {
        let release = ClientMsg::Hold {
            direction: Direction::Left,
            held: false,
        };
        assert!(!release.is_rate_limited());
        assert!(!ClientMsg::Fish.is_rate_limited());
        assert!(ClientMsg::Look { delta_x: 4.0 }.is_rate_limited());
        assert!(ClientMsg::Move {
            direction: Direction::Forward
        }
        .is_rate_limited());
        assert!(ClientMsg::Ping { t: 1 }.is_rate_limited());
    }

    #[test]
    fn test_unknown_direction_is_rejected() {
        assert!(serde_json::from_str::<ClientMsg>(r#"{"type":"move","direction":"up"}"#).is_err());
    }

    #[test]
    fn test_server_message_shape() {
        let json = serde_json::to_value(ServerMsg::Snapshot {
            tick: 3,
            state: GameState::default(),
        })
        .unwrap();
        assert_eq!(json["type"], "snapshot");
        assert_eq!(json["state"]["fuel"], 100.0);
        assert_eq!(json["state"]["is_fishing"], false);

        let json = serde_json::to_value(ServerMsg::FishMissed).unwrap();
        assert_eq!(json["type"], "fish_missed");
    }
}
