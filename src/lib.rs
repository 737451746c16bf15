//! Fishing Sim Server - authoritative simulation for the ocean fishing toy
//!
//! The browser front-end renders the ocean and forwards input; this crate owns
//! the game state, the fuel economy, boat movement and catch resolution.

pub mod app;
pub mod config;
pub mod game;
pub mod http;
pub mod util;
pub mod ws;
