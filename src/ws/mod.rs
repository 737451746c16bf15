//! WebSocket transport for the browser front-end

pub mod handler;
pub mod protocol;
