//! WebSocket upgrade handler

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::app::AppState;
use crate::game::{spawn_session, SessionError, SessionHandle, Tuning};
use crate::http::routes::AppError;
use crate::util::rate_limit::ConnectionRateLimiter;
use crate::util::time::unix_millis;
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// WebSocket upgrade handler. Every connection gets its own session.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let (session, handle) = state
        .sessions
        .create(Tuning::default())
        .map_err(|e| AppError::Unavailable(e.to_string()))?;

    // The session stops (and unregisters) once its handle is dropped,
    // including when the upgrade never completes.
    spawn_session(state.sessions.clone(), session);

    info!(session_id = %handle.id, "WebSocket upgrade for new session");
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, handle)))
}

/// Handle the upgraded WebSocket connection
async fn handle_socket(socket: WebSocket, handle: SessionHandle) {
    let session_id = handle.id;
    info!(session_id = %session_id, "New WebSocket connection");

    let (mut ws_sink, ws_stream) = socket.split();

    // Subscribe before greeting so no early snapshot is missed
    let events_rx = handle.subscribe();

    let welcome = ServerMsg::Welcome {
        session_id,
        seed: handle.seed,
        server_time: unix_millis(),
    };

    if let Err(e) = send_msg(&mut ws_sink, &welcome).await {
        error!(session_id = %session_id, error = %e, "Failed to send welcome");
        return;
    }

    run_session(handle, ws_sink, ws_stream, events_rx).await;

    info!(session_id = %session_id, "WebSocket connection closed");
}

/// Run the WebSocket session with read/write split
async fn run_session(
    handle: SessionHandle,
    mut ws_sink: futures::stream::SplitSink<WebSocket, Message>,
    mut ws_stream: futures::stream::SplitStream<WebSocket>,
    mut events_rx: broadcast::Receiver<ServerMsg>,
) {
    let session_id = handle.id;
    let rate_limiter = ConnectionRateLimiter::new();

    // Spawn writer task: session events -> WebSocket
    let writer_handle = tokio::spawn(async move {
        loop {
            match events_rx.recv().await {
                Ok(msg) => {
                    if let Err(e) = send_msg(&mut ws_sink, &msg).await {
                        debug!(session_id = %session_id, error = %e, "WebSocket send failed");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(
                        session_id = %session_id,
                        lagged_count = n,
                        "Client lagged, skipping {} messages", n
                    );
                    // Continue - the next snapshot carries the full state
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!(session_id = %session_id, "Session channel closed");
                    break;
                }
            }
        }
    });

    // Reader loop: WebSocket -> session
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if let Err(e) = route_text(&handle, &rate_limiter, &text).await {
                    debug!(session_id = %session_id, error = %e, "Session input closed");
                    break;
                }
            }
            Ok(Message::Binary(_)) => {
                warn!(session_id = %session_id, "Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) => {
                debug!(session_id = %session_id, "Received ping");
            }
            Ok(Message::Pong(_)) => {
                debug!(session_id = %session_id, "Received pong");
            }
            Ok(Message::Close(_)) => {
                info!(session_id = %session_id, "Client initiated close");
                break;
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    // Dropping the handle ends the session and releases its timers
    drop(handle);

    // Abort writer task
    writer_handle.abort();
}

/// What the reader did with one inbound text frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Inbound {
    Forwarded,
    Throttled,
    Malformed,
}

/// Parse one text frame and queue it for the session.
/// Only high-frequency messages are subject to the rate limit.
async fn route_text(
    handle: &SessionHandle,
    rate_limiter: &ConnectionRateLimiter,
    text: &str,
) -> Result<Inbound, SessionError> {
    let client_msg = match serde_json::from_str::<ClientMsg>(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!(session_id = %handle.id, error = %e, "Failed to parse client message");
            // Error replies count against the quota
            if rate_limiter.check_input() {
                handle.notify(ServerMsg::Error {
                    code: "bad_message".to_string(),
                    message: e.to_string(),
                });
            }
            return Ok(Inbound::Malformed);
        }
    };

    if client_msg.is_rate_limited() && !rate_limiter.check_input() {
        debug!(session_id = %handle.id, ?client_msg, "Rate limited input message");
        return Ok(Inbound::Throttled);
    }

    handle.send(client_msg).await?;
    Ok(Inbound::Forwarded)
}

/// Send a message over WebSocket
async fn send_msg(
    sink: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMsg,
) -> Result<(), String> {
    let json = serde_json::to_string(msg).map_err(|e| e.to_string())?;
    sink.send(Message::Text(json))
        .await
        .map_err(|e| e.to_string())
}
