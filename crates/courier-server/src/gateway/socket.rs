//! Socket lifecycle
//!
//! Handshake (token validated before the upgrade is accepted), the
//! reader task (one per socket, drives the dispatcher), the writer task
//! (sole writer to the sink, drains the bounded channel), and cleanup.

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use super::connection::Connection;
use super::handlers::FrameDispatcher;
use super::protocol::{CloseCode, ServerFrame};
use super::replay;
use crate::response::ApiError;
use crate::state::AppState;

/// Handshake query parameters. The token travels as a query param
/// because browsers cannot set custom headers on WebSocket upgrades.
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    token: String,
}

/// `GET /ws?token=...` — validate, then upgrade. An invalid token gets
/// HTTP 401, never an accepted socket.
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(query): Query<ConnectQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let claims = state
        .services()
        .jwt_service()
        .verify_access_token(&query.token)?;

    Ok(ws.on_upgrade(move |socket| handle_socket(state, socket, claims)))
}

async fn handle_socket(state: AppState, socket: WebSocket, claims: courier_common::AccessClaims) {
    let (tx, rx) = mpsc::channel::<ServerFrame>(state.config().gateway.outbound_buffer);
    let conn = Connection::new(claims.user_id, claims.username.clone(), claims.exp, tx);

    // Eviction of older sockets happens inside register; the evicted
    // tasks observe their close signal and shut themselves down
    state.registry().register(conn.clone());

    if let Err(e) = state
        .services()
        .presence_store()
        .set_online(conn.user_id())
        .await
    {
        tracing::warn!(user_id = %conn.user_id(), error = %e, "Failed to set presence on connect");
    }

    tracing::info!(
        user_id = %conn.user_id(),
        connection_id = %conn.id(),
        "WebSocket connection established"
    );

    let (ws_sink, ws_stream) = socket.split();
    let writer = tokio::spawn(write_loop(ws_sink, rx, conn.clone()));

    // Drain the offline queue before the first inbound frame is read
    if let Err(e) = replay::replay_offline(&state, &conn).await {
        tracing::warn!(user_id = %conn.user_id(), error = %e, "Offline replay failed");
    }

    read_loop(&state, &conn, ws_stream).await;

    // Cleanup: the writer exits after sending the close frame
    conn.request_close(CloseCode::Normal);
    let _ = writer.await;

    let last_socket = state.registry().unregister(&conn);
    if last_socket {
        if let Err(e) = state
            .services()
            .presence_store()
            .set_offline(conn.user_id())
            .await
        {
            tracing::warn!(user_id = %conn.user_id(), error = %e, "Failed to clear presence");
        }
    }

    tracing::info!(
        user_id = %conn.user_id(),
        connection_id = %conn.id(),
        "WebSocket connection closed"
    );
}

/// Read frames until the client goes away, the idle timeout fires, or a
/// close is requested (eviction, backpressure, auth expiry)
async fn read_loop(state: &AppState, conn: &Arc<Connection>, mut stream: SplitStream<WebSocket>) {
    let mut close_rx = conn.subscribe_close();
    let idle_timeout = Duration::from_secs(state.config().gateway.idle_timeout_secs);

    loop {
        tokio::select! {
            _ = close_rx.changed() => break,

            next = tokio::time::timeout(idle_timeout, stream.next()) => match next {
                Err(_) => {
                    tracing::info!(
                        user_id = %conn.user_id(),
                        connection_id = %conn.id(),
                        "Socket idle, closing"
                    );
                    conn.request_close(CloseCode::Normal);
                    break;
                }
                Ok(None) | Ok(Some(Err(_))) => break,
                Ok(Some(Ok(Message::Text(text)))) => {
                    if let Some(code) = FrameDispatcher::dispatch(state, conn, &text).await {
                        conn.request_close(code);
                        break;
                    }
                }
                Ok(Some(Ok(Message::Close(_)))) => break,
                Ok(Some(Ok(Message::Binary(_)))) => {
                    let _ = conn
                        .send(ServerFrame::error(
                            "PARSE_ERROR",
                            "binary frames are not supported",
                        ))
                        .await;
                }
                // Transport pings are answered by axum
                Ok(Some(Ok(_))) => {}
            },
        }
    }
}

/// Sole writer to the sink. Drains the channel; on a close request it
/// flushes what is already queued, sends the close frame and exits.
async fn write_loop(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<ServerFrame>,
    conn: Arc<Connection>,
) {
    let mut close_rx = conn.subscribe_close();

    loop {
        tokio::select! {
            maybe = rx.recv() => match maybe {
                Some(frame) => {
                    if !send_frame(&mut sink, &frame).await {
                        break;
                    }
                }
                None => break,
            },

            changed = close_rx.changed() => {
                let code = if changed.is_ok() {
                    close_rx.borrow().unwrap_or(CloseCode::Normal)
                } else {
                    CloseCode::Normal
                };

                // Drain already-queued frames before closing
                while let Ok(frame) = rx.try_recv() {
                    if !send_frame(&mut sink, &frame).await {
                        break;
                    }
                }

                let _ = sink
                    .send(Message::Close(Some(CloseFrame {
                        code: code.as_u16(),
                        reason: code.reason().into(),
                    })))
                    .await;
                break;
            }
        }
    }

    let _ = sink.close().await;
}

async fn send_frame(sink: &mut SplitSink<WebSocket, Message>, frame: &ServerFrame) -> bool {
    match frame.to_json() {
        Ok(json) => sink.send(Message::Text(json)).await.is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize outbound frame");
            true
        }
    }
}
