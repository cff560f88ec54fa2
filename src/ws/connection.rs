//! Per-connection WebSocket loop.
//!
//! Each connection runs `CONNECTING → OPEN → CLOSED`: the upgrade completes
//! (CONNECTING), the connection registers with the registry and the
//! handshake acknowledgment is queued (OPEN), and close or error from either
//! direction ends the loop and removes the registration exactly once
//! (CLOSED, terminal). A reconnecting client is an entirely new connection.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::domain::Command;
use crate::relay::Relay;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Outbound: frames queued by the registry (ack, snapshot broadcasts) are
///   written to the socket in order.
/// - Inbound: each text frame is parsed independently; a valid command is
///   forwarded to the worker, a malformed frame is dropped and logged
///   without affecting this or any other connection.
pub async fn run_connection(socket: WebSocket, relay: Relay, send_buffer: usize) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel(send_buffer);
    let id = relay.registry().add(outbound_tx).await;

    loop {
        tokio::select! {
            // Frame queued for this client (handshake ack or broadcast)
            frame = outbound_rx.recv() => {
                match frame {
                    Some(frame) => {
                        if ws_tx.send(Message::text(&*frame)).await.is_err() {
                            break;
                        }
                    }
                    // Registry dropped the sender: we were removed.
                    None => break,
                }
            }
            // Incoming message from the client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match Command::parse(&text) {
                            Ok(command) => relay.forward(command),
                            Err(e) => {
                                tracing::warn!(
                                    connection = %id,
                                    error = %e,
                                    raw = %text,
                                    "malformed client frame dropped"
                                );
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::warn!(connection = %id, error = %e, "transport error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    relay.registry().remove(id).await;
    tracing::debug!(connection = %id, "ws connection closed");
}
