//! WebSocket event streaming: one connection per scan, each event
//! pushed as a JSON frame in emission order.

use crate::state::AppState;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use pagewatch_events::stream;
use tokio_stream::StreamExt;
use tracing::{debug, info};

/// `GET /ws/scan/:scan_id`: upgrade and stream the scan's events for
/// the life of the connection.
pub async fn scan_events_ws(
    ws: WebSocketUpgrade,
    Path(scan_id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, scan_id))
}

async fn handle_socket(mut socket: WebSocket, state: AppState, scan_id: String) {
    info!(scan_id = %scan_id, "websocket connected");
    let mut events = stream::subscribe_scan(&state.bus, &scan_id).await;

    loop {
        tokio::select! {
            event = events.next() => {
                match event {
                    Some(event) => {
                        if socket.send(Message::Text(event.to_json())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(message)) => {
                        debug!(scan_id = %scan_id, "websocket frame received: {message:?}");
                    }
                }
            }
        }
    }

    info!(scan_id = %scan_id, "websocket closed");
}
