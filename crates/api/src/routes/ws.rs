use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use common::DashboardSnapshot;

use crate::AppState;

pub fn ws_router() -> Router<AppState> {
    Router::new().route("/ws/snapshots", get(ws_snapshots_handler))
}

/// Streams a JSON `DashboardSnapshot` after every engine state change.
async fn ws_snapshots_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    // Subscribe before reading the current snapshot so nothing is missed
    let rx = state.engine.subscribe();
    let current = state.engine.snapshot().await;
    ws.on_upgrade(move |socket| handle_ws(socket, current, rx))
}

async fn handle_ws(
    socket: WebSocket,
    current: DashboardSnapshot,
    mut rx: broadcast::Receiver<DashboardSnapshot>,
) {
    let (mut sink, mut stream) = socket.split();

    if send_snapshot(&mut sink, &current).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            update = rx.recv() => match update {
                Ok(snapshot) => {
                    if send_snapshot(&mut sink, &snapshot).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(n)) => {
                    warn!(dropped = n, "WebSocket snapshot client lagged");
                }
                Err(RecvError::Closed) => break,
            },

            incoming = stream.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => {
                    debug!("WebSocket client disconnected");
                    break;
                }
                Some(Err(e)) => {
                    debug!(error = %e, "WebSocket receive error");
                    break;
                }
                Some(Ok(_)) => {}
            },
        }
    }
}

async fn send_snapshot<S>(sink: &mut S, snapshot: &DashboardSnapshot) -> Result<(), ()>
where
    S: SinkExt<Message> + Unpin,
{
    let text = match serde_json::to_string(snapshot) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Failed to serialize snapshot");
            return Ok(());
        }
    };
    sink.send(Message::Text(text)).await.map_err(|_| ())
}
