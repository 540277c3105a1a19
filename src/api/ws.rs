//! WebSocket join point for dashboard notifications

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::user::UserClaims,
    services::notifications::NotificationHub,
};

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// JWT; browsers cannot set headers on a WebSocket upgrade
    pub token: Option<String>,
}

/// Upgrade to a WebSocket receiving `connected`, `update` and `log` messages
pub async fn updates(
    State(state): State<crate::AppState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> AppResult<Response> {
    let token = query
        .token
        .ok_or_else(|| AppError::Authentication("Missing token".to_string()))?;
    let claims = UserClaims::from_token(&token, &state.config.auth.jwt_secret)
        .map_err(|e| AppError::Authentication(e.to_string()))?;

    let hub = state.services.notifications.clone();
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, hub, claims)))
}

async fn handle_socket(socket: WebSocket, hub: NotificationHub, claims: UserClaims) {
    let (client_id, mut rx) = hub.add();
    tracing::debug!(%client_id, user_id = claims.user_id, role = %claims.role, "Dashboard connected");

    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Dashboards do not send anything meaningful; drain until close
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            if matches!(message, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    hub.remove(client_id);
    tracing::debug!(%client_id, "Dashboard disconnected");
}
