//! Dashboard notification fan-out
//!
//! Every open dashboard connection registers a bounded queue here.
//! Broadcasting is fire-and-forget: a connection whose queue is full or
//! closed misses the message, and closed connections are pruned by their
//! own close handler.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc::{self, Receiver, Sender};
use uuid::Uuid;

/// User-facing toast attached to an `update` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notify {
    /// "success", "info" or "error"
    pub status: String,
    pub message: String,
}

impl Notify {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

/// Message pushed to dashboards
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Notification {
    /// Handshake acknowledgement sent on join
    Connected {
        #[serde(rename = "clientId")]
        client_id: Uuid,
    },
    /// Something changed; dashboards re-fetch
    Update {
        #[serde(skip_serializing_if = "Option::is_none")]
        notify: Option<Notify>,
    },
    /// Forwarded log line
    Log {
        level: String,
        target: String,
        message: String,
        timestamp: DateTime<Utc>,
    },
}

impl Notification {
    pub fn update(message: impl Into<String>) -> Self {
        Notification::Update {
            notify: Some(Notify::success(message)),
        }
    }
}

/// Messages held for one connection before further ones are dropped
pub const CONNECTION_QUEUE_CAPACITY: usize = 64;

type Clients = HashMap<Uuid, Sender<String>>;

#[derive(Clone, Default)]
pub struct NotificationHub {
    clients: Arc<RwLock<Clients>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection. The `connected` handshake is already queued on
    /// the returned receiver.
    pub fn add(&self) -> (Uuid, Receiver<String>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(CONNECTION_QUEUE_CAPACITY);
        if let Ok(handshake) = serde_json::to_string(&Notification::Connected { client_id: id }) {
            let _ = tx.try_send(handshake);
        }
        self.clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, tx);
        (id, rx)
    }

    pub fn remove(&self, id: Uuid) {
        self.clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    pub fn connection_count(&self) -> usize {
        self.clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Push `notification` to every open connection without waiting.
    /// Returns how many connections accepted it; a stalled one is skipped.
    pub fn broadcast(&self, notification: &Notification) -> usize {
        let Ok(payload) = serde_json::to_string(notification) else {
            return 0;
        };
        let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);
        clients
            .values()
            .filter(|tx| tx.try_send(payload.clone()).is_ok())
            .count()
    }

    /// Broadcast an `update` with a success toast
    pub fn notify_update(&self, message: impl Into<String>) -> usize {
        self.broadcast(&Notification::update(message))
    }
}
