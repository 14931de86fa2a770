//! NotifyActor — outcome reports for auth and catalog operations
//!
//! Notifications are fire-and-forget: emitters get no reply, but `emit` waits
//! for mailbox space when the sink's channel is full, so nothing is dropped.
//! The actor keeps a bounded ring of recent entries for queries and fans
//! every entry out to live subscribers.
//!
//! # Usage
//!
//! ```rust,no_run
//! use airdrop_state::notify::{ActionType, Notification, NotifyActor};
//!
//! #[tokio::main]
//! async fn main() {
//!     let handle = NotifyActor::spawn(256, 256);
//!     let mut live = handle.subscribe();
//!
//!     handle
//!         .emit(Notification::success(ActionType::RankingAdded, Some("ranking-1".into()), None))
//!         .await;
//!
//!     let first = live.recv().await.unwrap();
//!     assert_eq!(first.title, "Ranking added");
//! }
//! ```

use std::collections::VecDeque;

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};

use super::types::*;

// ─── Messages ───

enum NotifyMsg {
    Emit(Notification),
    Recent {
        limit: usize,
        reply: oneshot::Sender<Vec<Notification>>,
    },
    ByActor {
        username: String,
        limit: usize,
        reply: oneshot::Sender<Vec<Notification>>,
    },
}

// ─── Actor ───

/// Notification sink with a bounded history
pub struct NotifyActor {
    recent: VecDeque<Notification>,
    capacity: usize,
    live: broadcast::Sender<Notification>,
    rx: mpsc::Receiver<NotifyMsg>,
}

impl NotifyActor {
    /// Spawn the sink, retaining at most `capacity` notifications
    pub fn spawn(capacity: usize, channel_capacity: usize) -> NotifyHandle {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(channel_capacity.max(1));
        let (live, _) = broadcast::channel(capacity);
        let actor = Self {
            recent: VecDeque::with_capacity(capacity),
            capacity,
            live: live.clone(),
            rx,
        };
        tokio::spawn(actor.run());
        info!("NotifyActor spawned");
        NotifyHandle { tx, live }
    }

    async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                NotifyMsg::Emit(notification) => self.handle_emit(notification),
                NotifyMsg::Recent { limit, reply } => {
                    let _ = reply.send(self.handle_recent(limit, |_| true));
                }
                NotifyMsg::ByActor { username, limit, reply } => {
                    let _ = reply.send(
                        self.handle_recent(limit, |n| n.actor.as_deref() == Some(username.as_str())),
                    );
                }
            }
        }
        info!("NotifyActor stopped");
    }

    fn handle_emit(&mut self, notification: Notification) {
        debug!(
            action = %notification.action,
            kind = ?notification.kind,
            resource = notification.resource.as_deref().unwrap_or(""),
            "Notification"
        );
        if self.recent.len() == self.capacity {
            self.recent.pop_front();
        }
        self.recent.push_back(notification.clone());
        // No subscribers is fine
        let _ = self.live.send(notification);
    }

    /// Newest first
    fn handle_recent(&self, limit: usize, keep: impl Fn(&Notification) -> bool) -> Vec<Notification> {
        self.recent
            .iter()
            .rev()
            .filter(|n| keep(n))
            .take(limit)
            .cloned()
            .collect()
    }
}

// ─── Handle ───

/// Thread-safe handle to the NotifyActor
#[derive(Clone)]
pub struct NotifyHandle {
    tx: mpsc::Sender<NotifyMsg>,
    live: broadcast::Sender<Notification>,
}

impl NotifyHandle {
    /// Report an outcome; waits only while the mailbox is full
    pub async fn emit(&self, notification: Notification) {
        let _ = self.tx.send(NotifyMsg::Emit(notification)).await;
    }

    /// Receive every notification emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.live.subscribe()
    }

    /// Most recent notifications, newest first
    pub async fn recent(&self, limit: usize) -> Vec<Notification> {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(NotifyMsg::Recent { limit, reply }).await.is_err() {
            return vec![];
        }
        rx.await.unwrap_or_default()
    }

    /// Most recent notifications caused by `username`, newest first
    pub async fn recent_for(&self, username: String, limit: usize) -> Vec<Notification> {
        let (reply, rx) = oneshot::channel();
        if self
            .tx
            .send(NotifyMsg::ByActor { username, limit, reply })
            .await
            .is_err()
        {
            return vec![];
        }
        rx.await.unwrap_or_default()
    }
}
