//! AuthActor — Tokio actor owning credentials and the current session
//!
//! All operations are processed sequentially via an mpsc channel, so a
//! registration's uniqueness check and insert can never interleave with
//! another registration or login.
//!
//! States are `Anonymous` and `Authenticated`; the initial state is restored
//! from the persisted session at spawn time.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use airdrop_state::auth::AuthActor;
//! use airdrop_state::notify::NotifyActor;
//! use airdrop_state::store::FileStore;
//! use airdrop_state::TrackerConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TrackerConfig::new("/data/tracker");
//!     let store = Arc::new(FileStore::open(&config).await?);
//!     let notify = NotifyActor::spawn(config.notification_capacity, config.channel_capacity);
//!
//!     let handle = AuthActor::spawn(&config, store, notify).await?;
//!
//!     // Register → immediately authenticated
//!     let session = handle.register(
//!         "alice@example.com".into(), "alice".into(), "SecureP@ss1".into(),
//!     ).await?;
//!     assert!(!session.is_admin);
//!
//!     handle.logout().await?;
//!     assert!(handle.current_session().await.is_none());
//!
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::config::{PrivilegedIdentity, TrackerConfig};
use crate::error::{Result, TrackerError};
use crate::notify::{ActionType, Notification, NotifyHandle};
use crate::schema;
use crate::store::{load_json_or_default, save_json, StateStore};

use super::credentials::{CredentialStore, StoredIdentity};
use super::types::*;

/// Id given to the privileged identity when it logs in without registering
pub const PRIVILEGED_SESSION_ID: &str = "admin-1";

// ─── Actor Messages ───

enum AuthMsg {
    Register {
        email: String,
        username: String,
        secret: String,
        reply: oneshot::Sender<Result<Session>>,
    },
    Login {
        email: String,
        secret: String,
        reply: oneshot::Sender<Result<Session>>,
    },
    Logout {
        reply: oneshot::Sender<()>,
    },
    CurrentSession {
        reply: oneshot::Sender<Option<Session>>,
    },
    EmailExists {
        email: String,
        reply: oneshot::Sender<bool>,
    },
    UsernameExists {
        username: String,
        reply: oneshot::Sender<bool>,
    },
}

// ─── Actor ───

/// Session authority — processes auth operations sequentially
pub struct AuthActor {
    store: Arc<dyn StateStore>,
    credentials: CredentialStore,
    session: Option<Session>,
    privileged: PrivilegedIdentity,
    notify: NotifyHandle,
    rx: mpsc::Receiver<AuthMsg>,
}

impl AuthActor {
    /// Load persisted state, spawn the actor and return a handle
    ///
    /// A corrupt identity list is replaced by an empty one, and a corrupt
    /// session blob leaves the actor anonymous; both are logged, neither fails.
    pub async fn spawn(
        config: &TrackerConfig,
        store: Arc<dyn StateStore>,
        notify: NotifyHandle,
    ) -> Result<AuthHandle> {
        let records: Vec<StoredIdentity> = load_json_or_default(store.as_ref(), schema::KEY_USERS).await?;
        let credentials = CredentialStore::from_records(records, config.secret_scheme);

        let session: Option<Session> = load_json_or_default(store.as_ref(), schema::KEY_SESSION).await?;
        if let Some(s) = &session {
            info!(username = %s.username, role = %s.role(), "Session restored");
        }

        let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
        let actor = Self {
            store,
            credentials,
            session,
            privileged: config.privileged.clone(),
            notify,
            rx,
        };

        tokio::spawn(actor.run());
        info!("AuthActor spawned");
        Ok(AuthHandle { tx })
    }

    /// Main event loop
    async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                AuthMsg::Register { email, username, secret, reply } => {
                    let _ = reply.send(self.handle_register(email, username, secret).await);
                }
                AuthMsg::Login { email, secret, reply } => {
                    let _ = reply.send(self.handle_login(email, secret).await);
                }
                AuthMsg::Logout { reply } => {
                    self.handle_logout().await;
                    let _ = reply.send(());
                }
                AuthMsg::CurrentSession { reply } => {
                    let _ = reply.send(self.session.clone());
                }
                AuthMsg::EmailExists { email, reply } => {
                    let _ = reply.send(self.credentials.exists_email(&email));
                }
                AuthMsg::UsernameExists { username, reply } => {
                    let _ = reply.send(self.credentials.exists_username(&username));
                }
            }
        }
        info!("AuthActor stopped");
    }

    // ─── Handler Implementations ───

    async fn handle_register(&mut self, email: String, username: String, secret: String) -> Result<Session> {
        // Validate inputs
        if !email.contains('@') {
            return Err(TrackerError::InvalidInput("Invalid email address".into()));
        }
        if username.trim().is_empty() {
            return Err(TrackerError::InvalidInput("Username must not be empty".into()));
        }
        if secret.is_empty() {
            return Err(TrackerError::InvalidInput("Password must not be empty".into()));
        }

        let identity = match self.credentials.register(&email, &username, &secret, &self.privileged) {
            Ok(identity) => identity,
            Err(e) => {
                debug!(email = %email, username = %username, error = %e, "Registration rejected");
                self.notify
                    .emit(Notification::failure(ActionType::Register, e.to_string(), None, Some(username)))
                    .await;
                return Err(e);
            }
        };

        if let Err(e) = save_json(self.store.as_ref(), schema::KEY_USERS, self.credentials.records()).await {
            self.credentials.rollback(&identity.id);
            warn!(error = %e, "Failed to persist identity list, registration rolled back");
            return Err(e);
        }

        let is_admin = identity.is_video_creator;
        let session = Session::from_identity(identity, is_admin);
        info!(user_id = %session.id, username = %session.username, role = %session.role(), "User registered");

        self.establish(session.clone()).await;
        self.notify
            .emit(Notification::success(
                ActionType::Register,
                Some(session.id.clone()),
                Some(session.username.clone()),
            ))
            .await;
        Ok(session)
    }

    async fn handle_login(&mut self, email: String, secret: String) -> Result<Session> {
        let session = match self.credentials.authenticate(&email, &secret) {
            Some(identity) => {
                let is_admin = self.privileged.matches_pair(&identity.email, &identity.username);
                Session::from_identity(identity, is_admin)
            }
            None if self.privileged.matches_login(&email, &secret) => Session {
                id: PRIVILEGED_SESSION_ID.to_string(),
                email: self.privileged.email.clone(),
                username: self.privileged.username.clone(),
                is_video_creator: true,
                is_admin: true,
            },
            None => {
                debug!(email = %email, "Login failed");
                self.notify
                    .emit(Notification::failure(ActionType::Login, "Invalid credentials", None, None))
                    .await;
                return Err(TrackerError::AuthenticationFailure);
            }
        };

        info!(username = %session.username, role = %session.role(), "Login successful");
        self.establish(session.clone()).await;
        self.notify
            .emit(Notification::success(
                ActionType::Login,
                Some(session.id.clone()),
                Some(session.username.clone()),
            ))
            .await;
        Ok(session)
    }

    async fn handle_logout(&mut self) {
        let previous = self.session.take();
        match self.store.remove(schema::KEY_SESSION).await {
            Ok(_) => info!(username = previous.as_ref().map(|s| s.username.as_str()).unwrap_or("<anonymous>"), "Logged out"),
            Err(e) => warn!(error = %e, "Failed to clear persisted session"),
        }
        self.notify
            .emit(Notification::success(ActionType::Logout, None, previous.map(|s| s.username)))
            .await;
    }

    // ─── Helpers ───

    /// Make `session` current and persist it
    ///
    /// A failed write only costs restart survival, so it is logged, not returned.
    async fn establish(&mut self, session: Session) {
        if let Err(e) = save_json(self.store.as_ref(), schema::KEY_SESSION, &session).await {
            warn!(error = %e, "Failed to persist session");
        }
        self.session = Some(session);
    }
}

// ─── Handle (client-facing API) ───

/// Thread-safe handle to communicate with the AuthActor
#[derive(Clone)]
pub struct AuthHandle {
    tx: mpsc::Sender<AuthMsg>,
}

impl AuthHandle {
    async fn request<T>(&self, msg: AuthMsg, rx: oneshot::Receiver<T>) -> Result<T> {
        self.tx
            .send(msg)
            .await
            .map_err(|_| TrackerError::ActorUnavailable("AuthActor".into()))?;
        rx.await
            .map_err(|_| TrackerError::ActorUnavailable("AuthActor dropped".into()))
    }

    /// Register and authenticate in one step
    pub async fn register(&self, email: String, username: String, secret: String) -> Result<Session> {
        let (reply, rx) = oneshot::channel();
        self.request(AuthMsg::Register { email, username, secret, reply }, rx)
            .await?
    }

    /// Authenticate; the only credential error is [`TrackerError::AuthenticationFailure`]
    pub async fn login(&self, email: String, secret: String) -> Result<Session> {
        let (reply, rx) = oneshot::channel();
        self.request(AuthMsg::Login { email, secret, reply }, rx).await?
    }

    /// Clear the in-memory and persisted session unconditionally
    pub async fn logout(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.request(AuthMsg::Logout { reply }, rx).await
    }

    /// Snapshot of the current session, to pass to gated operations
    pub async fn current_session(&self) -> Option<Session> {
        let (reply, rx) = oneshot::channel();
        self.request(AuthMsg::CurrentSession { reply }, rx)
            .await
            .ok()
            .flatten()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current_session().await.is_some()
    }

    pub async fn email_exists(&self, email: String) -> bool {
        let (reply, rx) = oneshot::channel();
        self.request(AuthMsg::EmailExists { email, reply }, rx)
            .await
            .unwrap_or(false)
    }

    pub async fn username_exists(&self, username: String) -> bool {
        let (reply, rx) = oneshot::channel();
        self.request(AuthMsg::UsernameExists { username, reply }, rx)
            .await
            .unwrap_or(false)
    }
}
