//! Tracker — wires the store, actors and gate together

use std::sync::Arc;

use tracing::info;

use crate::auth::{AccessGate, AuthActor, AuthHandle, MembershipCheck, MembershipValidator, StubMembershipValidator};
use crate::catalog::{CatalogActor, CatalogHandle, CatalogLookup};
use crate::config::TrackerConfig;
use crate::error::Result;
use crate::notify::{NotifyActor, NotifyHandle};
use crate::store::{FileStore, StateStore};

/// Running client state: session authority, catalog context and notification sink
#[derive(Clone)]
pub struct Tracker {
    pub auth: AuthHandle,
    pub catalog: CatalogHandle,
    pub notifications: NotifyHandle,
    pub gate: AccessGate,
    membership: Arc<dyn MembershipValidator>,
}

impl Tracker {
    /// Open with a [`FileStore`] under `config.base_path`
    pub async fn open(config: TrackerConfig, catalog: Arc<dyn CatalogLookup>) -> Result<Self> {
        let store = Arc::new(FileStore::open(&config).await?);
        Self::open_with_store(config, store, catalog).await
    }

    /// Open over any [`StateStore`]
    pub async fn open_with_store(
        config: TrackerConfig,
        store: Arc<dyn StateStore>,
        catalog: Arc<dyn CatalogLookup>,
    ) -> Result<Self> {
        let notifications = NotifyActor::spawn(config.notification_capacity, config.channel_capacity);
        let gate = AccessGate::new(config.privileged.clone());

        let auth = AuthActor::spawn(&config, store.clone(), notifications.clone()).await?;
        let catalog = CatalogActor::spawn(&config, store, catalog, gate.clone(), notifications.clone()).await?;

        info!(path = %config.base_path.display(), "Tracker ready");
        Ok(Self {
            auth,
            catalog,
            notifications,
            gate,
            membership: Arc::new(StubMembershipValidator::new(config.membership_delay)),
        })
    }

    /// Replace the membership validator
    pub fn with_membership_validator(mut self, validator: Arc<dyn MembershipValidator>) -> Self {
        self.membership = validator;
        self
    }

    /// Start a cancellable membership check for `username`
    pub fn check_membership(&self, username: impl Into<String>) -> MembershipCheck {
        MembershipCheck::spawn(self.membership.clone(), username)
    }

    /// Whether the current session may mutate the catalog
    pub async fn is_admin(&self) -> bool {
        let session = self.auth.current_session().await;
        self.gate.is_admin(session.as_ref())
    }
}
