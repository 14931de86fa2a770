//! CatalogActor — owner of the ranking and event collections
//!
//! Reads are open to everyone. Every mutation takes the caller's session
//! explicitly and is refused unless the [`AccessGate`] says admin. Each
//! outcome (success, failure, forbidden) is reported to the notification sink,
//! and every applied write is persisted before the reply is sent.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use airdrop_state::auth::AccessGate;
//! use airdrop_state::catalog::{CatalogActor, PotentialValue, RankingDraft, StaticCatalog};
//! use airdrop_state::notify::NotifyActor;
//! use airdrop_state::store::MemoryStore;
//! use airdrop_state::{Session, TrackerConfig};
//!
//! # async fn example(admin: Session) -> airdrop_state::Result<()> {
//! let config = TrackerConfig::new("/data/tracker");
//! let notify = NotifyActor::spawn(64, 64);
//! let handle = CatalogActor::spawn(
//!     &config,
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(StaticCatalog::default()),
//!     AccessGate::new(config.privileged.clone()),
//!     notify,
//! ).await?;
//!
//! let added = handle
//!     .add_ranking(Some(&admin), RankingDraft::new("zksync", PotentialValue::High).with_rank(1))
//!     .await?;
//! handle.toggle_pin(Some(&admin), added.id).await?;
//!
//! let view = handle.ranked_subjects().await?;
//! assert!(view[0].ranking.is_pinned);
//! # Ok(()) }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{AccessGate, Session};
use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::notify::{ActionType, Notification, NotifyHandle};
use crate::schema;
use crate::store::{load_json_or_default, save_json, StateStore};

use super::event::{EventDraft, EventRecord};
use super::lookup::{CatalogEntry, CatalogLookup};
use super::ranking::{self, RankedSubject, RankingDraft, RankingRecord};

/// Result of an update, delete or pin toggle
///
/// A missing id is not an error: nothing changes and the caller gets `NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Applied,
    NotFound,
}

// ─── Messages ───

enum CatalogMsg {
    AddRanking {
        session: Option<Session>,
        draft: RankingDraft,
        reply: oneshot::Sender<Result<RankingRecord>>,
    },
    UpdateRanking {
        session: Option<Session>,
        record: RankingRecord,
        reply: oneshot::Sender<Result<WriteOutcome>>,
    },
    DeleteRanking {
        session: Option<Session>,
        id: String,
        reply: oneshot::Sender<Result<WriteOutcome>>,
    },
    TogglePin {
        session: Option<Session>,
        id: String,
        reply: oneshot::Sender<Result<WriteOutcome>>,
    },
    ListRankings {
        reply: oneshot::Sender<Vec<RankingRecord>>,
    },
    RankedSubjects {
        reply: oneshot::Sender<Vec<RankedSubject>>,
    },
    UnrankedSubjects {
        reply: oneshot::Sender<Vec<CatalogEntry>>,
    },
    AddEvent {
        session: Option<Session>,
        draft: EventDraft,
        reply: oneshot::Sender<Result<EventRecord>>,
    },
    UpdateEvent {
        session: Option<Session>,
        record: EventRecord,
        reply: oneshot::Sender<Result<WriteOutcome>>,
    },
    DeleteEvent {
        session: Option<Session>,
        id: String,
        reply: oneshot::Sender<Result<WriteOutcome>>,
    },
    ListEvents {
        reply: oneshot::Sender<Vec<EventRecord>>,
    },
}

// ─── Actor ───

/// Process-wide catalog context
pub struct CatalogActor {
    store: Arc<dyn StateStore>,
    catalog: Arc<dyn CatalogLookup>,
    gate: AccessGate,
    notify: NotifyHandle,
    unique_subjects: bool,
    rankings: Vec<RankingRecord>,
    events: Vec<EventRecord>,
    rx: mpsc::Receiver<CatalogMsg>,
}

impl CatalogActor {
    /// Load both collections, spawn the actor and return a handle
    pub async fn spawn(
        config: &TrackerConfig,
        store: Arc<dyn StateStore>,
        catalog: Arc<dyn CatalogLookup>,
        gate: AccessGate,
        notify: NotifyHandle,
    ) -> Result<CatalogHandle> {
        let rankings: Vec<RankingRecord> = load_json_or_default(store.as_ref(), schema::KEY_RANKINGS).await?;
        let events: Vec<EventRecord> = load_json_or_default(store.as_ref(), schema::KEY_EVENTS).await?;

        let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
        let actor = Self {
            store,
            catalog,
            gate,
            notify,
            unique_subjects: config.unique_ranking_subjects,
            rankings,
            events,
            rx,
        };

        info!(
            rankings = actor.rankings.len(),
            events = actor.events.len(),
            "CatalogActor spawned"
        );
        tokio::spawn(actor.run());
        Ok(CatalogHandle { tx })
    }

    async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                CatalogMsg::AddRanking { session, draft, reply } => {
                    let result = self.handle_add_ranking(session.as_ref(), draft).await;
                    let resource = result.as_ref().ok().map(|r| r.id.clone());
                    self.report(ActionType::RankingAdded, resource, session.as_ref(), result.as_ref().err())
                        .await;
                    let _ = reply.send(result);
                }
                CatalogMsg::UpdateRanking { session, record, reply } => {
                    let id = record.id.clone();
                    let result = self.handle_update_ranking(session.as_ref(), record).await;
                    self.report_write(ActionType::RankingUpdated, id, session.as_ref(), &result).await;
                    let _ = reply.send(result);
                }
                CatalogMsg::DeleteRanking { session, id, reply } => {
                    let result = self.handle_delete_ranking(session.as_ref(), &id).await;
                    self.report_write(ActionType::RankingDeleted, id, session.as_ref(), &result).await;
                    let _ = reply.send(result);
                }
                CatalogMsg::TogglePin { session, id, reply } => {
                    let action = self.pin_action(&id);
                    let result = self.handle_toggle_pin(session.as_ref(), &id, &action).await;
                    self.report_write(action, id, session.as_ref(), &result).await;
                    let _ = reply.send(result);
                }
                CatalogMsg::ListRankings { reply } => {
                    let _ = reply.send(ranking::display_order(&self.rankings));
                }
                CatalogMsg::RankedSubjects { reply } => {
                    let _ = reply.send(ranking::enrich(&self.rankings, self.catalog.as_ref()));
                }
                CatalogMsg::UnrankedSubjects { reply } => {
                    let _ = reply.send(ranking::unranked_subjects(&self.rankings, self.catalog.as_ref()));
                }
                CatalogMsg::AddEvent { session, draft, reply } => {
                    let result = self.handle_add_event(session.as_ref(), draft).await;
                    let resource = result.as_ref().ok().map(|e| e.id.clone());
                    self.report(ActionType::EventAdded, resource, session.as_ref(), result.as_ref().err())
                        .await;
                    let _ = reply.send(result);
                }
                CatalogMsg::UpdateEvent { session, record, reply } => {
                    let id = record.id.clone();
                    let result = self.handle_update_event(session.as_ref(), record).await;
                    self.report_write(ActionType::EventUpdated, id, session.as_ref(), &result).await;
                    let _ = reply.send(result);
                }
                CatalogMsg::DeleteEvent { session, id, reply } => {
                    let result = self.handle_delete_event(session.as_ref(), &id).await;
                    self.report_write(ActionType::EventDeleted, id, session.as_ref(), &result).await;
                    let _ = reply.send(result);
                }
                CatalogMsg::ListEvents { reply } => {
                    let _ = reply.send(self.events.clone());
                }
            }
        }
        info!("CatalogActor stopped");
    }

    // ─── Ranking Handlers ───

    async fn handle_add_ranking(&mut self, session: Option<&Session>, draft: RankingDraft) -> Result<RankingRecord> {
        self.gate.authorize(session, &ActionType::RankingAdded)?;

        let record = draft.into_record(format!("ranking-{}", Uuid::new_v4()))?;
        self.check_subject_free(&record)?;

        let previous = self.rankings.clone();
        self.rankings.push(record.clone());
        self.commit_rankings(previous).await?;

        info!(id = %record.id, subject = %record.subject_ref, rank = record.rank, "Ranking added");
        Ok(record)
    }

    async fn handle_update_ranking(&mut self, session: Option<&Session>, record: RankingRecord) -> Result<WriteOutcome> {
        self.gate.authorize(session, &ActionType::RankingUpdated)?;
        record.validate()?;

        let Some(idx) = self.rankings.iter().position(|r| r.id == record.id) else {
            return Ok(WriteOutcome::NotFound);
        };
        self.check_subject_free(&record)?;

        let previous = self.rankings.clone();
        self.rankings[idx] = record;
        self.commit_rankings(previous).await?;

        info!(id = %self.rankings[idx].id, "Ranking updated");
        Ok(WriteOutcome::Applied)
    }

    async fn handle_delete_ranking(&mut self, session: Option<&Session>, id: &str) -> Result<WriteOutcome> {
        self.gate.authorize(session, &ActionType::RankingDeleted)?;

        let Some(idx) = self.rankings.iter().position(|r| r.id == id) else {
            return Ok(WriteOutcome::NotFound);
        };

        let previous = self.rankings.clone();
        self.rankings.remove(idx);
        self.commit_rankings(previous).await?;

        info!(id, "Ranking deleted");
        Ok(WriteOutcome::Applied)
    }

    async fn handle_toggle_pin(
        &mut self,
        session: Option<&Session>,
        id: &str,
        action: &ActionType,
    ) -> Result<WriteOutcome> {
        self.gate.authorize(session, action)?;

        let Some(idx) = self.rankings.iter().position(|r| r.id == id) else {
            return Ok(WriteOutcome::NotFound);
        };

        let previous = self.rankings.clone();
        self.rankings[idx].is_pinned = !self.rankings[idx].is_pinned;
        self.commit_rankings(previous).await?;

        info!(id, pinned = self.rankings[idx].is_pinned, "Ranking pin toggled");
        Ok(WriteOutcome::Applied)
    }

    // ─── Event Handlers ───

    async fn handle_add_event(&mut self, session: Option<&Session>, draft: EventDraft) -> Result<EventRecord> {
        self.gate.authorize(session, &ActionType::EventAdded)?;

        let record = draft.into_record(format!("event-{}", Uuid::new_v4()))?;

        let previous = self.events.clone();
        self.events.push(record.clone());
        self.commit_events(previous).await?;

        info!(id = %record.id, status = %record.status, "Event added");
        Ok(record)
    }

    async fn handle_update_event(&mut self, session: Option<&Session>, record: EventRecord) -> Result<WriteOutcome> {
        self.gate.authorize(session, &ActionType::EventUpdated)?;
        record.validate()?;

        let Some(idx) = self.events.iter().position(|e| e.id == record.id) else {
            return Ok(WriteOutcome::NotFound);
        };

        let previous = self.events.clone();
        self.events[idx] = record;
        self.commit_events(previous).await?;

        info!(id = %self.events[idx].id, "Event updated");
        Ok(WriteOutcome::Applied)
    }

    async fn handle_delete_event(&mut self, session: Option<&Session>, id: &str) -> Result<WriteOutcome> {
        self.gate.authorize(session, &ActionType::EventDeleted)?;

        let Some(idx) = self.events.iter().position(|e| e.id == id) else {
            return Ok(WriteOutcome::NotFound);
        };

        let previous = self.events.clone();
        self.events.remove(idx);
        self.commit_events(previous).await?;

        info!(id, "Event deleted");
        Ok(WriteOutcome::Applied)
    }

    // ─── Helpers ───

    /// Pinning an unpinned record, or unpinning a pinned one
    fn pin_action(&self, id: &str) -> ActionType {
        match self.rankings.iter().find(|r| r.id == id) {
            Some(r) if r.is_pinned => ActionType::RankingUnpinned,
            _ => ActionType::RankingPinned,
        }
    }

    /// Another ranking already covers this subject
    fn check_subject_free(&self, record: &RankingRecord) -> Result<()> {
        if !self.unique_subjects {
            return Ok(());
        }
        let taken = self
            .rankings
            .iter()
            .any(|r| r.subject_ref == record.subject_ref && r.id != record.id);
        if taken {
            return Err(TrackerError::ValidationConflict {
                field: "airdropId",
                value: record.subject_ref.clone(),
            });
        }
        Ok(())
    }

    async fn commit_rankings(&mut self, previous: Vec<RankingRecord>) -> Result<()> {
        if let Err(e) = save_json(self.store.as_ref(), schema::KEY_RANKINGS, &self.rankings).await {
            warn!(error = %e, "Failed to persist rankings, change rolled back");
            self.rankings = previous;
            return Err(e);
        }
        Ok(())
    }

    async fn commit_events(&mut self, previous: Vec<EventRecord>) -> Result<()> {
        if let Err(e) = save_json(self.store.as_ref(), schema::KEY_EVENTS, &self.events).await {
            warn!(error = %e, "Failed to persist events, change rolled back");
            self.events = previous;
            return Err(e);
        }
        Ok(())
    }

    async fn report(
        &self,
        action: ActionType,
        resource: Option<String>,
        session: Option<&Session>,
        error: Option<&TrackerError>,
    ) {
        let actor = session.map(|s| s.username.clone());
        let notification = match error {
            None => Notification::success(action, resource, actor),
            Some(e) if e.is_denial() => Notification::forbidden(action, resource, actor),
            Some(e) => Notification::failure(action, e.to_string(), resource, actor),
        };
        self.notify.emit(notification).await;
    }

    async fn report_write(
        &self,
        action: ActionType,
        id: String,
        session: Option<&Session>,
        result: &Result<WriteOutcome>,
    ) {
        match result {
            Ok(WriteOutcome::NotFound) => {
                let detail = TrackerError::NotFound(id.clone()).to_string();
                let actor = session.map(|s| s.username.clone());
                self.notify
                    .emit(Notification::failure(action, detail, Some(id), actor))
                    .await;
            }
            Ok(WriteOutcome::Applied) => self.report(action, Some(id), session, None).await,
            Err(e) => self.report(action, Some(id), session, Some(e)).await,
        }
    }
}

// ─── Handle ───

/// Thread-safe handle to the CatalogActor
#[derive(Clone)]
pub struct CatalogHandle {
    tx: mpsc::Sender<CatalogMsg>,
}

impl CatalogHandle {
    async fn request<T>(&self, msg: CatalogMsg, rx: oneshot::Receiver<T>) -> Result<T> {
        self.tx
            .send(msg)
            .await
            .map_err(|_| TrackerError::ActorUnavailable("CatalogActor".into()))?;
        rx.await
            .map_err(|_| TrackerError::ActorUnavailable("CatalogActor dropped".into()))
    }

    // ─── Rankings ───

    pub async fn add_ranking(&self, session: Option<&Session>, draft: RankingDraft) -> Result<RankingRecord> {
        let (reply, rx) = oneshot::channel();
        let session = session.cloned();
        self.request(CatalogMsg::AddRanking { session, draft, reply }, rx).await?
    }

    /// Replace the ranking with the same id
    pub async fn update_ranking(&self, session: Option<&Session>, record: RankingRecord) -> Result<WriteOutcome> {
        let (reply, rx) = oneshot::channel();
        let session = session.cloned();
        self.request(CatalogMsg::UpdateRanking { session, record, reply }, rx).await?
    }

    pub async fn delete_ranking(&self, session: Option<&Session>, id: String) -> Result<WriteOutcome> {
        let (reply, rx) = oneshot::channel();
        let session = session.cloned();
        self.request(CatalogMsg::DeleteRanking { session, id, reply }, rx).await?
    }

    pub async fn toggle_pin(&self, session: Option<&Session>, id: String) -> Result<WriteOutcome> {
        let (reply, rx) = oneshot::channel();
        let session = session.cloned();
        self.request(CatalogMsg::TogglePin { session, id, reply }, rx).await?
    }

    /// All rankings in display order
    pub async fn rankings(&self) -> Result<Vec<RankingRecord>> {
        let (reply, rx) = oneshot::channel();
        self.request(CatalogMsg::ListRankings { reply }, rx).await
    }

    /// Display-ordered rankings joined with catalog details
    pub async fn ranked_subjects(&self) -> Result<Vec<RankedSubject>> {
        let (reply, rx) = oneshot::channel();
        self.request(CatalogMsg::RankedSubjects { reply }, rx).await
    }

    /// Catalog entries without a ranking
    pub async fn unranked_subjects(&self) -> Result<Vec<CatalogEntry>> {
        let (reply, rx) = oneshot::channel();
        self.request(CatalogMsg::UnrankedSubjects { reply }, rx).await
    }

    // ─── Events ───

    pub async fn add_event(&self, session: Option<&Session>, draft: EventDraft) -> Result<EventRecord> {
        let (reply, rx) = oneshot::channel();
        let session = session.cloned();
        self.request(CatalogMsg::AddEvent { session, draft, reply }, rx).await?
    }

    pub async fn update_event(&self, session: Option<&Session>, record: EventRecord) -> Result<WriteOutcome> {
        let (reply, rx) = oneshot::channel();
        let session = session.cloned();
        self.request(CatalogMsg::UpdateEvent { session, record, reply }, rx).await?
    }

    pub async fn delete_event(&self, session: Option<&Session>, id: String) -> Result<WriteOutcome> {
        let (reply, rx) = oneshot::channel();
        let session = session.cloned();
        self.request(CatalogMsg::DeleteEvent { session, id, reply }, rx).await?
    }

    /// Events as stored
    pub async fn events(&self) -> Result<Vec<EventRecord>> {
        let (reply, rx) = oneshot::channel();
        self.request(CatalogMsg::ListEvents { reply }, rx).await
    }
}
