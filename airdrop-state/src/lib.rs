//! # Airdrop State
//!
//! Client state for the airdrop tracker: registered identities, the current
//! session, and the admin-curated ranking and event collections.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │               airdrop-state               │
//! ├───────────────┬───────────────┬───────────┤
//! │   AuthActor   │ CatalogActor  │NotifyActor│
//! │ (credentials, │ (rankings,    │ (success, │
//! │   session)    │  events)      │  denials) │
//! ├───────────────┴──────┬────────┴───────────┤
//! │      AccessGate ─────┘  (admin check)     │
//! ├───────────────────────────────────────────┤
//! │        StateStore (JSON key-value)        │
//! └───────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use airdrop_state::catalog::{CatalogEntry, PotentialValue, RankingDraft, StaticCatalog};
//! use airdrop_state::{Tracker, TrackerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = StaticCatalog::new(vec![
//!         CatalogEntry::new("zksync", "zkSync", "/logos/zksync.png", "Layer 2"),
//!     ]);
//!     let tracker = Tracker::open(TrackerConfig::new("/data/tracker"), Arc::new(catalog)).await?;
//!
//!     let session = tracker
//!         .auth
//!         .login("admin@tracker.local".into(), "tracker-admin-secret-change-me".into())
//!         .await?;
//!
//!     tracker
//!         .catalog
//!         .add_ranking(Some(&session), RankingDraft::new("zksync", PotentialValue::VeryHigh).with_rank(1))
//!         .await?;
//!
//!     for row in tracker.catalog.ranked_subjects().await? {
//!         println!("{} {}", row.ranking.rank_label(), row.subject_name);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Serialized writes**: each actor handles one message at a time, so
//!   registration is an atomic check-and-insert
//! - **Explicit sessions**: gated operations take the caller's session as an argument
//! - **Deterministic ordering**: pinned first, then rank, unranked last
//! - **Restart survival**: every write is persisted immediately; corrupt state
//!   is recovered as empty, never fatal
//! - **Railway Programming**: All operations return `Result<T, TrackerError>`

pub mod config;
pub mod error;
pub mod schema;
pub mod store;
pub mod auth;
pub mod catalog;
pub mod notify;
pub mod tracker;

// Re-exports for convenience
pub use config::{PrivilegedIdentity, SecretScheme, TrackerConfig};
pub use error::{Result, TrackerError};
pub use store::{FileStore, MemoryStore, StateStore};
pub use tracker::Tracker;

pub use auth::{AccessGate, AuthActor, AuthHandle, Captcha, Identity, Role, Session};
pub use catalog::{CatalogActor, CatalogHandle, EventRecord, RankingRecord, WriteOutcome};
pub use notify::{ActionType, Notification, NotificationKind, NotifyActor, NotifyHandle};
