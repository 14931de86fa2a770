//! Catalog module — admin-curated rankings and dashboard events
//!
//! Rankings refer to entries of an external airdrop catalog that is only read
//! (see [`CatalogLookup`]). Both collections live in the [`CatalogActor`].

pub mod lookup;
pub mod ranking;
pub mod event;
pub mod actor;

pub use actor::{CatalogActor, CatalogHandle, WriteOutcome};
pub use event::{ButtonAction, EventDraft, EventRecord, EventStatus};
pub use lookup::{CatalogEntry, CatalogLookup, StaticCatalog};
pub use ranking::{
    display_order, enrich, unranked_subjects, PotentialValue, RankedSubject, RankingDraft,
    RankingRecord, Rating, UNKNOWN_SUBJECT, UNRANKED_SORT_RANK,
};
