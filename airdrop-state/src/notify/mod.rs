//! Notification module — success, failure and forbidden reports
//!
//! Every auth transition and catalog mutation reports its outcome here, so a
//! front end can show it. Denials by the access gate are reported as
//! [`NotificationKind::Forbidden`], distinct from failures.

pub mod types;
pub mod actor;

pub use actor::{NotifyActor, NotifyHandle};
pub use types::{ActionType, Notification, NotificationKind};
