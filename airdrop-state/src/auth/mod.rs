//! Authentication module — credentials, sessions, and the admin gate
//!
//! Identities and the current session are persisted through the shared
//! [`StateStore`](crate::store::StateStore) so a session survives restarts.

pub mod types;
pub mod credentials;
pub mod gate;
pub mod actor;
pub mod captcha;
pub mod membership;

pub use actor::{AuthActor, AuthHandle, PRIVILEGED_SESSION_ID};
pub use captcha::{Captcha, Operator};
pub use credentials::{CredentialStore, StoredIdentity};
pub use gate::{is_admin, AccessGate};
pub use membership::{MembershipCheck, MembershipValidator, StubMembershipValidator};
pub use types::{Identity, Role, Session};
