//! Access gate for catalog mutations
//!
//! A session is admin iff it is present and its (email, username) equals the
//! privileged pair. The check reads nothing but its arguments.

use tracing::debug;

use crate::config::PrivilegedIdentity;
use crate::error::{Result, TrackerError};
use crate::notify::ActionType;

use super::types::Session;

/// Whether `session` belongs to the privileged identity
pub fn is_admin(session: Option<&Session>, privileged: &PrivilegedIdentity) -> bool {
    session.is_some_and(|s| privileged.matches_pair(&s.email, &s.username))
}

/// Gate bound to the configured privileged identity; only the pair is compared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGate {
    privileged: PrivilegedIdentity,
}

impl AccessGate {
    pub fn new(privileged: PrivilegedIdentity) -> Self {
        Self { privileged }
    }

    pub fn is_admin(&self, session: Option<&Session>) -> bool {
        is_admin(session, &self.privileged)
    }

    /// Refuse a gated `action` with [`TrackerError::AuthorizationDenied`] unless admin
    ///
    /// Auth actions (login, logout, register) are open to everyone.
    pub fn authorize(&self, session: Option<&Session>, action: &ActionType) -> Result<()> {
        if !action.is_gated() || self.is_admin(session) {
            return Ok(());
        }
        debug!(
            action = %action,
            username = session.map(|s| s.username.as_str()).unwrap_or("<anonymous>"),
            "Gated operation denied"
        );
        Err(TrackerError::AuthorizationDenied(action.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> AccessGate {
        AccessGate::new(PrivilegedIdentity::new("root@tracker.io", "root", "RootSecret!1"))
    }

    fn session(email: &str, username: &str, is_admin: bool) -> Session {
        Session {
            id: "user-1".into(),
            email: email.into(),
            username: username.into(),
            is_video_creator: false,
            is_admin,
        }
    }

    #[test]
    fn test_anonymous_is_not_admin() {
        assert!(!gate().is_admin(None));
    }

    #[test]
    fn test_privileged_pair_is_admin() {
        assert!(gate().is_admin(Some(&session("root@tracker.io", "root", false))));
    }

    #[test]
    fn test_stored_flag_cannot_forge_admin() {
        let forged = session("mallory@x.io", "mallory", true);
        assert!(!gate().is_admin(Some(&forged)));
        assert!(!gate().is_admin(Some(&session("root@tracker.io", "mallory", true))));
    }

    #[test]
    fn test_repeated_checks_agree() {
        let g = gate();
        let s = session("root@tracker.io", "root", true);
        let first = g.is_admin(Some(&s));
        for _ in 0..10 {
            assert_eq!(g.is_admin(Some(&s)), first);
        }
        assert_eq!(s, session("root@tracker.io", "root", true));
    }

    #[test]
    fn test_auth_actions_are_not_gated() {
        for action in [ActionType::Login, ActionType::Logout, ActionType::Register] {
            assert!(gate().authorize(None, &action).is_ok());
        }
        assert!(gate().authorize(None, &ActionType::RankingPinned).is_err());
    }

    #[test]
    fn test_authorize_denies_members() {
        let member = session("alice@x.io", "alice", false);
        let err = gate()
            .authorize(Some(&member), &ActionType::RankingAdded)
            .unwrap_err();
        assert!(err.is_denial());
        assert!(gate()
            .authorize(Some(&session("root@tracker.io", "root", true)), &ActionType::EventDeleted)
            .is_ok());
    }
}
