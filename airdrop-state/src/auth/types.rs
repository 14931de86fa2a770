//! Auth domain types — Role, Identity, Session
//!
//! Serializable, cloneable, and cheap to pass around. None of these carry a secret.

use serde::{Deserialize, Serialize};

/// Role derived for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public projection of a registered identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub username: String,
    pub is_video_creator: bool,
}

/// The authenticated user's projection plus derived role
///
/// Persisted under [`KEY_SESSION`](crate::schema::KEY_SESSION) so it
/// survives restarts. The stored `is_admin` flag is informational only:
/// the access gate re-derives admin rights from `email` and `username`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub email: String,
    pub username: String,
    pub is_video_creator: bool,
    #[serde(default)]
    pub is_admin: bool,
}

impl Session {
    pub fn from_identity(identity: Identity, is_admin: bool) -> Self {
        Self {
            id: identity.id,
            email: identity.email,
            username: identity.username,
            is_video_creator: identity.is_video_creator,
            is_admin,
        }
    }

    pub fn role(&self) -> Role {
        if self.is_admin {
            Role::Admin
        } else {
            Role::Member
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            id: "user-1".into(),
            email: "alice@example.com".into(),
            username: "alice".into(),
            is_video_creator: false,
        }
    }

    #[test]
    fn test_session_from_identity() {
        let session = Session::from_identity(identity(), false);
        assert_eq!(session.id, "user-1");
        assert_eq!(session.role(), Role::Member);
        assert_eq!(Session::from_identity(identity(), true).role(), Role::Admin);
    }

    #[test]
    fn test_session_json_shape() {
        let session = Session::from_identity(identity(), false);
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["isVideoCreator"], false);
        assert_eq!(json["isAdmin"], false);
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_session_without_admin_flag_parses() {
        let raw = r#"{"id":"user-9","email":"e@x.io","username":"e","isVideoCreator":true}"#;
        let session: Session = serde_json::from_str(raw).unwrap();
        assert!(!session.is_admin);
        assert!(session.is_video_creator);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"admin\"");
        assert_eq!(Role::Admin.to_string(), "admin");
    }
}
