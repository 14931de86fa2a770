//! Names of the persisted records
//!
//! The state layer persists four JSON records through a [`StateStore`](crate::store::StateStore).
//! Key names match the blobs written by the web client so existing state
//! can be loaded as-is.

// ─── Record Keys (constants) ───

/// Ordered list of every registered identity, secrets included
pub const KEY_USERS: &str = "crypto_tracker_users";
/// Secret-free projection of the current session, or absent
pub const KEY_SESSION: &str = "crypto_tracker_user";
pub const KEY_RANKINGS: &str = "crypto_tracker_rankings";
pub const KEY_EVENTS: &str = "crypto_tracker_events";

/// Description of one persisted record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDef {
    pub key: &'static str,
    pub description: &'static str,
    /// Holds clear-text or hashed secrets
    pub sensitive: bool,
}

/// All persisted records
pub fn all_records() -> Vec<RecordDef> {
    vec![
        RecordDef {
            key: KEY_USERS,
            description: "registered identities",
            sensitive: true,
        },
        RecordDef {
            key: KEY_SESSION,
            description: "current session",
            sensitive: false,
        },
        RecordDef {
            key: KEY_RANKINGS,
            description: "ranking records",
            sensitive: false,
        },
        RecordDef {
            key: KEY_EVENTS,
            description: "dashboard events",
            sensitive: false,
        },
    ]
}

/// Look up the definition for a key
pub fn record_def(key: &str) -> Option<RecordDef> {
    all_records().into_iter().find(|r| r.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique() {
        let records = all_records();
        for (i, a) in records.iter().enumerate() {
            for b in &records[i + 1..] {
                assert_ne!(a.key, b.key);
            }
        }
    }

    #[test]
    fn test_only_users_is_sensitive() {
        assert!(record_def(KEY_USERS).unwrap().sensitive);
        assert!(!record_def(KEY_SESSION).unwrap().sensitive);
        assert!(record_def("unknown").is_none());
    }
}
