//! Configuration for the airdrop tracker state layer

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How newly registered secrets are stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretScheme {
    /// Clear text, compared by exact string match
    #[default]
    Plaintext,
    /// Salted Argon2id PHC string
    Argon2,
}

impl SecretScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plaintext => "plaintext",
            Self::Argon2 => "argon2",
        }
    }
}

impl fmt::Display for SecretScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single (email, username, secret) triple that always yields the admin role
#[derive(Clone, PartialEq, Eq)]
pub struct PrivilegedIdentity {
    pub email: String,
    pub username: String,
    secret: String,
}

impl PrivilegedIdentity {
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// Read the triple from `TRACKER_ADMIN_EMAIL`, `TRACKER_ADMIN_USERNAME`
    /// and `TRACKER_ADMIN_SECRET`, falling back to placeholders.
    pub fn from_env() -> Self {
        let var = |name: &str, fallback: &str| {
            std::env::var(name).unwrap_or_else(|_| fallback.to_string())
        };
        Self::new(
            var("TRACKER_ADMIN_EMAIL", "admin@tracker.local"),
            var("TRACKER_ADMIN_USERNAME", "tracker-admin"),
            var("TRACKER_ADMIN_SECRET", "tracker-admin-secret-change-me"),
        )
    }

    /// All three fields match exactly
    pub fn matches(&self, email: &str, username: &str, secret: &str) -> bool {
        self.email == email && self.username == username && self.secret == secret
    }

    /// The login pair (email, secret) matches
    pub fn matches_login(&self, email: &str, secret: &str) -> bool {
        self.email == email && self.secret == secret
    }

    /// The identity pair (email, username) matches
    pub fn matches_pair(&self, email: &str, username: &str) -> bool {
        self.email == email && self.username == username
    }
}

impl fmt::Debug for PrivilegedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivilegedIdentity")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Tracker configuration
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Directory holding the persisted JSON records
    pub base_path: PathBuf,

    /// Admin identity
    pub privileged: PrivilegedIdentity,

    /// Storage scheme for secrets registered from now on
    pub secret_scheme: SecretScheme,

    /// Nominal delay of the stub membership check
    pub membership_delay: Duration,

    /// Reject a second ranking for a subject that already has one
    pub unique_ranking_subjects: bool,

    /// Number of recent notifications retained for queries
    pub notification_capacity: usize,

    /// Mailbox size of each actor
    pub channel_capacity: usize,
}

impl TrackerConfig {
    /// Create config with sensible defaults
    ///
    /// # Arguments
    /// * `base_path` - Directory for the persisted records.
    ///   Structure created:
    ///   ```text
    ///   base_path/
    ///   ├── crypto_tracker_users.json      (identities, with secrets)
    ///   ├── crypto_tracker_user.json       (current session)
    ///   ├── crypto_tracker_rankings.json   (ranking records)
    ///   └── crypto_tracker_events.json     (dashboard events)
    ///   ```
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            privileged: PrivilegedIdentity::from_env(),
            secret_scheme: SecretScheme::Plaintext,
            membership_delay: Duration::from_millis(1000),
            unique_ranking_subjects: true,
            notification_capacity: 256,
            channel_capacity: 256,
        }
    }

    /// Override the admin identity
    pub fn with_privileged(mut self, privileged: PrivilegedIdentity) -> Self {
        self.privileged = privileged;
        self
    }

    /// Override the secret storage scheme
    pub fn with_secret_scheme(mut self, scheme: SecretScheme) -> Self {
        self.secret_scheme = scheme;
        self
    }

    /// Override the stub membership delay
    pub fn with_membership_delay(mut self, delay: Duration) -> Self {
        self.membership_delay = delay;
        self
    }

    /// Toggle one-ranking-per-subject enforcement
    pub fn with_unique_ranking_subjects(mut self, enforce: bool) -> Self {
        self.unique_ranking_subjects = enforce;
        self
    }

    /// Override the number of retained notifications
    pub fn with_notification_capacity(mut self, capacity: usize) -> Self {
        self.notification_capacity = capacity.max(1);
        self
    }

    /// Get path for a persisted record
    pub fn state_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{key}.json"))
    }
}
