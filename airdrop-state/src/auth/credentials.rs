//! CredentialStore — registered identities and their stored secrets
//!
//! The store is a plain value: the [`AuthActor`](super::AuthActor) owns it and
//! serializes access, so `register` is an atomic check-and-insert.
//! Stored secrets never leave this module; lookups return [`Identity`].

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{PrivilegedIdentity, SecretScheme};
use crate::error::{Result, TrackerError};

use super::types::Identity;

/// Identity as persisted, secret included
///
/// Field names follow the web client's blob (`password` holds the secret).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredIdentity {
    id: String,
    email: String,
    username: String,
    #[serde(rename = "password")]
    stored_secret: String,
    #[serde(default)]
    secret_scheme: SecretScheme,
    #[serde(default)]
    is_video_creator: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,
}

impl StoredIdentity {
    fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
            is_video_creator: self.is_video_creator,
        }
    }

    fn verify(&self, secret: &str) -> bool {
        match self.secret_scheme {
            SecretScheme::Plaintext => self.stored_secret == secret,
            SecretScheme::Argon2 => PasswordHash::new(&self.stored_secret)
                .map(|hash| Argon2::default().verify_password(secret.as_bytes(), &hash).is_ok())
                .unwrap_or(false),
        }
    }
}

impl std::fmt::Debug for StoredIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredIdentity")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("secret_scheme", &self.secret_scheme)
            .field("is_video_creator", &self.is_video_creator)
            .finish_non_exhaustive()
    }
}

fn seal(scheme: SecretScheme, secret: &str) -> Result<String> {
    match scheme {
        SecretScheme::Plaintext => Ok(secret.to_string()),
        SecretScheme::Argon2 => {
            let salt = SaltString::generate(&mut OsRng);
            Ok(Argon2::default()
                .hash_password(secret.as_bytes(), &salt)?
                .to_string())
        }
    }
}

/// Ordered set of registered identities with unique email and username
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialStore {
    identities: Vec<StoredIdentity>,
    scheme: SecretScheme,
}

impl CredentialStore {
    pub fn new(scheme: SecretScheme) -> Self {
        Self {
            identities: Vec::new(),
            scheme,
        }
    }

    /// Rebuild from persisted records
    pub fn from_records(identities: Vec<StoredIdentity>, scheme: SecretScheme) -> Self {
        Self { identities, scheme }
    }

    /// Records for persistence
    pub fn records(&self) -> &[StoredIdentity] {
        &self.identities
    }

    /// Register a new identity
    ///
    /// Fails with [`TrackerError::ValidationConflict`] when either the email or
    /// the username is taken; the store is left untouched in that case.
    pub fn register(
        &mut self,
        email: &str,
        username: &str,
        secret: &str,
        privileged: &PrivilegedIdentity,
    ) -> Result<Identity> {
        if self.exists_email(email) {
            return Err(TrackerError::ValidationConflict {
                field: "email",
                value: email.to_string(),
            });
        }
        if self.exists_username(username) {
            return Err(TrackerError::ValidationConflict {
                field: "username",
                value: username.to_string(),
            });
        }

        let record = StoredIdentity {
            id: format!("user-{}", Uuid::new_v4()),
            email: email.to_string(),
            username: username.to_string(),
            stored_secret: seal(self.scheme, secret)?,
            secret_scheme: self.scheme,
            is_video_creator: privileged.matches(email, username, secret),
            created_at: Some(Utc::now().to_rfc3339()),
        };
        let identity = record.identity();
        self.identities.push(record);
        Ok(identity)
    }

    /// First identity whose email and secret both match
    pub fn authenticate(&self, email: &str, secret: &str) -> Option<Identity> {
        self.identities
            .iter()
            .find(|r| r.email == email && r.verify(secret))
            .map(StoredIdentity::identity)
    }

    pub fn exists_email(&self, email: &str) -> bool {
        self.identities.iter().any(|r| r.email == email)
    }

    pub fn exists_username(&self, username: &str) -> bool {
        self.identities.iter().any(|r| r.username == username)
    }

    /// Remove the most recently registered identity if it has `id`
    pub(crate) fn rollback(&mut self, id: &str) {
        if self.identities.last().is_some_and(|r| r.id == id) {
            self.identities.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}
