//! Telegram channel membership check
//!
//! Registration asks the user to join a channel first. The only validator
//! shipped here is a stub that waits a nominal delay and accepts; a real
//! implementation would ask the remote service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::debug;

/// Answers whether a username has joined the channel
#[async_trait]
pub trait MembershipValidator: Send + Sync {
    async fn validate_membership(&self, username: &str) -> bool;
}

/// Accepts everyone after a fixed delay
#[derive(Debug, Clone)]
pub struct StubMembershipValidator {
    delay: Duration,
}

impl StubMembershipValidator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl MembershipValidator for StubMembershipValidator {
    async fn validate_membership(&self, username: &str) -> bool {
        tokio::time::sleep(self.delay).await;
        debug!(username, "Membership accepted by stub validator");
        true
    }
}

/// A single in-flight membership check
///
/// Runs as its own task. No retries; [`cancel`](Self::cancel) aborts it and the
/// outcome becomes `None`.
pub struct MembershipCheck {
    handle: JoinHandle<bool>,
}

impl MembershipCheck {
    pub fn spawn(validator: Arc<dyn MembershipValidator>, username: impl Into<String>) -> Self {
        let username = username.into();
        let handle = tokio::spawn(async move { validator.validate_membership(&username).await });
        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the verdict; `None` if cancelled
    pub async fn outcome(self) -> Option<bool> {
        self.handle.await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_stub_resolves_true_after_delay() {
        let validator = StubMembershipValidator::new(Duration::from_millis(1000));
        let started = tokio::time::Instant::now();
        assert!(validator.validate_membership("alice").await);
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_completes() {
        let validator: Arc<dyn MembershipValidator> =
            Arc::new(StubMembershipValidator::new(Duration::from_millis(1000)));
        let check = MembershipCheck::spawn(validator, "alice");
        assert_eq!(check.outcome().await, Some(true));
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_can_be_cancelled() {
        let validator: Arc<dyn MembershipValidator> =
            Arc::new(StubMembershipValidator::new(Duration::from_secs(60)));
        let check = MembershipCheck::spawn(validator, "bob");
        assert!(!check.is_finished());
        check.cancel();
        assert_eq!(check.outcome().await, None);
    }
}
