//! End-to-end tests over a FileStore in a temporary directory

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use airdrop_state::catalog::{CatalogEntry, EventDraft, EventStatus, PotentialValue, RankingDraft, StaticCatalog};
use airdrop_state::config::{PrivilegedIdentity, TrackerConfig};
use airdrop_state::notify::{ActionType, NotificationKind};
use airdrop_state::schema;
use airdrop_state::store::{FileStore, StateStore};
use airdrop_state::{Tracker, TrackerError};

const ADMIN_EMAIL: &str = "root@tracker.io";
const ADMIN_USERNAME: &str = "root";
const ADMIN_SECRET: &str = "Root!Secret#1";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn test_config(dir: &TempDir) -> TrackerConfig {
    TrackerConfig::new(dir.path())
        .with_privileged(PrivilegedIdentity::new(ADMIN_EMAIL, ADMIN_USERNAME, ADMIN_SECRET))
        .with_membership_delay(Duration::from_millis(10))
}

fn test_catalog() -> Arc<StaticCatalog> {
    Arc::new(StaticCatalog::new(vec![
        CatalogEntry::new("zksync", "zkSync", "/logos/zksync.png", "Layer 2"),
        CatalogEntry::new("scroll", "Scroll", "/logos/scroll.png", "Layer 2"),
    ]))
}

#[tokio::test]
async fn test_admin_flow_survives_restart() {
    init_tracing();
    let dir = TempDir::new().unwrap();

    let tracker = Tracker::open(test_config(&dir), test_catalog()).await.unwrap();
    assert!(!tracker.is_admin().await);

    let session = tracker
        .auth
        .login(ADMIN_EMAIL.into(), ADMIN_SECRET.into())
        .await
        .unwrap();
    assert!(tracker.is_admin().await);

    let ranking = tracker
        .catalog
        .add_ranking(Some(&session), RankingDraft::new("zksync", PotentialValue::VeryHigh).with_rank(1))
        .await
        .unwrap();
    tracker
        .catalog
        .add_event(Some(&session), EventDraft::new("Airdrop claim", EventStatus::Live))
        .await
        .unwrap();
    drop(tracker);

    let reopened = Tracker::open(test_config(&dir), test_catalog()).await.unwrap();
    assert_eq!(reopened.auth.current_session().await, Some(session));
    assert!(reopened.is_admin().await);

    let rows = reopened.catalog.ranked_subjects().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].ranking, ranking);
    assert_eq!(rows[0].subject_name, "zkSync");
    assert_eq!(reopened.catalog.events().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_member_cannot_mutate() {
    let dir = TempDir::new().unwrap();
    let tracker = Tracker::open(test_config(&dir), test_catalog()).await.unwrap();

    let session = tracker
        .auth
        .register("carol@example.com".into(), "carol".into(), "pw".into())
        .await
        .unwrap();
    assert!(!tracker.is_admin().await);

    let result = tracker
        .catalog
        .add_ranking(Some(&session), RankingDraft::new("scroll", PotentialValue::High))
        .await;
    assert!(matches!(result, Err(TrackerError::AuthorizationDenied(_))));

    let mine = tracker.notifications.recent_for("carol".into(), 10).await;
    assert_eq!(mine[0].kind, NotificationKind::Forbidden);
    assert_eq!(mine[0].title, "Admin Access Required");
    assert_eq!(mine[1].action, ActionType::Register);
    assert_eq!(mine[1].kind, NotificationKind::Success);

    assert!(!dir.path().join(format!("{}.json", schema::KEY_RANKINGS)).exists());
}

#[tokio::test]
async fn test_file_layout() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let tracker = Tracker::open(config.clone(), test_catalog()).await.unwrap();

    tracker
        .auth
        .register("dave@example.com".into(), "dave".into(), "pw".into())
        .await
        .unwrap();

    let users = config.state_path(schema::KEY_USERS);
    let session = config.state_path(schema::KEY_SESSION);
    assert!(users.exists());
    assert!(session.exists());
    assert!(!users.with_extension("json.tmp").exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&users).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    tracker.auth.logout().await.unwrap();
    assert!(!session.exists());
}

#[tokio::test]
async fn test_file_store_basics() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(&test_config(&dir)).await.unwrap();

    assert!(store.get("missing").await.unwrap().is_none());
    store.put("scratch", "{\"v\":1}".into()).await.unwrap();
    store.put("scratch", "{\"v\":2}".into()).await.unwrap();
    assert_eq!(store.get("scratch").await.unwrap().as_deref(), Some("{\"v\":2}"));

    assert!(store.remove("scratch").await.unwrap());
    assert!(!store.remove("scratch").await.unwrap());
}

#[tokio::test]
async fn test_corrupt_session_file_is_ignored() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    std::fs::write(config.state_path(schema::KEY_SESSION), "{{{").unwrap();

    let tracker = Tracker::open(config, test_catalog()).await.unwrap();
    assert!(tracker.auth.current_session().await.is_none());
}

#[tokio::test]
async fn test_membership_check() {
    let dir = TempDir::new().unwrap();
    let tracker = Tracker::open(test_config(&dir), test_catalog()).await.unwrap();

    let check = tracker.check_membership("carol");
    assert_eq!(check.outcome().await, Some(true));

    let abandoned = tracker.check_membership("carol");
    abandoned.cancel();
    assert_eq!(abandoned.outcome().await, None);
}
