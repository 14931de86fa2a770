//! Notification domain types — ActionType, NotificationKind, Notification

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operations that report an outcome to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    // Auth events
    Login,
    Logout,
    Register,
    // Ranking events
    RankingAdded,
    RankingUpdated,
    RankingDeleted,
    RankingPinned,
    RankingUnpinned,
    // Event events
    EventAdded,
    EventUpdated,
    EventDeleted,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::Register => "register",
            Self::RankingAdded => "ranking_added",
            Self::RankingUpdated => "ranking_updated",
            Self::RankingDeleted => "ranking_deleted",
            Self::RankingPinned => "ranking_pinned",
            Self::RankingUnpinned => "ranking_unpinned",
            Self::EventAdded => "event_added",
            Self::EventUpdated => "event_updated",
            Self::EventDeleted => "event_deleted",
        }
    }

    /// Whether the action needs the admin role
    pub fn is_gated(&self) -> bool {
        !matches!(self, Self::Login | Self::Logout | Self::Register)
    }

    /// Toast title shown on success
    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Logged in",
            Self::Logout => "Logged out",
            Self::Register => "Account created",
            Self::RankingAdded => "Ranking added",
            Self::RankingUpdated => "Ranking updated",
            Self::RankingDeleted => "Ranking deleted",
            Self::RankingPinned => "Pinned",
            Self::RankingUnpinned => "Unpinned",
            Self::EventAdded => "Event Added",
            Self::EventUpdated => "Event Updated",
            Self::EventDeleted => "Event Deleted",
        }
    }

    /// Toast description shown on success
    pub fn success_description(&self) -> &'static str {
        match self {
            Self::Login => "Welcome back",
            Self::Logout => "You have been logged out",
            Self::Register => "Your account has been created",
            Self::RankingAdded => "New airdrop ranking has been added successfully",
            Self::RankingUpdated => "The airdrop ranking has been updated successfully",
            Self::RankingDeleted => "The airdrop ranking has been removed",
            Self::RankingPinned => "Airdrop has been pinned successfully",
            Self::RankingUnpinned => "Airdrop has been unpinned successfully",
            Self::EventAdded => "The new event has been successfully added.",
            Self::EventUpdated => "The event has been successfully updated.",
            Self::EventDeleted => "The event has been successfully deleted.",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Failure,
    /// The access gate refused the operation
    Forbidden,
}

/// One user-facing outcome report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: String,
    pub action: ActionType,
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
    /// Id of the record the action touched
    pub resource: Option<String>,
    /// Username of the session that performed it
    pub actor: Option<String>,
    pub timestamp: String,
}

impl Notification {
    fn build(
        action: ActionType,
        kind: NotificationKind,
        title: String,
        description: String,
        resource: Option<String>,
        actor: Option<String>,
    ) -> Self {
        Self {
            notification_id: Uuid::new_v4().to_string(),
            action,
            kind,
            title,
            description,
            resource,
            actor,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn success(action: ActionType, resource: Option<String>, actor: Option<String>) -> Self {
        let title = action.title().to_string();
        let description = action.success_description().to_string();
        Self::build(action, NotificationKind::Success, title, description, resource, actor)
    }

    pub fn failure(
        action: ActionType,
        detail: impl Into<String>,
        resource: Option<String>,
        actor: Option<String>,
    ) -> Self {
        Self::build(action, NotificationKind::Failure, "Error".into(), detail.into(), resource, actor)
    }

    pub fn forbidden(action: ActionType, resource: Option<String>, actor: Option<String>) -> Self {
        let description = format!("Only administrators can perform {}", action.as_str());
        Self::build(
            action,
            NotificationKind::Forbidden,
            "Admin Access Required".into(),
            description,
            resource,
            actor,
        )
    }
}
