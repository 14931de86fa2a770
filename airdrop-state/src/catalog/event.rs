//! Dashboard events — kept in insertion order, no ordering rule of their own

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Live,
    ComingSoon,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Live => "live",
            Self::ComingSoon => "coming_soon",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Live => "Live Now",
            Self::ComingSoon => "Coming Soon",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    #[default]
    ViewDetails,
    JoinTestnet,
    GetNotified,
}

impl ButtonAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewDetails => "view_details",
            Self::JoinTestnet => "join_testnet",
            Self::GetNotified => "get_notified",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ViewDetails => "View Details",
            Self::JoinTestnet => "Join Testnet",
            Self::GetNotified => "Get Notified",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub status: EventStatus,
    /// Free text such as "2d 4h"; never parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_left: Option<String>,
    pub button_text: String,
    pub button_action: ButtonAction,
}

impl EventRecord {
    /// `time_left`, but only while the event is upcoming
    pub fn countdown(&self) -> Option<&str> {
        match self.status {
            EventStatus::Upcoming => self.time_left.as_deref().filter(|t| !t.is_empty()),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(TrackerError::InvalidInput("Event title must not be empty".into()));
        }
        Ok(())
    }
}

/// Form values for a new event; the id is assigned on insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub subtitle: String,
    pub status: EventStatus,
    pub time_left: Option<String>,
    pub button_text: String,
    pub button_action: ButtonAction,
}

impl Default for EventDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            status: EventStatus::Upcoming,
            time_left: None,
            button_text: ButtonAction::ViewDetails.label().to_string(),
            button_action: ButtonAction::ViewDetails,
        }
    }
}

impl EventDraft {
    pub fn new(title: impl Into<String>, status: EventStatus) -> Self {
        Self {
            title: title.into(),
            status,
            ..Self::default()
        }
    }

    pub fn into_record(self, id: String) -> Result<EventRecord> {
        let record = EventRecord {
            id,
            title: self.title,
            subtitle: self.subtitle,
            status: self.status,
            time_left: self.time_left,
            button_text: self.button_text,
            button_action: self.button_action,
        };
        record.validate()?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_defaults() {
        let draft = EventDraft::default();
        assert_eq!(draft.status, EventStatus::Upcoming);
        assert_eq!(draft.button_text, "View Details");
        assert_eq!(draft.button_action, ButtonAction::ViewDetails);
    }

    #[test]
    fn test_countdown_only_when_upcoming() {
        let mut event = EventDraft {
            time_left: Some("3d 2h".into()),
            ..EventDraft::new("Mainnet launch", EventStatus::Upcoming)
        }
        .into_record("event-1".into())
        .unwrap();
        assert_eq!(event.countdown(), Some("3d 2h"));

        event.status = EventStatus::Live;
        assert_eq!(event.countdown(), None);
    }

    #[test]
    fn test_empty_title_rejected() {
        assert!(EventDraft::new("   ", EventStatus::Live)
            .into_record("event-1".into())
            .is_err());
    }

    #[test]
    fn test_event_json_shape() {
        let raw = r#"{"id":"event-1","title":"Testnet","subtitle":"Phase 2","status":"coming_soon",
            "timeLeft":"","buttonText":"Join Testnet","buttonAction":"join_testnet"}"#;
        let event: EventRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(event.status, EventStatus::ComingSoon);
        assert_eq!(event.status.label(), "Coming Soon");
        assert_eq!(event.button_action, ButtonAction::JoinTestnet);
        assert_eq!(event.countdown(), None);
    }
}
