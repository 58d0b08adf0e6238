use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::{Address, Pubkey};

/// Запись о публикации. Существует только в момент рассылки и нигде не
/// сохраняется.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub publisher: Pubkey,
    pub hub: Address,
    pub topic: String,
    pub message: String,
    /// Адресат в режиме рассылки по подписчикам; `None` в режиме хаба.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriber: Option<Pubkey>,
}

/// Событие, испускаемое программой.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ProgramEvent {
    Publication(Publication),
    HubCreated {
        owner: Pubkey,
        hub: Address,
        created_at: i64,
    },
    HubClosed {
        owner: Pubkey,
        hub: Address,
        refunded: u64,
    },
    Subscribed {
        subscriber: Pubkey,
        hub: Address,
        topic: String,
    },
    TopicCreated {
        owner: Pubkey,
        topic: String,
        index: usize,
    },
    TopicRemoved {
        owner: Pubkey,
        topic: String,
        index: usize,
    },
}

/// Вид события; по нему слушатели выбирают, что получать.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Publication,
    HubCreated,
    HubClosed,
    Subscribed,
    TopicCreated,
    TopicRemoved,
}

impl ProgramEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ProgramEvent::Publication(_) => EventKind::Publication,
            ProgramEvent::HubCreated { .. } => EventKind::HubCreated,
            ProgramEvent::HubClosed { .. } => EventKind::HubClosed,
            ProgramEvent::Subscribed { .. } => EventKind::Subscribed,
            ProgramEvent::TopicCreated { .. } => EventKind::TopicCreated,
            ProgramEvent::TopicRemoved { .. } => EventKind::TopicRemoved,
        }
    }

    pub fn as_publication(&self) -> Option<&Publication> {
        match self {
            ProgramEvent::Publication(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_publication(self) -> Option<Publication> {
        match self {
            ProgramEvent::Publication(p) => Some(p),
            _ => None,
        }
    }
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Publication => "publication",
            EventKind::HubCreated => "hubCreated",
            EventKind::HubClosed => "hubClosed",
            EventKind::Subscribed => "subscribed",
            EventKind::TopicCreated => "topicCreated",
            EventKind::TopicRemoved => "topicRemoved",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "publication" => Ok(EventKind::Publication),
            "hubCreated" => Ok(EventKind::HubCreated),
            "hubClosed" => Ok(EventKind::HubClosed),
            "subscribed" => Ok(EventKind::Subscribed),
            "topicCreated" => Ok(EventKind::TopicCreated),
            "topicRemoved" => Ok(EventKind::TopicRemoved),
            other => Err(format!("unknown event kind '{other}'")),
        }
    }
}
