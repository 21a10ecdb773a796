use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Draft, Patch, Record, RecordId};

/// Kind of media a [`Resource`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
    Document,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
            Self::Document => write!(f, "document"),
        }
    }
}

/// A media attachment belonging to an event.
///
/// The `url` field is the record's media slot: it is populated by the store
/// from an uploaded blob, and the blob's lifecycle follows the resource row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: RecordId,
    pub event_id: RecordId,
    pub media_type: MediaType,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    pub author_id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Resource {
    type Draft = ResourceDraft;
    type Patch = ResourcePatch;

    const TABLE: &'static str = "resources";
    const SEARCH_COLUMN: &'static str = "source";

    fn id(&self) -> RecordId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn media_url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

/// Create payload for [`Resource`]. Resources have no display name, so no
/// slug is derived for them.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceDraft {
    pub event_id: RecordId,
    pub media_type: MediaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Draft for ResourceDraft {
    fn set_media_url(&mut self, url: String) {
        self.url = Some(url);
    }
}

/// Partial update payload for [`Resource`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourcePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Patch for ResourcePatch {
    fn set_media_url(&mut self, url: String) {
        self.url = Some(url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MediaType::Image).unwrap(), "\"image\"");
        assert_eq!(
            serde_json::from_str::<MediaType>("\"document\"").unwrap(),
            MediaType::Document
        );
    }
}
