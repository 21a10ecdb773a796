use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Draft, Patch, Record, RecordId};

/// A content category entries and people can be filed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: RecordId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Category {
    type Draft = CategoryDraft;
    type Patch = CategoryPatch;

    const TABLE: &'static str = "categories";
    const SEARCH_COLUMN: &'static str = "name";

    fn id(&self) -> RecordId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }

    fn media_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

/// Create payload for [`Category`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Draft for CategoryDraft {
    fn display_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn set_slug(&mut self, slug: String) {
        self.slug = Some(slug);
    }

    fn set_media_url(&mut self, url: String) {
        self.image_url = Some(url);
    }
}

/// Partial update payload for [`Category`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Patch for CategoryPatch {
    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn set_slug(&mut self, slug: String) {
        self.slug = Some(slug);
    }

    fn set_media_url(&mut self, url: String) {
        self.image_url = Some(url);
    }
}
