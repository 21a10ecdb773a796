use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Draft, Patch, Record, RecordId};

/// A historical figure with a biography page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: RecordId,
    pub name: String,
    pub slug: String,
    pub biography: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub death_date: Option<NaiveDate>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub profession: Option<String>,
    /// `DD-MM` key for the "born on this day" listings.
    pub day_month: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub author_id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Person {
    type Draft = PersonDraft;
    type Patch = PersonPatch;

    const TABLE: &'static str = "people";
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

/// Create payload for [`Person`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct PersonDraft {
    pub name: String,
    pub biography: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    pub day_month: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Draft for PersonDraft {
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

/// Partial update payload for [`Person`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct PersonPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Patch for PersonPatch {
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
