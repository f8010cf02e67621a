//! Records exchanged with the snippet service and the form state that produces them.

use crate::config::DEFAULT_LIMIT;
use crate::error::{ClientError, Result};
use chrono::{DateTime, Local, Utc};
use std::num::IntErrorKind;
use serde::{Deserialize, Deserializer, Serialize};

/// A snippet as stored by the backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snippet {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub language: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

// Some stored records carry `"tags": null`; treat it like a missing key.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Snippet {
    /// Reject records that decode but break the schema.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(ClientError::InvalidSnippet("missing _id".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(ClientError::InvalidSnippet(format!(
                "snippet {} has an empty title",
                self.id
            )));
        }
        if self.language.trim().is_empty() {
            return Err(ClientError::InvalidSnippet(format!(
                "snippet {} has an empty language",
                self.id
            )));
        }
        Ok(())
    }

    /// Description, treating an empty string the same as an absent one.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    pub fn formatted_created_at(&self) -> String {
        match self.created_at {
            Some(created_at) => created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            None => "Unknown".to_string(),
        }
    }
}

/// Payload of a create request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NewSnippet {
    pub title: String,
    pub language: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// Error document returned alongside a failed create.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Query criteria for a list request. `None` fields are left out of the URL.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub language: Option<String>,
    pub limit: Option<u32>,
}

impl FilterCriteria {
    pub fn new(language: Option<String>, limit: Option<u32>) -> Self {
        Self {
            language: language.filter(|l| !l.is_empty()),
            limit: limit.filter(|l| *l > 0),
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.language.is_none() && self.limit.is_none()
    }
}

/// The search and filter inputs as the user sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterForm {
    pub language: String,
    pub limit: Option<u32>,
}

impl Default for FilterForm {
    fn default() -> Self {
        Self {
            language: String::new(),
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

impl FilterForm {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(Some(self.language.clone()), self.limit)
    }

    /// Parse the raw limit input. Anything that is not a number clears it;
    /// a number too large for `u32` saturates.
    pub fn set_limit_input(&mut self, value: &str) {
        self.limit = match value.trim().parse::<u32>() {
            Ok(limit) => Some(limit),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u32::MAX),
            Err(_) => None,
        };
    }

    pub fn limit_input(&self) -> String {
        self.limit.map(|l| l.to_string()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Title,
    Language,
    Code,
    Description,
    Tags,
}

impl DraftField {
    pub const ALL: [DraftField; 5] = [
        DraftField::Title,
        DraftField::Language,
        DraftField::Code,
        DraftField::Description,
        DraftField::Tags,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DraftField::Title => "Title",
            DraftField::Language => "Language",
            DraftField::Code => "Code",
            DraftField::Description => "Description",
            DraftField::Tags => "Tags",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(
            self,
            DraftField::Title | DraftField::Language | DraftField::Code
        )
    }

    pub fn is_multiline(self) -> bool {
        matches!(self, DraftField::Code | DraftField::Description)
    }
}

/// The create-snippet form. Every field is raw user text.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DraftForm {
    pub title: String,
    pub language: String,
    pub code: String,
    pub description: String,
    pub tags: String,
}

impl DraftForm {
    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Title => &self.title,
            DraftField::Language => &self.language,
            DraftField::Code => &self.code,
            DraftField::Description => &self.description,
            DraftField::Tags => &self.tags,
        }
    }

    pub fn set(&mut self, field: DraftField, value: String) {
        match field {
            DraftField::Title => self.title = value,
            DraftField::Language => self.language = value,
            DraftField::Code => self.code = value,
            DraftField::Description => self.description = value,
            DraftField::Tags => self.tags = value,
        }
    }

    /// Required fields that are still empty, in form order.
    pub fn missing_required(&self) -> Vec<DraftField> {
        DraftField::ALL
            .into_iter()
            .filter(|field| field.is_required() && self.get(*field).is_empty())
            .collect()
    }

    /// Build the create payload. Required fields are not checked here.
    pub fn to_new_snippet(&self) -> NewSnippet {
        NewSnippet {
            title: self.title.clone(),
            language: self.language.clone(),
            code: self.code.clone(),
            description: Some(self.description.clone()).filter(|d| !d.is_empty()),
            tags: parse_tags(&self.tags),
        }
    }
}

/// Split a comma-separated tag list, trimming and dropping empty segments.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
