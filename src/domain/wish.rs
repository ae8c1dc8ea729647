//! Wish Entity
//!
//! An entry of an organization's ordered, soft-deletable wish list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::entity::Entity;

/// Opaque server-assigned identity. No ordering or numeric meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WishId(String);

impl WishId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WishId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WishId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for WishId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A wish as stored by the remote API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wish {
    /// Unique identifier
    pub id: WishId,
    /// Owning organization
    pub organization_id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub note: String,
    /// Ascending display order
    pub order_no: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete timestamp (None = active)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Wish {
    /// Active means not soft-deleted
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

impl Entity for Wish {
    type Id = WishId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of a create call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWish {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    pub title: String,
    pub note: String,
    pub order_no: i64,
}

/// Partial update; `None` fields are left unchanged on the server
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WishPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_no: Option<i64>,
}

impl WishPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn order_no(mut self, order_no: i64) -> Self {
        self.order_no = Some(order_no);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.note.is_none() && self.order_no.is_none()
    }
}

/// One entry of a reorder request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub id: WishId,
    pub order_no: i64,
}

impl OrderUpdate {
    pub fn new(id: impl Into<WishId>, order_no: i64) -> Self {
        Self {
            id: id.into(),
            order_no,
        }
    }
}

/// Reject titles that are empty once trimmed
pub fn validate_title(title: &str) -> Result<(), super::SyncError> {
    if title.trim().is_empty() {
        return Err(super::SyncError::InvalidInput(
            "title must not be empty".to_string(),
        ));
    }
    Ok(())
}
