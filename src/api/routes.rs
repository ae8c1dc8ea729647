//! Route Table
//!
//! Paths are relative to the configured API base.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

use crate::config::CreateRoute;
use crate::domain::WishId;

/// Ids are opaque, so anything outside the unreserved set is escaped
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Which collection a list call reads
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// `/organizations/{id}/wishes`
    Organization(String),
    /// `/wishes`
    All,
}

impl Scope {
    pub fn organization(id: impl Into<String>) -> Self {
        Scope::Organization(id.into())
    }

    pub fn organization_id(&self) -> Option<&str> {
        match self {
            Scope::Organization(id) => Some(id),
            Scope::All => None,
        }
    }

    pub fn list_path(&self) -> String {
        match self {
            Scope::Organization(id) => format!("/organizations/{}/wishes", segment(id)),
            Scope::All => "/wishes".to_string(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Organization(id) => write!(f, "organization {}", id),
            Scope::All => f.write_str("all wishes"),
        }
    }
}

fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

pub fn create_path(route: CreateRoute) -> &'static str {
    match route {
        CreateRoute::Wishes => "/wishes",
        CreateRoute::Wish => "/wish",
    }
}

pub fn wish_path(id: &WishId) -> String {
    format!("/wishes/{}", segment(id.as_str()))
}

pub fn soft_delete_path(id: &WishId) -> String {
    format!("{}/soft-delete", wish_path(id))
}

pub fn restore_path(id: &WishId) -> String {
    format!("{}/restore", wish_path(id))
}

pub fn order_path(id: &WishId) -> String {
    format!("{}/order", wish_path(id))
}
