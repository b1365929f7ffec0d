/**
 * Documents
 *
 * Canvas documents and their permission model. A document has one
 * owner and a list of collaborators, each with read or write access.
 * The owner is implicitly write-capable and never appears in the
 * collaborator list; a collaborator appears at most once.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod db;
pub mod handlers;

/// Access level granted to a collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// May see the document and receive updates
    Read,
    /// May also mutate the document
    Write,
}

impl AccessLevel {
    /// Parse a stored access name, `None` for unknown values
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "read" => Some(Self::Read),
            "write" => Some(Self::Write),
            _ => None,
        }
    }

    /// Canonical name stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

/// One collaborator entry on a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collaborator {
    /// The collaborating user
    pub user_id: Uuid,
    /// Granted access level
    pub access: AccessLevel,
}

/// A canvas document with its permission state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Owning user
    pub owner_id: Uuid,
    /// Display title
    pub title: String,
    /// Last persisted content
    pub content: String,
    /// Collaborator list (never contains the owner)
    pub collaborators: Vec<Collaborator>,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Whether `identity` may mutate this document.
    ///
    /// True for the owner and for collaborators holding write access.
    pub fn can_edit(&self, identity: &str) -> bool {
        let Ok(user_id) = Uuid::parse_str(identity) else {
            return false;
        };
        if user_id == self.owner_id {
            return true;
        }
        self.collaborators
            .iter()
            .any(|c| c.user_id == user_id && c.access == AccessLevel::Write)
    }

    /// Whether `identity` may see this document.
    ///
    /// True for the owner and for any collaborator.
    pub fn can_read(&self, identity: &str) -> bool {
        let Ok(user_id) = Uuid::parse_str(identity) else {
            return false;
        };
        user_id == self.owner_id || self.collaborators.iter().any(|c| c.user_id == user_id)
    }
}
