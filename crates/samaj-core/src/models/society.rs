//! Society domain model.
//!
//! The society is the tenant root: every building, block, floor, unit,
//! parking record, and user belongs (directly or transitively) to exactly
//! one society.

use bson::DateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::RecordStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Society {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Short unique society code, e.g. `SHV-2025-A3F1`.
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub territory: String,
    #[serde(default)]
    pub address: String,
    /// The society manager's user id, linked at creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_manager: Option<ObjectId>,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Society {
    pub const COLLECTION: &'static str = "societies";
}

/// Fields required to create a new society.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSociety {
    pub name: String,
    pub territory: Option<String>,
    pub address: Option<String>,
    pub admin_manager: Option<ObjectId>,
}
