//! Block domain model.

use bson::DateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::RecordStatus;

/// A named block (wing) within a building. Block names are unique per
/// building.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub building: ObjectId,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Block {
    pub const COLLECTION: &'static str = "blocks";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBlock {
    pub name: String,
    pub building: ObjectId,
}
