//! Parent reference matching across historical encodings.
//!
//! The society reference field evolved through several model revisions
//! without a data migration, so stored documents reference their society as
//! a raw ObjectId, a hex string, or a `{name, logo, ref}` snapshot object
//! (whose `ref` is itself an ObjectId or a hex string). [`ParentRef`] is the
//! closed set of those shapes, and [`parent_filter`] builds a single query
//! predicate matching all of them.

use bson::oid::ObjectId;
use bson::{Document, doc};
use serde::{Deserialize, Serialize};

use crate::error::{SamajError, SamajResult};

/// An id-valued reference that may be stored as an ObjectId or its hex
/// string form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefValue {
    Id(ObjectId),
    Hex(String),
}

impl RefValue {
    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Hex(s) => ObjectId::parse_str(s).ok(),
        }
    }
}

/// Denormalized parent snapshot, the newest of the reference encodings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<RefValue>,
}

/// A parent-entity reference in any of its known stored encodings.
///
/// Decode order matters for the untagged representation: an ObjectId is
/// tried first, then a hex string, then the snapshot object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParentRef {
    Id(ObjectId),
    Hex(String),
    Snapshot(ParentSnapshot),
}

impl ParentRef {
    /// Snapshot-form constructor used by new writers.
    pub fn snapshot(name: impl Into<String>, id: ObjectId) -> Self {
        Self::Snapshot(ParentSnapshot {
            name: Some(name.into()),
            logo: None,
            reference: Some(RefValue::Id(id)),
        })
    }

    /// The referenced parent id, if the stored value carries a decodable
    /// one.
    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Hex(s) => ObjectId::parse_str(s).ok(),
            Self::Snapshot(snap) => snap.reference.as_ref().and_then(RefValue::object_id),
        }
    }

    /// Whether this reference points at `parent`, regardless of encoding.
    pub fn matches(&self, parent: &ObjectId) -> bool {
        self.object_id().is_some_and(|id| id == *parent)
    }
}

impl From<ObjectId> for ParentRef {
    fn from(id: ObjectId) -> Self {
        Self::Id(id)
    }
}

/// Validate a caller-supplied identifier before any query runs.
pub fn parse_object_id(value: &str) -> SamajResult<ObjectId> {
    ObjectId::parse_str(value).map_err(|_| SamajError::InvalidIdentifier {
        value: value.to_string(),
    })
}

/// Build a filter matching documents whose `field` references `parent` in
/// any known encoding: raw ObjectId, hex string, or nested `{ref}` in
/// either form.
pub fn parent_filter(field: &str, parent: &ObjectId) -> Document {
    let nested = format!("{field}.ref");
    doc! {
        "$or": [
            { field: parent },
            { field: parent.to_hex() },
            { &nested: parent },
            { &nested: parent.to_hex() },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{Bson, bson};

    #[test]
    fn filter_covers_all_encodings() {
        let id = ObjectId::new();
        let filter = parent_filter("society", &id);

        let branches = filter.get_array("$or").unwrap();
        assert_eq!(branches.len(), 4);
        assert_eq!(branches[0], bson!({ "society": id }));
        assert_eq!(branches[1], bson!({ "society": id.to_hex() }));
        assert_eq!(branches[2], bson!({ "society.ref": id }));
        assert_eq!(branches[3], bson!({ "society.ref": id.to_hex() }));
    }

    #[test]
    fn decodes_raw_id() {
        let id = ObjectId::new();
        let decoded: ParentRef = bson::from_bson(Bson::ObjectId(id)).unwrap();
        assert_eq!(decoded, ParentRef::Id(id));
        assert!(decoded.matches(&id));
    }

    #[test]
    fn decodes_hex_string() {
        let id = ObjectId::new();
        let decoded: ParentRef = bson::from_bson(Bson::String(id.to_hex())).unwrap();
        assert!(matches!(decoded, ParentRef::Hex(_)));
        assert!(decoded.matches(&id));
    }

    #[test]
    fn decodes_snapshot_with_object_id_ref() {
        let id = ObjectId::new();
        let decoded: ParentRef =
            bson::from_bson(bson!({ "name": "Shivaji Heights", "ref": id })).unwrap();
        assert!(decoded.matches(&id));
    }

    #[test]
    fn decodes_snapshot_with_hex_ref() {
        let id = ObjectId::new();
        let decoded: ParentRef =
            bson::from_bson(bson!({ "name": "Shivaji Heights", "ref": id.to_hex() })).unwrap();
        assert!(decoded.matches(&id));
    }

    #[test]
    fn snapshot_without_ref_matches_nothing() {
        let decoded: ParentRef = bson::from_bson(bson!({ "name": "Orphaned" })).unwrap();
        assert_eq!(decoded.object_id(), None);
        assert!(!decoded.matches(&ObjectId::new()));
    }

    #[test]
    fn mismatched_id_does_not_match() {
        let reference = ParentRef::from(ObjectId::new());
        assert!(!reference.matches(&ObjectId::new()));
    }

    #[test]
    fn rejects_malformed_identifier() {
        let err = parse_object_id("not-a-hex-id").unwrap_err();
        assert!(matches!(err, SamajError::InvalidIdentifier { .. }));
    }

    #[test]
    fn snapshot_round_trips() {
        let id = ObjectId::new();
        let original = ParentRef::snapshot("Green Acres", id);
        let encoded = bson::to_bson(&original).unwrap();
        let decoded: ParentRef = bson::from_bson(encoded).unwrap();
        assert_eq!(decoded, original);
    }
}
