//! Society hierarchy resolution.
//!
//! Walks society → buildings → blocks → floors → units top-down, collecting
//! each level's id set. The society leg goes through the reference matcher;
//! the deeper levels use direct parent-id references, which have stayed
//! consistent.

use std::fmt;

use bson::oid::ObjectId;
use bson::{Document, doc};

use crate::error::{SamajError, SamajResult};
use crate::models::block::Block;
use crate::models::building::Building;
use crate::models::floor::Floor;
use crate::models::unit::Unit;
use crate::reference;
use crate::store::DocumentStore;

/// The level at which a hierarchy read failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyLevel {
    Buildings,
    Blocks,
    Floors,
    Units,
    Parking,
}

impl fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Buildings => "buildings",
            Self::Blocks => "blocks",
            Self::Floors => "floors",
            Self::Units => "units",
            Self::Parking => "parking",
        };
        f.write_str(name)
    }
}

/// Deduplicated id sets for every level under one society. Ordering is not
/// significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocietyTree {
    pub society: ObjectId,
    pub buildings: Vec<ObjectId>,
    pub blocks: Vec<ObjectId>,
    pub floors: Vec<ObjectId>,
    pub units: Vec<ObjectId>,
}

impl SocietyTree {
    fn empty(society: ObjectId) -> Self {
        Self {
            society,
            buildings: Vec::new(),
            blocks: Vec::new(),
            floors: Vec::new(),
            units: Vec::new(),
        }
    }
}

/// `{field: {$in: ids}}` membership filter.
pub(crate) fn member_filter(field: &str, ids: &[ObjectId]) -> Document {
    doc! { field: { "$in": ids.to_vec() } }
}

pub struct HierarchyResolver<'a, S: DocumentStore> {
    store: &'a S,
}

impl<'a, S: DocumentStore> HierarchyResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Resolve the full descendant id tree of `society`.
    ///
    /// An empty id set at any level short-circuits all deeper levels; a
    /// query failure aborts the whole resolution with
    /// [`SamajError::ResolutionFailed`] carrying the failing level.
    pub async fn resolve(&self, society: ObjectId) -> SamajResult<SocietyTree> {
        let mut tree = SocietyTree::empty(society);

        tree.buildings = self
            .level(
                HierarchyLevel::Buildings,
                Building::COLLECTION,
                reference::parent_filter("society", &society),
            )
            .await?;
        if tree.buildings.is_empty() {
            return Ok(tree);
        }

        tree.blocks = self
            .level(
                HierarchyLevel::Blocks,
                Block::COLLECTION,
                member_filter("building", &tree.buildings),
            )
            .await?;
        if tree.blocks.is_empty() {
            return Ok(tree);
        }

        tree.floors = self
            .level(
                HierarchyLevel::Floors,
                Floor::COLLECTION,
                member_filter("block", &tree.blocks),
            )
            .await?;
        if tree.floors.is_empty() {
            return Ok(tree);
        }

        tree.units = self
            .level(
                HierarchyLevel::Units,
                Unit::COLLECTION,
                member_filter("floor", &tree.floors),
            )
            .await?;

        Ok(tree)
    }

    async fn level(
        &self,
        level: HierarchyLevel,
        collection: &str,
        filter: Document,
    ) -> SamajResult<Vec<ObjectId>> {
        let mut ids = self
            .store
            .find_ids(collection, filter)
            .await
            .map_err(|e| SamajError::resolution(level, e))?;
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}
