//! Cross-cutting parking dependents of a society subtree.
//!
//! Parking records do not sit on the ownership spine: areas hang off
//! buildings or blocks, slots reference the society directly (and sometimes
//! a unit), assignments reference the society, a slot, or a unit. The
//! collector resolves all three id sets with reads only; deletion is the
//! cascade deleter's job.

use bson::Document;
use bson::oid::ObjectId;
use bson::doc;

use crate::error::{SamajError, SamajResult};
use crate::hierarchy::{HierarchyLevel, SocietyTree, member_filter};
use crate::models::parking::{ParkingArea, ParkingAssignment, ParkingSlot};
use crate::reference;
use crate::store::DocumentStore;

/// Parking record ids that would be orphaned by deleting the society.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParkingDependents {
    pub areas: Vec<ObjectId>,
    pub slots: Vec<ObjectId>,
    pub assignments: Vec<ObjectId>,
}

pub struct DependentCollector<'a, S: DocumentStore> {
    store: &'a S,
}

impl<'a, S: DocumentStore> DependentCollector<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Resolve parking areas, slots, and assignments depending on the
    /// society or any unit in its tree. A slot may reference only the
    /// society, so the unit leg alone is never sufficient.
    pub async fn collect(
        &self,
        society: ObjectId,
        tree: &SocietyTree,
    ) -> SamajResult<ParkingDependents> {
        let mut deps = ParkingDependents::default();

        if !tree.buildings.is_empty() || !tree.blocks.is_empty() {
            deps.areas = self
                .ids(
                    ParkingArea::COLLECTION,
                    any_of(vec![
                        member_branches("building", &tree.buildings),
                        member_branches("block", &tree.blocks),
                    ]),
                )
                .await?;
        }

        deps.slots = self
            .ids(
                ParkingSlot::COLLECTION,
                any_of(vec![
                    Some(reference::parent_filter("society", &society)),
                    member_branches("unit", &tree.units),
                ]),
            )
            .await?;

        deps.assignments = self
            .ids(
                ParkingAssignment::COLLECTION,
                any_of(vec![
                    Some(reference::parent_filter("society", &society)),
                    member_branches("slot", &deps.slots),
                    member_branches("unit", &tree.units),
                ]),
            )
            .await?;

        Ok(deps)
    }

    async fn ids(&self, collection: &str, filter: Document) -> SamajResult<Vec<ObjectId>> {
        let mut ids = self
            .store
            .find_ids(collection, filter)
            .await
            .map_err(|e| SamajError::resolution(HierarchyLevel::Parking, e))?;
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}

fn member_branches(field: &str, ids: &[ObjectId]) -> Option<Document> {
    if ids.is_empty() {
        None
    } else {
        Some(member_filter(field, ids))
    }
}

/// `$or` of the present branches.
fn any_of(branches: Vec<Option<Document>>) -> Document {
    let branches: Vec<Document> = branches.into_iter().flatten().collect();
    doc! { "$or": branches }
}
