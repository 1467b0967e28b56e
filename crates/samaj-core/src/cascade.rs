//! Cascading society deletion.
//!
//! Deletes a society's full subtree bottom-up: parking dependents, units,
//! floors, blocks, buildings, users referencing the society, and finally
//! the society document. Steps run strictly in that order because each
//! step's filter is built from id sets resolved before any deletion starts.
//!
//! When the store supports multi-document transactions the whole sequence
//! runs in one atomic scope; otherwise it runs sequentially, and the report
//! flags the missing guarantee so operators can audit for orphans.

use std::fmt;

use bson::doc;
use bson::oid::ObjectId;
use tracing::warn;

use crate::dependents::{DependentCollector, ParkingDependents};
use crate::error::{SamajError, SamajResult};
use crate::hierarchy::{HierarchyResolver, SocietyTree, member_filter};
use crate::models::block::Block;
use crate::models::building::Building;
use crate::models::floor::Floor;
use crate::models::parking::{ParkingArea, ParkingAssignment, ParkingSlot};
use crate::models::society::Society;
use crate::models::unit::Unit;
use crate::models::user::User;
use crate::reference;
use crate::store::{DeleteScope, DocumentStore, ScopeMode};

/// The step at which a cascade failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStep {
    Parking,
    Units,
    Floors,
    Blocks,
    Buildings,
    Users,
    Society,
    Commit,
}

impl fmt::Display for CascadeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Parking => "parking",
            Self::Units => "units",
            Self::Floors => "floors",
            Self::Blocks => "blocks",
            Self::Buildings => "buildings",
            Self::Users => "users",
            Self::Society => "society",
            Self::Commit => "commit",
        };
        f.write_str(name)
    }
}

/// Per-collection deletion counts from one cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletedCounts {
    pub parking_assignments: u64,
    pub parking_slots: u64,
    pub parking_areas: u64,
    pub units: u64,
    pub floors: u64,
    pub blocks: u64,
    pub buildings: u64,
    pub users: u64,
}

/// Outcome of a successful cascade.
#[derive(Debug, Clone)]
pub struct CascadeReport {
    pub society: ObjectId,
    /// Whether the deletions ran under a real transaction.
    pub mode: ScopeMode,
    pub deleted: DeletedCounts,
}

impl CascadeReport {
    /// Operator-facing status line. The sequential-fallback wording is
    /// deliberately distinct from full success so partial-failure risk is
    /// auditable downstream.
    pub fn status_message(&self) -> &'static str {
        match self.mode {
            ScopeMode::Atomic => "society deleted",
            ScopeMode::Sequential => "society deleted without atomicity guarantee",
        }
    }

    /// Collections tied to the society that the cascade deliberately does
    /// not touch. Widening the cascade to cover them is a pending product
    /// decision; listing them keeps the orphaned data visible.
    pub fn orphaned_collections() -> &'static [&'static str] {
        &[
            "bills",
            "penalties",
            "complaints",
            "notices",
            "galleries",
            "events",
            "bookings",
        ]
    }
}

pub struct CascadeDeleter<'a, S: DocumentStore> {
    store: &'a S,
}

impl<'a, S: DocumentStore> CascadeDeleter<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Hard-delete a society and everything it transitively owns.
    ///
    /// Fails with `NotFound` (and deletes nothing) when the id does not
    /// resolve to an existing society — including a society already
    /// deleted by an earlier cascade.
    pub async fn delete_society(&self, id: &str) -> SamajResult<CascadeReport> {
        let society = reference::parse_object_id(id)?;

        let existing = self
            .store
            .find_one(Society::COLLECTION, doc! { "_id": society })
            .await?;
        if existing.is_none() {
            return Err(SamajError::not_found("society", id));
        }

        let tree = HierarchyResolver::new(self.store).resolve(society).await?;
        let deps = DependentCollector::new(self.store)
            .collect(society, &tree)
            .await?;

        let mut scope = self.store.begin_scope().await?;
        let mode = scope.mode();
        if mode == ScopeMode::Sequential {
            warn!(
                society = %id,
                "atomic scope unavailable; running cascade sequentially without rollback"
            );
        }

        match self.run_steps(&mut scope, &tree, &deps).await {
            Ok(deleted) => {
                self.store
                    .commit_scope(scope)
                    .await
                    .map_err(|e| SamajError::cascade(CascadeStep::Commit, e))?;
                Ok(CascadeReport {
                    society,
                    mode,
                    deleted,
                })
            }
            Err(err) => {
                // Sequential abort is a no-op; prior steps stay applied.
                if let Err(abort_err) = self.store.abort_scope(scope).await {
                    warn!(society = %id, error = %abort_err, "cascade abort failed");
                }
                Err(err)
            }
        }
    }

    async fn run_steps(
        &self,
        scope: &mut DeleteScope<S::Scope>,
        tree: &SocietyTree,
        deps: &ParkingDependents,
    ) -> SamajResult<DeletedCounts> {
        let mut deleted = DeletedCounts::default();

        deleted.parking_assignments = self
            .delete_ids(
                scope,
                CascadeStep::Parking,
                ParkingAssignment::COLLECTION,
                &deps.assignments,
            )
            .await?;
        deleted.parking_slots = self
            .delete_ids(
                scope,
                CascadeStep::Parking,
                ParkingSlot::COLLECTION,
                &deps.slots,
            )
            .await?;
        deleted.parking_areas = self
            .delete_ids(
                scope,
                CascadeStep::Parking,
                ParkingArea::COLLECTION,
                &deps.areas,
            )
            .await?;

        deleted.units = self
            .delete_ids(scope, CascadeStep::Units, Unit::COLLECTION, &tree.units)
            .await?;
        deleted.floors = self
            .delete_ids(scope, CascadeStep::Floors, Floor::COLLECTION, &tree.floors)
            .await?;
        deleted.blocks = self
            .delete_ids(scope, CascadeStep::Blocks, Block::COLLECTION, &tree.blocks)
            .await?;
        deleted.buildings = self
            .delete_ids(
                scope,
                CascadeStep::Buildings,
                Building::COLLECTION,
                &tree.buildings,
            )
            .await?;

        deleted.users = self
            .store
            .scoped_delete_many(
                scope,
                User::COLLECTION,
                reference::parent_filter("society", &tree.society),
            )
            .await
            .map_err(|e| SamajError::cascade(CascadeStep::Users, e))?;

        self.store
            .scoped_delete_many(
                scope,
                Society::COLLECTION,
                doc! { "_id": tree.society },
            )
            .await
            .map_err(|e| SamajError::cascade(CascadeStep::Society, e))?;

        Ok(deleted)
    }

    async fn delete_ids(
        &self,
        scope: &mut DeleteScope<S::Scope>,
        step: CascadeStep,
        collection: &str,
        ids: &[ObjectId],
    ) -> SamajResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.store
            .scoped_delete_many(scope, collection, member_filter("_id", ids))
            .await
            .map_err(|e| SamajError::cascade(step, e))
    }
}
