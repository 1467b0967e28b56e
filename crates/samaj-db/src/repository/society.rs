//! Society repository.

use bson::DateTime;
use bson::oid::ObjectId;
use bson::doc;
use samaj_core::auth::Principal;
use samaj_core::error::{SamajError, SamajResult};
use samaj_core::models::RecordStatus;
use samaj_core::models::society::{CreateSociety, Society};
use samaj_core::store::DocumentStore;

use super::{from_doc, to_doc};

/// Auto-generate a short society code, e.g. `SHV-2025-A3F1`.
fn generate_society_code(name: &str) -> String {
    let prefix: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .take(3)
        .collect::<String>()
        .to_uppercase();
    let prefix = if prefix.is_empty() { "SOC".into() } else { prefix };
    let year = DateTime::now().to_chrono().format("%Y");
    // Tail of a fresh ObjectId is unique enough for a display code.
    let hex = ObjectId::new().to_hex();
    let suffix = hex[20..].to_uppercase();
    format!("{prefix}-{year}-{suffix}")
}

#[derive(Clone)]
pub struct SocietyRepository<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> SocietyRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: CreateSociety, actor: &Principal) -> SamajResult<Society> {
        let actor_id = actor.require_user()?;
        if input.name.trim().is_empty() {
            return Err(SamajError::validation("society name is required"));
        }

        let now = DateTime::now();
        let mut society = Society {
            id: None,
            code: generate_society_code(&input.name),
            name: input.name,
            territory: input.territory.unwrap_or_default(),
            address: input.address.unwrap_or_default(),
            admin_manager: input.admin_manager,
            status: RecordStatus::Active,
            is_deleted: false,
            created_by: Some(actor_id),
            created_at: now,
            updated_at: now,
        };

        let id = self
            .store
            .insert_one(Society::COLLECTION, to_doc(&society)?)
            .await?;
        society.id = Some(id);
        Ok(society)
    }

    /// Fetch a live (non-deleted) society.
    pub async fn get(&self, id: ObjectId) -> SamajResult<Society> {
        let doc = self
            .store
            .find_one(
                Society::COLLECTION,
                doc! { "_id": id, "isDeleted": { "$ne": true } },
            )
            .await?
            .ok_or_else(|| SamajError::not_found("society", id))?;
        from_doc(doc)
    }

    /// Soft-delete: flips status and marks the document deleted. The
    /// subtree stays in place; contrast with the hard cascade delete.
    pub async fn archive(&self, id: ObjectId) -> SamajResult<()> {
        let matched = self
            .store
            .update_one(
                Society::COLLECTION,
                doc! { "_id": id, "isDeleted": { "$ne": true } },
                doc! { "$set": {
                    "isDeleted": true,
                    "status": "inactive",
                    "updatedAt": DateTime::now(),
                } },
            )
            .await?;
        if matched == 0 {
            return Err(SamajError::not_found("society", id));
        }
        Ok(())
    }

    /// Link the society's admin manager.
    pub async fn link_admin_manager(&self, id: ObjectId, manager: ObjectId) -> SamajResult<()> {
        let matched = self
            .store
            .update_one(
                Society::COLLECTION,
                doc! { "_id": id },
                doc! { "$set": { "adminManager": manager, "updatedAt": DateTime::now() } },
            )
            .await?;
        if matched == 0 {
            return Err(SamajError::not_found("society", id));
        }
        Ok(())
    }

    pub async fn list(&self) -> SamajResult<Vec<Society>> {
        let docs = self
            .store
            .find_many(Society::COLLECTION, doc! { "isDeleted": { "$ne": true } }, None)
            .await?;
        docs.into_iter().map(from_doc).collect()
    }
}
