//! User repository.

use bson::DateTime;
use bson::oid::ObjectId;
use bson::doc;
use samaj_core::auth::Principal;
use samaj_core::error::{SamajError, SamajResult};
use samaj_core::models::RecordStatus;
use samaj_core::models::user::{CreateUser, User};
use samaj_core::reference;
use samaj_core::store::DocumentStore;

use super::{from_doc, to_doc};

#[derive(Clone)]
pub struct UserRepository<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> UserRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: CreateUser, actor: &Principal) -> SamajResult<User> {
        let actor_id = actor.require_user()?;
        let email = input.email.to_lowercase();

        let existing = doc! { "email": &email, "isDeleted": { "$ne": true } };
        if self.store.count(User::COLLECTION, existing).await? > 0 {
            return Err(SamajError::duplicate_key("user", "email"));
        }

        let now = DateTime::now();
        let mut user = User {
            id: None,
            first_name: input.first_name,
            last_name: input.last_name.unwrap_or_default(),
            email,
            country_code: input.country_code.unwrap_or_else(|| "+91".into()),
            mobile_number: input.mobile_number,
            password_hash: None,
            role: input.role.unwrap_or_default(),
            society: input.society,
            invited: false,
            invite_token: None,
            invite_expires_at: None,
            status: RecordStatus::Active,
            is_deleted: false,
            created_by: Some(actor_id),
            created_at: now,
            updated_at: now,
        };

        let id = self.store.insert_one(User::COLLECTION, to_doc(&user)?).await?;
        user.id = Some(id);
        Ok(user)
    }

    pub async fn get(&self, id: ObjectId) -> SamajResult<User> {
        let doc = self
            .store
            .find_one(User::COLLECTION, doc! { "_id": id, "isDeleted": { "$ne": true } })
            .await?
            .ok_or_else(|| SamajError::not_found("user", id))?;
        from_doc(doc)
    }

    pub async fn find_by_email(&self, email: &str) -> SamajResult<Option<User>> {
        let doc = self
            .store
            .find_one(
                User::COLLECTION,
                doc! { "email": email.to_lowercase(), "isDeleted": { "$ne": true } },
            )
            .await?;
        doc.map(from_doc).transpose()
    }

    /// Members of a society, across every stored reference encoding.
    pub async fn list_by_society(&self, society: ObjectId) -> SamajResult<Vec<User>> {
        let mut filter = reference::parent_filter("society", &society);
        filter.insert("isDeleted", doc! { "$ne": true });
        let docs = self.store.find_many(User::COLLECTION, filter, None).await?;
        docs.into_iter().map(from_doc).collect()
    }
}
