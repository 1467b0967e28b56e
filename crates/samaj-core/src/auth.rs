//! Caller identity as seen by the write paths.
//!
//! An unauthenticated caller is an explicit [`Principal::Anonymous`]
//! variant, never a placeholder user id injected on auth failure —
//! protected writes reject it instead of silently attributing records to a
//! fake account.

use bson::oid::ObjectId;

use crate::error::{SamajError, SamajResult};
use crate::models::user::Role;

/// The authenticated (or explicitly unauthenticated) caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    User {
        id: ObjectId,
        society: Option<ObjectId>,
        role: Role,
    },
    Anonymous,
}

impl Principal {
    pub fn user(id: ObjectId, society: Option<ObjectId>, role: Role) -> Self {
        Self::User { id, society, role }
    }

    /// The caller's user id, if authenticated.
    pub fn actor_id(&self) -> Option<ObjectId> {
        match self {
            Self::User { id, .. } => Some(*id),
            Self::Anonymous => None,
        }
    }

    /// Require an authenticated caller; used by protected write paths.
    pub fn require_user(&self) -> SamajResult<ObjectId> {
        self.actor_id().ok_or(SamajError::Unauthenticated)
    }
}
