//! Error types for the SAMAJ system.

use thiserror::Error;

use crate::cascade::CascadeStep;
use crate::hierarchy::HierarchyLevel;

#[derive(Debug, Error)]
pub enum SamajError {
    /// A supplied id is not a well-formed document identifier.
    /// Rejected before any query runs.
    #[error("Invalid identifier: {value}")]
    InvalidIdentifier { value: String },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// A uniqueness invariant was violated on a write path.
    #[error("Duplicate key: {entity} violates {constraint}")]
    DuplicateKey { entity: String, constraint: String },

    /// A hierarchy read failed partway; no deletions were attempted.
    #[error("Hierarchy resolution failed at {level}: {source}")]
    ResolutionFailed {
        level: HierarchyLevel,
        #[source]
        source: Box<SamajError>,
    },

    /// A deletion step failed after resolution succeeded. Under an
    /// atomic scope prior steps were rolled back; under the sequential
    /// fallback they were not.
    #[error("Cascade deletion failed at {step}: {source}")]
    CascadeFailed {
        step: CascadeStep,
        #[source]
        source: Box<SamajError>,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SamajError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn duplicate_key(entity: &str, constraint: &str) -> Self {
        Self::DuplicateKey {
            entity: entity.into(),
            constraint: constraint.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn resolution(level: HierarchyLevel, source: SamajError) -> Self {
        Self::ResolutionFailed {
            level,
            source: Box::new(source),
        }
    }

    pub(crate) fn cascade(step: CascadeStep, source: SamajError) -> Self {
        Self::CascadeFailed {
            step,
            source: Box::new(source),
        }
    }
}

pub type SamajResult<T> = Result<T, SamajError>;
