//! Database-specific error types and conversions.

use mongodb::error::{ErrorKind, WriteFailure};
use samaj_core::SamajError;

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for SamajError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => SamajError::NotFound { entity, id },
            DbError::Mongo(e) if is_duplicate_key(&e) => SamajError::DuplicateKey {
                entity: "document".into(),
                constraint: "unique index".into(),
            },
            DbError::Mongo(e) => SamajError::Database(e.to_string()),
        }
    }
}

/// Whether the driver error is a unique-index violation (code 11000).
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) => write.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(command) => command.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// Whether the deployment rejected a multi-document transaction
/// (standalone topology, code 20 / IllegalOperation).
pub fn is_transaction_unsupported(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Command(command) => {
            command.code == 20 || command.message.contains("Transaction numbers")
        }
        _ => err.to_string().contains("Transaction numbers"),
    }
}
