//! MongoDB connection management.

use mongodb::{Client, Database};
use tracing::info;

use crate::error::DbError;

/// Configuration for connecting to MongoDB.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Connection string (e.g. `mongodb://127.0.0.1:27017`).
    pub uri: String,
    /// Database name.
    pub database: String,
    /// Whether cascade deletions may attempt multi-document transactions.
    /// Set false on standalone deployments to skip the doomed attempt.
    pub allow_transactions: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://127.0.0.1:27017".into(),
            database: "samaj".into(),
            allow_transactions: true,
        }
    }
}

impl DbConfig {
    /// Build a config from `MONGODB_URI`, `MONGODB_DB`, and `SAMAJ_TXN`
    /// (set `SAMAJ_TXN=off` on standalone deployments), falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            uri: std::env::var("MONGODB_URI").unwrap_or(defaults.uri),
            database: std::env::var("MONGODB_DB").unwrap_or(defaults.database),
            allow_transactions: std::env::var("SAMAJ_TXN")
                .map(|v| v != "off")
                .unwrap_or(defaults.allow_transactions),
        }
    }
}

/// Manages a connection to MongoDB.
#[derive(Clone)]
pub struct DbManager {
    db: Database,
    allow_transactions: bool,
}

impl DbManager {
    /// Connect to MongoDB using the provided configuration and select the
    /// configured database.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        info!(
            uri = %config.uri,
            database = %config.database,
            "Connecting to MongoDB"
        );

        let client = Client::with_uri_str(&config.uri).await?;
        let db = client.database(&config.database);

        info!("Successfully connected to MongoDB");

        Ok(Self {
            db,
            allow_transactions: config.allow_transactions,
        })
    }

    /// Returns a handle to the selected database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Build the document store backed by this connection.
    pub fn store(&self) -> crate::MongoStore {
        crate::MongoStore::with_transactions(self.db.clone(), self.allow_transactions)
    }
}
