use thiserror::Error;

use crate::migration::DriverState;

/// Fehler, die einen Migrationslauf abbrechen
///
/// Jede Variante ist fatal für den ganzen Lauf. Recovery: Ursache beheben
/// und den kompletten Job erneut starten.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("illegal object key '{key}': {reason}")]
    MalformedKey { key: String, reason: String },

    #[error("missing legacy record for listed object {id}")]
    MissingSourceRecord { id: String },

    #[error("missing legacy user {id}")]
    MissingReferencedEntity { id: String },

    #[error("malformed legacy record {id}: {reason}")]
    MalformedSourceRecord { id: String, reason: String },

    #[error("failed to encode target document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("migration driver is {0:?}, expected Idle")]
    NotIdle(DriverState),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl MigrationError {
    pub fn malformed_key(key: &str, reason: impl Into<String>) -> Self {
        MigrationError::MalformedKey {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn malformed_record(id: &str, reason: impl ToString) -> Self {
        MigrationError::MalformedSourceRecord {
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }
}
