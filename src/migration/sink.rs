use crate::error::MigrationError;
use crate::storage::{DocumentCollection, Keyed};
use serde::Serialize;
use std::sync::Arc;

/// Schreibe übersetzte Dokumente per vollständigem Replace
///
/// Ein erneuter Lauf über unveränderte Quelldaten erzeugt identische Dokumente.
pub struct IdempotentSink {
    target: Arc<dyn DocumentCollection>,
    written: u64,
}

impl IdempotentSink {
    pub fn new(target: Arc<dyn DocumentCollection>) -> Self {
        Self { target, written: 0 }
    }

    pub async fn put<R>(&mut self, record: &R) -> Result<(), MigrationError>
    where
        R: Keyed + Serialize + Sync,
    {
        let doc = serde_json::to_value(record)?;
        self.target.replace_one(record.key(), doc).await?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}
