use crate::error::MigrationError;
use crate::migration::driver::Workflow;
use crate::migration::enumerator;
use crate::migration::sink::IdempotentSink;
use crate::migration::translator;
use crate::storage::DocumentCollection;
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use serde_json::Value;
use std::sync::Arc;

/// Workspace Shock Mappings → S3 Objekt-Einträge
///
/// Keine User-Auflösung, Quelle und Ziel liegen im selben Store.
pub struct WorkspaceWorkflow {
    shock_map: Arc<dyn DocumentCollection>,
}

impl WorkspaceWorkflow {
    pub fn new(shock_map: Arc<dyn DocumentCollection>) -> Self {
        Self { shock_map }
    }
}

#[async_trait]
impl Workflow for WorkspaceWorkflow {
    type Source = Value;

    fn name(&self) -> &'static str {
        "workspace"
    }

    async fn total(&self) -> Result<Option<u64>, MigrationError> {
        Ok(Some(self.shock_map.count().await?))
    }

    fn sources(&self) -> BoxStream<'static, Result<Value, MigrationError>> {
        let shock_map = self.shock_map.clone();
        enumerator::paginate(move |start| {
            let shock_map = shock_map.clone();
            async move { shock_map.scan_page(start).await }
        })
        .boxed()
    }

    async fn migrate_one(
        &mut self,
        doc: Value,
        sink: &mut IdempotentSink,
    ) -> Result<(), MigrationError> {
        let record = translator::to_s3_object(doc)?;
        sink.put(&record).await
    }
}
