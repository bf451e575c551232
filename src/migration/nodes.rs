use crate::error::MigrationError;
use crate::migration::driver::Workflow;
use crate::migration::enumerator;
use crate::migration::keys::NodeId;
use crate::migration::resolver::{EntityResolver, ResolverStats};
use crate::migration::sink::IdempotentSink;
use crate::migration::translator;
use crate::storage::{DocumentCollection, ObjectLister, Stores};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;

/// Shock Nodes → BlobStore Nodes, gesteuert vom S3 Bucket Listing
pub struct NodeWorkflow {
    lister: Arc<dyn ObjectLister>,
    bucket: String,
    shock_nodes: Arc<dyn DocumentCollection>,
    resolver: EntityResolver,
}

impl NodeWorkflow {
    pub fn new(
        lister: Arc<dyn ObjectLister>,
        bucket: impl Into<String>,
        shock_nodes: Arc<dyn DocumentCollection>,
        resolver: EntityResolver,
    ) -> Self {
        Self {
            lister,
            bucket: bucket.into(),
            shock_nodes,
            resolver,
        }
    }

    pub fn from_stores(stores: &Stores, bucket: impl Into<String>) -> Self {
        Self::new(
            stores.lister.clone(),
            bucket,
            stores.shock_nodes.clone(),
            EntityResolver::new(stores.shock_users.clone(), stores.blob_users.clone()),
        )
    }
}

#[async_trait]
impl Workflow for NodeWorkflow {
    type Source = NodeId;

    fn name(&self) -> &'static str {
        "nodes"
    }

    async fn total(&self) -> Result<Option<u64>, MigrationError> {
        // S3 liefert keine Objektanzahl ohne vollständiges Listing
        Ok(None)
    }

    fn sources(&self) -> BoxStream<'static, Result<NodeId, MigrationError>> {
        enumerator::node_ids(self.lister.clone(), self.bucket.clone())
    }

    async fn migrate_one(
        &mut self,
        id: NodeId,
        sink: &mut IdempotentSink,
    ) -> Result<(), MigrationError> {
        let key = id.to_string();
        let doc = self
            .shock_nodes
            .find_one(&key)
            .await?
            .ok_or_else(|| MigrationError::MissingSourceRecord { id: key.clone() })?;

        let node = translator::parse_shock_node(&key, doc)?;
        if node.id != key {
            return Err(MigrationError::malformed_record(
                &key,
                format!("document id is '{}'", node.id),
            ));
        }

        let blob = translator::to_blob_node(node, &mut self.resolver).await?;
        sink.put(&blob).await?;
        tracing::debug!(
            node_id = %key,
            public = blob.public,
            readers = blob.read.len(),
            "Migrated node"
        );
        Ok(())
    }

    fn resolver_stats(&self) -> Option<ResolverStats> {
        Some(self.resolver.stats())
    }
}
