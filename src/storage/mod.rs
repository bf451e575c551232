pub mod dynamodb;
pub mod models;
pub mod s3;
pub mod traits;

#[cfg(test)]
pub mod memory;

pub use dynamodb::DynamoDBCollection;
pub use models::{BlobNode, Keyed, S3ObjectRecord, ShockNode, ShockNodeMapping, ShockUser, UserRef};
pub use s3::S3Lister;
pub use traits::{DocumentCollection, ObjectLister, Page};

use crate::utils::Config;
use anyhow::Result;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use std::sync::Arc;

/// Alle Collections und das Object Listing eines Laufs
pub struct Stores {
    pub shock_nodes: Arc<dyn DocumentCollection>,
    pub shock_users: Arc<dyn DocumentCollection>,
    pub blob_nodes: Arc<dyn DocumentCollection>,
    pub blob_users: Arc<dyn DocumentCollection>,
    pub workspace_shock: Arc<dyn DocumentCollection>,
    pub workspace_s3: Arc<dyn DocumentCollection>,
    pub lister: Arc<dyn ObjectLister>,
}

impl Stores {
    /// Erstelle AWS Clients aus der Konfiguration
    pub async fn connect(config: &Config) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()));
        if let (Some(key), Some(secret)) = (&config.aws_access_key, &config.aws_secret_key) {
            loader = loader.credentials_provider(Credentials::new(
                key.clone(),
                secret.clone(),
                None,
                None,
                "migration-config",
            ));
        }
        let sdk_config = loader.load().await;

        let mut dynamo = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.dynamodb_endpoint {
            dynamo = dynamo.endpoint_url(endpoint);
        }
        let dynamo = aws_sdk_dynamodb::Client::from_conf(dynamo.build());

        let mut s3 = aws_sdk_s3::config::Builder::from(&sdk_config).force_path_style(true);
        if let Some(endpoint) = &config.s3_endpoint {
            s3 = s3.endpoint_url(endpoint);
        }
        let s3 = aws_sdk_s3::Client::from_conf(s3.build());

        let collection = |table: &str, key: &str| -> Arc<dyn DocumentCollection> {
            Arc::new(DynamoDBCollection::new(dynamo.clone(), table, key))
        };

        tracing::info!(
            region = %config.aws_region,
            bucket = %config.s3_bucket,
            "AWS clients initialized"
        );

        Ok(Self {
            shock_nodes: collection(&config.shock_nodes_table, "id"),
            shock_users: collection(&config.shock_users_table, "uuid"),
            blob_nodes: collection(&config.blobstore_nodes_table, "id"),
            blob_users: collection(&config.blobstore_users_table, "id"),
            workspace_shock: collection(&config.workspace_shock_table, "chksum"),
            workspace_s3: collection(&config.workspace_s3_table, "chksum"),
            lister: Arc::new(S3Lister::new(s3)),
        })
    }
}
