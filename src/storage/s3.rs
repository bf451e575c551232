use crate::storage::traits::{ObjectLister, Page};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
use aws_sdk_s3::Client;

/// S3 Object Listing (ListObjectsV2)
#[derive(Clone)]
pub struct S3Lister {
    client: Client,
}

impl S3Lister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectLister for S3Lister {
    async fn list_page(&self, bucket: &str, continuation: Option<String>) -> Result<Page<String>> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .set_continuation_token(continuation)
            .send()
            .await?;

        page_from_listing(bucket, response)
    }
}

/// Wandle eine ListObjectsV2 Antwort in eine Seite um
fn page_from_listing(bucket: &str, response: ListObjectsV2Output) -> Result<Page<String>> {
    // Leerer Bucket liefert keine Contents
    let items = response
        .contents
        .unwrap_or_default()
        .into_iter()
        .filter_map(|object| object.key)
        .collect();

    let next = if response.is_truncated.unwrap_or(false) {
        let token = response.next_continuation_token.ok_or_else(|| {
            anyhow!("Truncated listing of bucket {} without continuation token", bucket)
        })?;
        Some(token)
    } else {
        None
    };

    Ok(Page { items, next })
}
