use crate::error::MigrationError;
use crate::migration::keys::{self, NodeId};
use crate::storage::{ObjectLister, Page};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;

enum Cursor {
    Start,
    Next(String),
    Exhausted,
}

struct PageState<T, F> {
    fetch: F,
    buffer: VecDeque<T>,
    cursor: Cursor,
}

/// Lazy Stream über eine paginierte Quelle
///
/// Es wird immer nur eine Seite gepuffert. Die nächste Seite wird erst
/// angefordert, wenn die aktuelle leer ist.
pub fn paginate<T, F, Fut>(fetch: F) -> impl Stream<Item = Result<T, MigrationError>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = anyhow::Result<Page<T>>>,
{
    let state = PageState {
        fetch,
        buffer: VecDeque::new(),
        cursor: Cursor::Start,
    };

    stream::try_unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.buffer.pop_front() {
                return Ok::<_, MigrationError>(Some((item, state)));
            }
            let token = match std::mem::replace(&mut state.cursor, Cursor::Exhausted) {
                Cursor::Exhausted => return Ok(None),
                Cursor::Start => None,
                Cursor::Next(token) => Some(token),
            };

            let page = (state.fetch)(token).await.map_err(MigrationError::Store)?;
            tracing::debug!(items = page.items.len(), more = page.next.is_some(), "Fetched page");
            if let Some(next) = page.next {
                state.cursor = Cursor::Next(next);
            }
            state.buffer.extend(page.items);
        }
    })
}

/// Alle Node IDs aus dem Bucket Listing, dekodiert und validiert
pub fn node_ids(
    lister: Arc<dyn ObjectLister>,
    bucket: String,
) -> BoxStream<'static, Result<NodeId, MigrationError>> {
    paginate(move |token| {
        let lister = lister.clone();
        let bucket = bucket.clone();
        async move { lister.list_page(&bucket, token).await }
    })
    .map(|key| key.and_then(|key| keys::decode(&key)))
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryLister;
    use crate::storage::traits::MockObjectLister;
    use futures::TryStreamExt;
    use std::sync::atomic::Ordering;

    const A: &str = "06/f5/d3/06f5d3ec-8ebf-4d32-8c1c-41e27e40b7fd";
    const B: &str = "7a/00/1c/7a001c44-1b6a-4e55-a4ee-0a5a8b0fa9b2";
    const C: &str = "ff/12/9e/ff129e30-6d58-4a2b-9c7e-3f0d0c9a1e77";

    #[tokio::test]
    async fn test_walks_all_pages() {
        let lister = Arc::new(MemoryLister::new(vec![vec![A, B], vec![], vec![C]]));
        let ids: Vec<NodeId> = node_ids(lister.clone(), "blobstore".into())
            .try_collect()
            .await
            .unwrap();

        let keys: Vec<String> = ids.iter().map(NodeId::shard_key).collect();
        assert_eq!(keys, vec![A, B, C]);
        assert_eq!(lister.requests.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_pages_fetched_lazily() {
        let lister = Arc::new(MemoryLister::new(vec![vec![A], vec![B]]));
        let mut ids = node_ids(lister.clone(), "blobstore".into());

        let first = ids.try_next().await.unwrap().unwrap();
        assert_eq!(first.shard_key(), A);
        assert_eq!(lister.requests.load(Ordering::SeqCst), 1);

        ids.try_next().await.unwrap().unwrap();
        assert_eq!(lister.requests.load(Ordering::SeqCst), 2);
        assert!(ids.try_next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_bucket() {
        let lister = Arc::new(MemoryLister::new(vec![vec![]]));
        let ids: Vec<NodeId> = node_ids(lister, "blobstore".into()).try_collect().await.unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_key_surfaces_in_order() {
        let bad = "06/f5/d4/06f5d3ec-8ebf-4d32-8c1c-41e27e40b7fd";
        let lister = Arc::new(MemoryLister::new(vec![vec![A, bad, B]]));
        let mut ids = node_ids(lister, "blobstore".into());

        assert!(ids.try_next().await.unwrap().is_some());
        assert!(matches!(
            ids.try_next().await,
            Err(MigrationError::MalformedKey { .. })
        ));
    }

    #[tokio::test]
    async fn test_listing_error_propagates() {
        let mut lister = MockObjectLister::new();
        lister
            .expect_list_page()
            .withf(|bucket, token| bucket == "blobstore" && token.is_none())
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("connection reset")));

        let mut ids = node_ids(Arc::new(lister), "blobstore".into());
        assert!(matches!(ids.try_next().await, Err(MigrationError::Store(_))));
    }
}
