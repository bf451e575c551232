use crate::error::MigrationError;
use crate::storage::{DocumentCollection, ShockUser, UserRef};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Zähler für Cache-Treffer und Legacy-Lesezugriffe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    pub legacy_reads: u64,
    pub cache_hits: u64,
}

/// Löse Shock User IDs zu BlobStore Usern auf
///
/// Jeder User wird pro Lauf höchstens einmal aus Shock gelesen und einmal
/// in BlobStore gespiegelt. Der Cache lebt nur so lange wie der Resolver.
pub struct EntityResolver {
    legacy_users: Arc<dyn DocumentCollection>,
    target_users: Arc<dyn DocumentCollection>,
    seen: HashMap<String, String>,
    stats: ResolverStats,
}

impl EntityResolver {
    pub fn new(
        legacy_users: Arc<dyn DocumentCollection>,
        target_users: Arc<dyn DocumentCollection>,
    ) -> Self {
        Self {
            legacy_users,
            target_users,
            seen: HashMap::new(),
            stats: ResolverStats::default(),
        }
    }

    pub async fn resolve(&mut self, id: &str) -> Result<UserRef, MigrationError> {
        if let Some(name) = self.seen.get(id) {
            self.stats.cache_hits += 1;
            return Ok(UserRef {
                id: id.to_string(),
                user: name.clone(),
            });
        }

        self.stats.legacy_reads += 1;
        let doc = self
            .legacy_users
            .find_one(id)
            .await?
            .ok_or_else(|| MigrationError::MissingReferencedEntity { id: id.to_string() })?;
        let user: ShockUser =
            serde_json::from_value(doc).map_err(|e| MigrationError::malformed_record(id, e))?;

        // Nur den Namen setzen, bestehende Felder bleiben erhalten
        let mut fields = Map::new();
        fields.insert("user".to_string(), Value::String(user.username.clone()));
        self.target_users.set_fields(id, fields).await?;

        tracing::debug!(user_id = %id, username = %user.username, "Mirrored user");
        self.seen.insert(id.to_string(), user.username.clone());

        Ok(UserRef {
            id: id.to_string(),
            user: user.username,
        })
    }

    pub fn stats(&self) -> ResolverStats {
        self.stats
    }

    pub fn cached(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryCollection;
    use crate::storage::traits::MockDocumentCollection;
    use serde_json::json;

    #[tokio::test]
    async fn test_resolves_once_per_user() {
        let mut legacy = MockDocumentCollection::new();
        legacy
            .expect_find_one()
            .withf(|key| key == "u1")
            .times(1)
            .returning(|_| Ok(Some(json!({"uuid": "u1", "username": "alice"}))));

        let mut target = MockDocumentCollection::new();
        target
            .expect_set_fields()
            .withf(|key, fields| {
                key == "u1" && fields.get("user") == Some(&json!("alice")) && fields.len() == 1
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let mut resolver = EntityResolver::new(Arc::new(legacy), Arc::new(target));
        for _ in 0..5 {
            let user = resolver.resolve("u1").await.unwrap();
            assert_eq!(user, UserRef { id: "u1".into(), user: "alice".into() });
        }

        assert_eq!(resolver.stats(), ResolverStats { legacy_reads: 1, cache_hits: 4 });
        assert_eq!(resolver.cached(), 1);
    }

    #[tokio::test]
    async fn test_missing_user() {
        let legacy = Arc::new(MemoryCollection::new());
        let mut target = MockDocumentCollection::new();
        target.expect_set_fields().never();

        let mut resolver = EntityResolver::new(legacy, Arc::new(target));
        match resolver.resolve("ghost").await {
            Err(MigrationError::MissingReferencedEntity { id }) => assert_eq!(id, "ghost"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_existing_target_fields_untouched() {
        let legacy = Arc::new(MemoryCollection::new());
        legacy.insert("u1", json!({"uuid": "u1", "username": "alice"}));
        let target = Arc::new(MemoryCollection::new());
        target.insert("u1", json!({"id": "u1", "user": "old", "roles": ["admin"]}));

        let mut resolver = EntityResolver::new(legacy, target.clone());
        resolver.resolve("u1").await.unwrap();

        assert_eq!(
            target.get("u1").unwrap(),
            json!({"id": "u1", "user": "alice", "roles": ["admin"]})
        );
    }

    #[test]
    fn test_malformed_user() {
        let legacy = Arc::new(MemoryCollection::new());
        legacy.insert("u1", json!({"uuid": "u1"}));
        let mut resolver = EntityResolver::new(legacy, Arc::new(MemoryCollection::new()));

        assert!(matches!(
            tokio_test::block_on(resolver.resolve("u1")),
            Err(MigrationError::MalformedSourceRecord { .. })
        ));
    }
}
