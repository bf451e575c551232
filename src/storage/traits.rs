use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Eine Seite aus einer paginierten Abfrage
///
/// `next` ist das Fortsetzungs-Token; `None` signalisiert das Ende.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

/// Dokument-Collection mit einem einzelnen String-Schlüssel
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Lese ein Dokument per Schlüssel
    async fn find_one(&self, key: &str) -> Result<Option<Value>>;

    /// Lese eine Seite ab dem Fortsetzungs-Token
    async fn scan_page(&self, start: Option<String>) -> Result<Page<Value>>;

    /// Anzahl aller Dokumente
    async fn count(&self) -> Result<u64>;

    /// Ersetze das Dokument komplett oder lege es an
    async fn replace_one(&self, key: &str, doc: Value) -> Result<()>;

    /// Setze nur die angegebenen Felder, lege das Dokument bei Bedarf an
    async fn set_fields(&self, key: &str, fields: Map<String, Value>) -> Result<()>;
}

/// Paginiertes Listing eines Object Store Buckets
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectLister: Send + Sync {
    async fn list_page(&self, bucket: &str, continuation: Option<String>) -> Result<Page<String>>;
}
