//! In-memory Collections für Tests

use crate::storage::traits::{DocumentCollection, ObjectLister, Page};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryCollection {
    docs: Mutex<BTreeMap<String, Value>>,
    page_size: usize,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::with_page_size(2)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }

    pub fn insert(&self, key: &str, doc: Value) {
        self.docs.lock().unwrap().insert(key.to_string(), doc);
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.docs.lock().unwrap().get(key).cloned()
    }

    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.docs.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.docs.lock().unwrap().len()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn find_one(&self, key: &str) -> Result<Option<Value>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.get(key))
    }

    async fn scan_page(&self, start: Option<String>) -> Result<Page<Value>> {
        let docs = self.docs.lock().unwrap();
        let mut entries: Vec<(&String, &Value)> = match &start {
            Some(after) => docs
                .range::<String, _>((std::ops::Bound::Excluded(after), std::ops::Bound::Unbounded))
                .collect(),
            None => docs.iter().collect(),
        };
        let more = entries.len() > self.page_size;
        entries.truncate(self.page_size);
        let next = if more {
            entries.last().map(|(k, _)| (*k).clone())
        } else {
            None
        };
        Ok(Page {
            items: entries.into_iter().map(|(_, v)| v.clone()).collect(),
            next,
        })
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.len() as u64)
    }

    async fn replace_one(&self, key: &str, doc: Value) -> Result<()> {
        if !doc.is_object() {
            bail!("document for {} is not an object", key);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.insert(key, doc);
        Ok(())
    }

    async fn set_fields(&self, key: &str, fields: Map<String, Value>) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut docs = self.docs.lock().unwrap();
        let doc = docs
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let target = doc
            .as_object_mut()
            .ok_or_else(|| anyhow!("document for {} is not an object", key))?;
        for (name, value) in fields {
            target.insert(name, value);
        }
        Ok(())
    }
}

/// Object Listing mit vorgegebenen Seiten
pub struct MemoryLister {
    pages: Vec<Vec<String>>,
    pub requests: AtomicUsize,
}

impl MemoryLister {
    pub fn new(pages: Vec<Vec<&str>>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|p| p.into_iter().map(String::from).collect())
                .collect(),
            requests: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ObjectLister for MemoryLister {
    async fn list_page(&self, _bucket: &str, continuation: Option<String>) -> Result<Page<String>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let index = match continuation {
            None => 0,
            Some(token) => token.parse::<usize>()?,
        };
        let items = self.pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());
        Ok(Page { items, next })
    }
}
