use crate::error::MigrationError;
use crate::migration::keys;
use crate::migration::resolver::EntityResolver;
use crate::storage::models::PUBLIC_READER;
use crate::storage::{BlobNode, S3ObjectRecord, ShockNode, ShockNodeMapping};
use chrono::DateTime;
use serde_json::Value;

/// Dekodiere ein Shock Node Dokument
///
/// `created_on` muss RFC 3339 sein, bleibt aber als Originaltext erhalten.
pub fn parse_shock_node(id: &str, doc: Value) -> Result<ShockNode, MigrationError> {
    let node: ShockNode =
        serde_json::from_value(doc).map_err(|e| MigrationError::malformed_record(id, e))?;
    DateTime::parse_from_rfc3339(&node.created_on)
        .map_err(|e| MigrationError::malformed_record(id, format!("created_on: {}", e)))?;
    Ok(node)
}

/// Entferne den Public-Marker aus der Reader-Liste
///
/// Gibt `true` zurück, wenn der Marker mindestens einmal vorkam.
pub fn strip_public(readers: &mut Vec<String>) -> bool {
    let before = readers.len();
    readers.retain(|r| r != PUBLIC_READER);
    readers.len() != before
}

/// Übersetze einen Shock Node in einen BlobStore Node
pub async fn to_blob_node(
    node: ShockNode,
    resolver: &mut EntityResolver,
) -> Result<BlobNode, MigrationError> {
    let ShockNode {
        id,
        created_on,
        file,
        acl,
    } = node;

    let mut readers = acl.read;
    let public = strip_public(&mut readers);

    let own = resolver.resolve(&acl.owner).await?;
    let mut read = Vec::with_capacity(readers.len());
    for reader in &readers {
        read.push(resolver.resolve(reader).await?);
    }

    Ok(BlobNode {
        id,
        own,
        read,
        time: created_on,
        fname: file.name,
        size: file.size,
        fmt: file.format,
        md5: file.checksum.md5,
        public,
    })
}

/// Leere Werte (null, false, 0, "", [], {}) gelten als falsch
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(list) => !list.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Übersetze ein Workspace Mapping in einen S3 Objekt-Eintrag
pub fn to_s3_object(doc: Value) -> Result<S3ObjectRecord, MigrationError> {
    let label = doc
        .get("chksum")
        .and_then(Value::as_str)
        .unwrap_or("<unknown>")
        .to_string();
    let mapping: ShockNodeMapping =
        serde_json::from_value(doc).map_err(|e| MigrationError::malformed_record(&label, e))?;
    let node = keys::parse_canonical(&mapping.node)
        .map_err(|reason| MigrationError::malformed_record(&label, reason))?;

    Ok(S3ObjectRecord {
        chksum: mapping.chksum,
        key: node.shard_key(),
        sorted: mapping.sorted.as_ref().map_or(false, is_truthy),
    })
}
