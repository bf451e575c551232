use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reservierter Reader-Eintrag für öffentliche Nodes
pub const PUBLIC_READER: &str = "public";

/// Shock Node Dokument (Collection `Nodes`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShockNode {
    pub id: String,
    /// RFC 3339, wird unverändert übernommen
    pub created_on: String,
    pub file: ShockFile,
    pub acl: ShockAcl,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShockFile {
    pub name: String,
    pub size: u64,
    pub format: String,
    pub checksum: ShockChecksum,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShockChecksum {
    pub md5: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShockAcl {
    pub owner: String,
    pub read: Vec<String>,
}

/// Shock User Dokument (Collection `Users`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShockUser {
    pub uuid: String,
    pub username: String,
}

/// Aufgelöster User, eingebettet in BlobStore Nodes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRef {
    pub id: String,
    pub user: String,
}

/// BlobStore Node Dokument (Collection `nodes`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlobNode {
    pub id: String,
    pub own: UserRef,
    pub read: Vec<UserRef>,
    pub time: String,
    pub fname: String,
    pub size: u64,
    pub fmt: String,
    pub md5: String,
    #[serde(rename = "pub")]
    pub public: bool,
}

/// Workspace Shock Mapping (Collection `shock_nodeMap`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShockNodeMapping {
    pub chksum: String,
    pub node: String,
    /// Beliebiger Wert, ausgewertet nach Truthiness
    #[serde(default)]
    pub sorted: Option<Value>,
}

/// Workspace S3 Objekt (Collection `s3_objects`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct S3ObjectRecord {
    pub chksum: String,
    pub key: String,
    pub sorted: bool,
}

/// Dokumente, die per Schlüssel in eine Ziel-Collection geschrieben werden
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for BlobNode {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for S3ObjectRecord {
    fn key(&self) -> &str {
        &self.chksum
    }
}
