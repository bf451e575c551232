use crate::error::MigrationError;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Shock Node ID, immer in der Form `06f5d3ec-8ebf-4d32-8c1c-41e27e40b7fd`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Sharded Object Key: `06/f5/d3/06f5d3ec-...`
    pub fn shard_key(&self) -> String {
        let id = self.to_string();
        format!("{}/{}/{}/{}", &id[0..2], &id[2..4], &id[4..6], id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

impl FromStr for NodeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Parse eine ID und akzeptiere nur die kanonische Schreibweise
pub fn parse_canonical(s: &str) -> Result<NodeId, String> {
    let id: NodeId = s.parse().map_err(|e: uuid::Error| e.to_string())?;
    if id.to_string() != s {
        return Err(format!("'{}' is not in canonical form", s));
    }
    Ok(id)
}

/// Dekodiere einen Object Key zur Node ID
///
/// Die drei Präfixe müssen exakt den ersten sechs Zeichen der ID entsprechen.
pub fn decode(key: &str) -> Result<NodeId, MigrationError> {
    let segments: Vec<&str> = key.split('/').collect();
    let [a, b, c, raw] = segments[..] else {
        return Err(MigrationError::malformed_key(
            key,
            format!("expected 4 segments, found {}", segments.len()),
        ));
    };

    let id = parse_canonical(raw).map_err(|reason| MigrationError::malformed_key(key, reason))?;

    let text = id.to_string();
    for (i, prefix) in [a, b, c].into_iter().enumerate() {
        let expected = &text[i * 2..i * 2 + 2];
        if prefix != expected {
            return Err(MigrationError::malformed_key(
                key,
                format!("segment {} is '{}', expected '{}'", i, prefix, expected),
            ));
        }
    }

    Ok(id)
}
