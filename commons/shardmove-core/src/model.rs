use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::MigrationResult;

pub type NodeId = String;
/// Opaque shard token. Range tokens such as `00000000-1fffffff` are only
/// ever used as lookup keys.
pub type ShardId = String;
pub type DbName = String;

/// Old owner to new owner, in the order the pairs were supplied.
pub type NodeRemap = IndexMap<NodeId, NodeId>;

/// Snapshot of current shard ownership, keyed by shard range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShardMap(IndexMap<ShardId, NodeId>);

impl ShardMap {
    /// Parse a JSON object literal. Key order of the document is kept.
    pub fn from_json(json: &str) -> MigrationResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ShardId, &NodeId)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ShardId, NodeId)> for ShardMap {
    fn from_iter<T: IntoIterator<Item = (ShardId, NodeId)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Where shards should end up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DestinationSpec {
    /// Use the only node in the cluster.
    #[default]
    Auto,
    /// Move every shard to this node.
    Single(NodeId),
    /// Move shards owned by each key to the mapped node.
    Remap(NodeRemap),
}

impl DestinationSpec {
    pub fn from_parts(node: Option<NodeId>, remap: NodeRemap) -> Self {
        if !remap.is_empty() {
            DestinationSpec::Remap(remap)
        } else if let Some(node) = node {
            DestinationSpec::Single(node)
        } else {
            DestinationSpec::Auto
        }
    }
}

/// One scheduled shard move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShardMove {
    pub shard: ShardId,
    /// Current owner, known only when planning from a shard map.
    pub from: Option<NodeId>,
    pub to: NodeId,
}

impl ShardMove {
    pub fn new(shard: impl Into<ShardId>, to: impl Into<NodeId>) -> Self {
        Self {
            shard: shard.into(),
            from: None,
            to: to.into(),
        }
    }

    pub fn from_owner(
        shard: impl Into<ShardId>,
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
    ) -> Self {
        Self {
            shard: shard.into(),
            from: Some(from.into()),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    #[serde(default)]
    pub ok: bool,
}
