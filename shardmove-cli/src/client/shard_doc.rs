use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shardmove_core::{NodeId, ShardId};

/// `[action, range, node]` entry of a shard map changelog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry(pub String, pub ShardId, pub NodeId);

impl ChangelogEntry {
    pub fn add(range: &str, node: &str) -> Self {
        Self("add".to_string(), range.to_string(), node.to_string())
    }

    pub fn delete(range: &str, node: &str) -> Self {
        Self("delete".to_string(), range.to_string(), node.to_string())
    }
}

/// Per-database shard metadata document kept in the node-local `_dbs`
/// database. Fields this tool does not manage (`_id`, `_rev`,
/// `shard_suffix`, `props`, ...) are written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShardDoc {
    #[serde(default)]
    pub changelog: Vec<ChangelogEntry>,
    #[serde(default)]
    pub by_node: IndexMap<NodeId, Vec<ShardId>>,
    #[serde(default)]
    pub by_range: IndexMap<ShardId, Vec<NodeId>>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    pub previous: Vec<NodeId>,
    pub changed: bool,
}

impl ShardDoc {
    /// Make `node` the only owner of `range`. Returns `None` when this
    /// database has no such range.
    pub fn reassign(&mut self, range: &str, node: &str) -> Option<Reassignment> {
        let owners = self.by_range.get_mut(range)?;
        let previous = owners.clone();
        if previous.len() == 1 && previous[0] == node {
            return Some(Reassignment {
                previous,
                changed: false,
            });
        }

        *owners = vec![node.to_string()];
        if !previous.iter().any(|n| n == node) {
            self.changelog.push(ChangelogEntry::add(range, node));
        }
        for old in previous.iter().filter(|n| *n != node) {
            self.changelog.push(ChangelogEntry::delete(range, old));
        }
        self.rebuild_by_node();

        Some(Reassignment {
            previous,
            changed: true,
        })
    }

    fn rebuild_by_node(&mut self) {
        let mut by_node: IndexMap<NodeId, Vec<ShardId>> = IndexMap::new();
        for (range, nodes) in &self.by_range {
            for node in nodes {
                by_node.entry(node.clone()).or_default().push(range.clone());
            }
        }
        self.by_node = by_node;
    }
}
