use crate::model::{DbName, NodeId, ShardId};

/// Error type carried across the collaborator seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type ClusterResult<T> = Result<T, BoxError>;

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("{source}")]
    Discovery {
        #[source]
        source: BoxError,
    },

    #[error("No nodes found.")]
    NoNodes,

    #[error("More than one node found.")]
    AmbiguousDestination { nodes: Vec<NodeId> },

    #[error("Shard map JSON is required for multi-node migration.")]
    MissingShardMap,

    #[error("Invalid shard map JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{source}")]
    Move {
        shard: ShardId,
        destination: NodeId,
        #[source]
        source: BoxError,
    },

    #[error("{source}")]
    Sync {
        db: DbName,
        #[source]
        source: BoxError,
    },
}

impl MigrationError {
    pub(crate) fn discovery(source: BoxError) -> Self {
        Self::Discovery { source }
    }

    /// True when the failure happened before any shard was touched.
    pub fn is_setup_failure(&self) -> bool {
        !matches!(self, Self::Move { .. } | Self::Sync { .. })
    }
}

pub type MigrationResult<T> = Result<T, MigrationError>;
