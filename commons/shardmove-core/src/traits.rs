use async_trait::async_trait;

use crate::error::ClusterResult;
use crate::model::{DbName, NodeId, ShardId, SyncStatus};

/// Read side of the cluster API plus the per-database sync trigger.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    async fn get_nodes(&self) -> ClusterResult<Vec<NodeId>>;
    async fn get_shards(&self) -> ClusterResult<Vec<ShardId>>;
    async fn get_dbs(&self) -> ClusterResult<Vec<DbName>>;
    async fn sync_shards(&self, db: &str) -> ClusterResult<SyncStatus>;
}

#[async_trait]
pub trait ShardMover: Send + Sync {
    /// Move one shard to `destination`. Returns the nodes that owned the
    /// shard before the move.
    async fn move_shard(
        &self,
        shard: &str,
        destination: &str,
    ) -> ClusterResult<Vec<NodeId>>;
}
