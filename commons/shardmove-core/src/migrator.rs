use std::sync::Arc;

use tracing::{debug, error, info};

use crate::error::{MigrationError, MigrationResult};
use crate::model::{DestinationSpec, NodeId};
use crate::owners::OwnerSet;
use crate::plan::{MigrationPlan, build_plan};
use crate::traits::{ClusterApi, ShardMover};

/// Drives shard reassignment and the post-migration sync sweep. All
/// collaborator calls are issued one at a time and the first failure stops
/// the operation.
pub struct ShardMigrator<C, M> {
    cluster: Arc<C>,
    mover: Arc<M>,
}

impl<T> ShardMigrator<T, T>
where
    T: ClusterApi + ShardMover,
{
    /// Use one client for both discovery and moves.
    pub fn from_client(client: Arc<T>) -> Self {
        Self::new(Arc::clone(&client), client)
    }
}

impl<C, M> ShardMigrator<C, M>
where
    C: ClusterApi,
    M: ShardMover,
{
    pub fn new(cluster: Arc<C>, mover: Arc<M>) -> Self {
        Self { cluster, mover }
    }

    pub async fn plan(
        &self,
        destination: &DestinationSpec,
        shard_map_json: Option<&str>,
    ) -> MigrationResult<MigrationPlan> {
        build_plan(self.cluster.as_ref(), destination, shard_map_json).await
    }

    /// Run a plan and return the distinct previous owners of the moved
    /// shards in first-seen order.
    pub async fn execute(&self, plan: MigrationPlan) -> MigrationResult<Vec<NodeId>> {
        for (from, to) in plan.transitions() {
            info!("Migrating from {from} to {to}");
            for mv in plan.moves.iter().filter(|mv| {
                mv.from.as_deref() == Some(from) && mv.to == to
            }) {
                info!("Moving shard {} from {} to {}", mv.shard, from, to);
            }
        }

        if plan.is_empty() {
            debug!(fallback = ?plan.fallback, "no shard scheduled for move");
            return Ok(plan.fallback);
        }

        let mut owners = OwnerSet::new();
        for mv in plan.moves {
            debug!(shard = %mv.shard, destination = %mv.to, "moving shard");
            let previous = match self.mover.move_shard(&mv.shard, &mv.to).await {
                Ok(previous) => previous,
                Err(source) => {
                    error!(shard = %mv.shard, destination = %mv.to, error = %source, "shard move failed");
                    return Err(MigrationError::Move {
                        shard: mv.shard,
                        destination: mv.to,
                        source,
                    });
                }
            };
            owners.extend(previous);
        }
        Ok(owners.into_vec())
    }

    /// Reassign shards according to `destination`.
    pub async fn move_node(
        &self,
        destination: &DestinationSpec,
        shard_map_json: Option<&str>,
    ) -> MigrationResult<Vec<NodeId>> {
        let plan = self.plan(destination, shard_map_json).await?;
        self.execute(plan).await
    }

    /// Trigger a shard sync on every database, in discovery order.
    pub async fn sync_shards(&self) -> MigrationResult<()> {
        let dbs = self
            .cluster
            .get_dbs()
            .await
            .map_err(MigrationError::discovery)?;
        for db in dbs {
            match self.cluster.sync_shards(&db).await {
                Ok(status) => debug!(%db, ok = status.ok, "synced shards"),
                Err(source) => {
                    error!(%db, error = %source, "shard sync failed");
                    return Err(MigrationError::Sync { db, source });
                }
            }
        }
        Ok(())
    }
}
