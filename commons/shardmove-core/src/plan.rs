use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{MigrationError, MigrationResult};
use crate::model::{DestinationSpec, NodeId, NodeRemap, ShardId, ShardMap, ShardMove};
use crate::owners::OwnerSet;
use crate::traits::ClusterApi;

/// Ordered list of shard moves decided before anything is executed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationPlan {
    pub moves: Vec<ShardMove>,
    /// Reported as the outcome when no move is scheduled. Only remap plans
    /// carry one: the old owners named by the remap.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fallback: Vec<NodeId>,
}

impl MigrationPlan {
    /// Every shard goes to the same node, in discovery order.
    pub fn uniform(shards: Vec<ShardId>, destination: &str) -> Self {
        let moves = shards
            .into_iter()
            .map(|shard| ShardMove::new(shard, destination))
            .collect();
        Self {
            moves,
            fallback: Vec::new(),
        }
    }

    /// Shards whose owner is a remap key go to the mapped node. Shards of
    /// unmapped owners are left alone.
    pub fn from_remap(shard_map: &ShardMap, remap: &NodeRemap) -> Self {
        let moves = shard_map
            .iter()
            .filter_map(|(shard, owner)| {
                remap
                    .get(owner)
                    .map(|target| ShardMove::from_owner(shard.as_str(), owner.as_str(), target.as_str()))
            })
            .collect();
        let fallback = remap.keys().cloned().collect::<OwnerSet>().into_vec();
        Self { moves, fallback }
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Distinct `(from, to)` pairs in the order they first appear. Moves
    /// without a known owner are not listed.
    pub fn transitions(&self) -> Vec<(&str, &str)> {
        let mut seen = Vec::new();
        for mv in &self.moves {
            if let Some(from) = mv.from.as_deref() {
                let pair = (from, mv.to.as_str());
                if !seen.contains(&pair) {
                    seen.push(pair);
                }
            }
        }
        seen
    }
}

/// The only node of the cluster, or an error when there is not exactly one.
pub async fn resolve_sole_node<C>(cluster: &C) -> MigrationResult<NodeId>
where
    C: ClusterApi + ?Sized,
{
    let mut nodes = cluster
        .get_nodes()
        .await
        .map_err(MigrationError::discovery)?;
    debug!(?nodes, "discovered nodes");
    match nodes.len() {
        0 => Err(MigrationError::NoNodes),
        1 => Ok(nodes.remove(0)),
        _ => Err(MigrationError::AmbiguousDestination { nodes }),
    }
}

/// Resolve the destination and the shard set into a plan. Nothing is moved
/// here, so any failure leaves the cluster untouched.
pub async fn build_plan<C>(
    cluster: &C,
    destination: &DestinationSpec,
    shard_map_json: Option<&str>,
) -> MigrationResult<MigrationPlan>
where
    C: ClusterApi + ?Sized,
{
    let target = match destination {
        DestinationSpec::Remap(remap) => {
            let json = shard_map_json.ok_or(MigrationError::MissingShardMap)?;
            let shard_map = ShardMap::from_json(json)?;
            if shard_map.is_empty() {
                warn!("shard map is empty, no shard will be moved");
            }
            debug!(shards = shard_map.len(), remaps = remap.len(), "planning remap migration");
            return Ok(MigrationPlan::from_remap(&shard_map, remap));
        }
        DestinationSpec::Single(node) => node.clone(),
        DestinationSpec::Auto => resolve_sole_node(cluster).await?,
    };

    let shards = cluster
        .get_shards()
        .await
        .map_err(MigrationError::discovery)?;
    debug!(shards = shards.len(), %target, "planning uniform migration");
    Ok(MigrationPlan::uniform(shards, &target))
}
