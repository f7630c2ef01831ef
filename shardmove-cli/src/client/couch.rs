use async_trait::async_trait;
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use serde_json::{Value, json};
use shardmove_core::{
    ClusterApi, ClusterResult, DbName, NodeId, OwnerSet, ShardId, ShardMover,
    SyncStatus,
};
use tracing::{debug, info, warn};

use super::error::ClientError;
use super::http::HttpClient;
use super::shard_doc::ShardDoc;
use crate::config::ClusterConfig;

#[derive(Debug, Deserialize)]
struct Membership {
    cluster_nodes: Vec<NodeId>,
}

#[derive(Debug, Deserialize)]
struct DbShards {
    shards: IndexMap<ShardId, Vec<NodeId>>,
}

/// CouchDB cluster API.
#[derive(Debug, Clone)]
pub struct CouchClient {
    http: HttpClient,
}

impl CouchClient {
    pub fn new(config: &ClusterConfig) -> Result<Self, ClientError> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    pub async fn shard_doc(&self, db: &str) -> Result<ShardDoc, ClientError> {
        self.http.get(&["_node", "_local", "_dbs", db]).await
    }

    pub async fn save_shard_doc(&self, db: &str, doc: &ShardDoc) -> Result<(), ClientError> {
        let _: Value = self.http.put(&["_node", "_local", "_dbs", db], doc).await?;
        Ok(())
    }
}

#[async_trait]
impl ClusterApi for CouchClient {
    async fn get_nodes(&self) -> ClusterResult<Vec<NodeId>> {
        let membership: Membership = self.http.get(&["_membership"]).await?;
        Ok(membership.cluster_nodes)
    }

    /// Distinct shard ranges over all databases.
    async fn get_shards(&self) -> ClusterResult<Vec<ShardId>> {
        let mut ranges = IndexSet::new();
        for db in self.get_dbs().await? {
            let shards: DbShards = self.http.get(&[db.as_str(), "_shards"]).await?;
            ranges.extend(shards.shards.into_keys());
        }
        Ok(ranges.into_iter().collect())
    }

    async fn get_dbs(&self) -> ClusterResult<Vec<DbName>> {
        Ok(self.http.get(&["_all_dbs"]).await?)
    }

    async fn sync_shards(&self, db: &str) -> ClusterResult<SyncStatus> {
        Ok(self.http.post(&[db, "_sync_shards"], &json!({})).await?)
    }
}

#[async_trait]
impl ShardMover for CouchClient {
    /// Rewrite the shard metadata of every database holding `shard` so that
    /// `destination` is its only owner.
    async fn move_shard(
        &self,
        shard: &str,
        destination: &str,
    ) -> ClusterResult<Vec<NodeId>> {
        let mut previous = OwnerSet::new();
        let mut found = false;
        for db in self.get_dbs().await? {
            let mut doc = self.shard_doc(&db).await?;
            let Some(reassignment) = doc.reassign(shard, destination) else {
                continue;
            };
            found = true;
            if reassignment.changed {
                if let Err(e) = self.save_shard_doc(&db, &doc).await {
                    if e.is_conflict() {
                        warn!(%db, %shard, "shard map changed while moving shard");
                    }
                    return Err(e.into());
                }
                debug!(%db, %shard, %destination, previous = ?reassignment.previous, "shard map updated");
            }
            previous.extend(reassignment.previous);
        }
        if found {
            info!(%shard, %destination, "shard moved");
        } else {
            warn!(%shard, "shard range not present in any database");
        }
        Ok(previous.into_vec())
    }
}
