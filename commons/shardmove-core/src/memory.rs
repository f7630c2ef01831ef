#![cfg(any(test, feature = "test-utils"))]
//! Scriptable in-memory cluster that records every collaborator call.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{BoxError, ClusterResult};
use crate::model::{DbName, NodeId, ShardId, SyncStatus};
use crate::traits::{ClusterApi, ShardMover};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterCall {
    GetNodes,
    GetShards,
    GetDbs,
    SyncShards(DbName),
    MoveShard(ShardId, NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailPoint {
    GetNodes,
    GetShards,
    GetDbs,
    AnySync,
    Sync(DbName),
    AnyMove,
    Move(ShardId),
}

#[derive(Debug, Default)]
struct State {
    nodes: Vec<NodeId>,
    shards: Vec<ShardId>,
    dbs: Vec<DbName>,
    owners: HashMap<ShardId, Vec<NodeId>>,
    default_owners: Vec<NodeId>,
    failures: HashMap<FailPoint, String>,
    calls: Vec<ClusterCall>,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryCluster {
    state: Arc<Mutex<State>>,
}

impl MemoryCluster {
    pub fn new() -> Self {
        Default::default()
    }

    fn with_state(self, f: impl FnOnce(&mut State)) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    pub fn with_nodes<I, S>(self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NodeId>,
    {
        self.with_state(|s| s.nodes = nodes.into_iter().map(Into::into).collect())
    }

    pub fn with_shards<I, S>(self, shards: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ShardId>,
    {
        self.with_state(|s| s.shards = shards.into_iter().map(Into::into).collect())
    }

    pub fn with_dbs<I, S>(self, dbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<DbName>,
    {
        self.with_state(|s| s.dbs = dbs.into_iter().map(Into::into).collect())
    }

    /// Owners reported by `move_shard` for one shard.
    pub fn with_owners<I, S>(self, shard: &str, owners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NodeId>,
    {
        let owners = owners.into_iter().map(Into::into).collect();
        self.with_state(|s| {
            s.owners.insert(shard.to_string(), owners);
        })
    }

    /// Owners reported by `move_shard` for shards without explicit owners.
    pub fn with_default_owners<I, S>(self, owners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NodeId>,
    {
        self.with_state(|s| s.default_owners = owners.into_iter().map(Into::into).collect())
    }

    pub fn fail_on(self, point: FailPoint, message: &str) -> Self {
        self.with_state(|s| {
            s.failures.insert(point, message.to_string());
        })
    }

    pub fn calls(&self) -> Vec<ClusterCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn move_calls(&self) -> Vec<(ShardId, NodeId)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ClusterCall::MoveShard(shard, node) => Some((shard, node)),
                _ => None,
            })
            .collect()
    }

    pub fn sync_calls(&self) -> Vec<DbName> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ClusterCall::SyncShards(db) => Some(db),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &ClusterCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: ClusterCall, points: &[FailPoint]) -> Result<(), BoxError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match points.iter().find_map(|p| state.failures.get(p)) {
            Some(message) => Err(message.clone().into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ClusterApi for MemoryCluster {
    async fn get_nodes(&self) -> ClusterResult<Vec<NodeId>> {
        self.record(ClusterCall::GetNodes, &[FailPoint::GetNodes])?;
        Ok(self.state.lock().unwrap().nodes.clone())
    }

    async fn get_shards(&self) -> ClusterResult<Vec<ShardId>> {
        self.record(ClusterCall::GetShards, &[FailPoint::GetShards])?;
        Ok(self.state.lock().unwrap().shards.clone())
    }

    async fn get_dbs(&self) -> ClusterResult<Vec<DbName>> {
        self.record(ClusterCall::GetDbs, &[FailPoint::GetDbs])?;
        Ok(self.state.lock().unwrap().dbs.clone())
    }

    async fn sync_shards(&self, db: &str) -> ClusterResult<SyncStatus> {
        self.record(
            ClusterCall::SyncShards(db.to_string()),
            &[FailPoint::Sync(db.to_string()), FailPoint::AnySync],
        )?;
        Ok(SyncStatus { ok: true })
    }
}

#[async_trait]
impl ShardMover for MemoryCluster {
    async fn move_shard(
        &self,
        shard: &str,
        destination: &str,
    ) -> ClusterResult<Vec<NodeId>> {
        self.record(
            ClusterCall::MoveShard(shard.to_string(), destination.to_string()),
            &[FailPoint::Move(shard.to_string()), FailPoint::AnyMove],
        )?;
        let state = self.state.lock().unwrap();
        Ok(state
            .owners
            .get(shard)
            .cloned()
            .unwrap_or_else(|| state.default_owners.clone()))
    }
}
