use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use shardmove_core::{
    ClusterApi, DestinationSpec, MigrationPlan, NodeId, ShardMigrator, ShardMover,
};

use crate::client::CouchClient;
use crate::config::ClusterConfig;
use crate::output::{OutputFormat, render_nodes, render_plan};
use crate::types::{ConnectionArgs, MoveNodeOperation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveNodeOutcome {
    /// Dry run: what would be moved.
    Planned(MigrationPlan),
    /// Previous owners of the moved shards.
    Moved(Vec<NodeId>),
}

impl MoveNodeOutcome {
    pub fn render(&self, format: OutputFormat) -> anyhow::Result<String> {
        match self {
            MoveNodeOutcome::Planned(plan) => render_plan(plan, format),
            MoveNodeOutcome::Moved(nodes) => render_nodes(nodes, format),
        }
    }
}

impl MoveNodeOperation {
    pub fn destination(&self) -> DestinationSpec {
        DestinationSpec::from_parts(self.to.clone(), self.remap.iter().cloned().collect())
    }

    pub fn read_shard_map(&self) -> anyhow::Result<Option<String>> {
        let Some(source) = &self.shard_map else {
            return Ok(None);
        };
        let mut json = String::new();
        source
            .clone()
            .into_reader()
            .context("Failed to open shard map")?
            .read_to_string(&mut json)
            .context("Failed to read shard map")?;
        Ok(Some(json))
    }
}

/// Handle the move-node command against the configured cluster
pub async fn handle_move_node_command(
    opt: &MoveNodeOperation,
    conn: &ConnectionArgs,
) -> anyhow::Result<()> {
    let config = ClusterConfig::load(conn)?;
    let client = Arc::new(CouchClient::new(&config)?);
    let migrator = ShardMigrator::from_client(client);

    let outcome = move_node_with(&migrator, opt).await?;
    let rendered = outcome.render(opt.output.output)?;
    if !rendered.is_empty() {
        println!("{rendered}");
    }
    Ok(())
}

pub async fn move_node_with<C, M>(
    migrator: &ShardMigrator<C, M>,
    opt: &MoveNodeOperation,
) -> anyhow::Result<MoveNodeOutcome>
where
    C: ClusterApi,
    M: ShardMover,
{
    let destination = opt.destination();
    let shard_map = opt.read_shard_map()?;
    let plan = migrator.plan(&destination, shard_map.as_deref()).await?;
    if opt.dry_run {
        return Ok(MoveNodeOutcome::Planned(plan));
    }
    Ok(MoveNodeOutcome::Moved(migrator.execute(plan).await?))
}
