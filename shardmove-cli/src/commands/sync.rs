use std::sync::Arc;

use shardmove_core::ShardMigrator;

use crate::client::CouchClient;
use crate::config::ClusterConfig;
use crate::types::ConnectionArgs;

/// Handle the sync-shards command. Prints nothing on success.
pub async fn handle_sync_shards_command(conn: &ConnectionArgs) -> anyhow::Result<()> {
    let config = ClusterConfig::load(conn)?;
    let migrator = ShardMigrator::from_client(Arc::new(CouchClient::new(&config)?));
    migrator.sync_shards().await?;
    Ok(())
}
