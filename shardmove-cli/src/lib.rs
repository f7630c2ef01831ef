pub mod client;
mod commands;
pub mod config;
mod output;
mod types;

use std::process;

use shardmove_core::MigrationError;

pub use commands::{MoveNodeOutcome, move_node_with};
pub use output::{render_nodes, render_plan};
pub use types::{
    ConnectionArgs, MoveNodeOperation, OutputArgs, OutputFormat,
    ShardmoveCli, ShardmoveCommands, parse_remap_entry,
};

pub async fn run(cli: ShardmoveCli) {
    let conn = &cli.conn;
    match &cli.command {
        ShardmoveCommands::MoveNode { opt } => {
            if let Err(e) = commands::handle_move_node_command(opt, conn).await {
                eprintln!("Move node failed: {}", e);
                if let Some(err) = e.downcast_ref::<MigrationError>() {
                    if !err.is_setup_failure() {
                        eprintln!(
                            "Shards moved before the failure keep their new owner; check the shard map before retrying"
                        );
                    }
                }
                process::exit(1);
            }
        }
        ShardmoveCommands::SyncShards => {
            if let Err(e) = commands::handle_sync_shards_command(conn).await {
                eprintln!("Sync shards failed: {}", e);
                process::exit(1);
            }
        }
    }
}
