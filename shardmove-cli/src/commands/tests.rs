use std::sync::Arc;

use shardmove_core::{ClusterCall, MemoryCluster, MigrationError, ShardMigrator, ShardMove};
use tempfile::TempDir;

use crate::commands::{MoveNodeOutcome, move_node_with};
use crate::types::{MoveNodeOperation, OutputFormat};

fn migrator(cluster: &MemoryCluster) -> ShardMigrator<MemoryCluster, MemoryCluster> {
    ShardMigrator::from_client(Arc::new(cluster.clone()))
}

async fn write_shard_map(dir: &TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("shard-map.json");
    tokio::fs::write(&path, json).await.unwrap();
    path
}

fn remap_operation(shard_map: Option<&std::path::Path>, dry_run: bool) -> MoveNodeOperation {
    MoveNodeOperation {
        remap: vec![("node1".to_string(), "node3".to_string())],
        shard_map: shard_map.map(|p| p.to_str().unwrap().parse().unwrap()),
        dry_run,
        ..Default::default()
    }
}

#[test_log::test(tokio::test)]
async fn dry_run_plans_without_moving() {
    let dir = TempDir::new().unwrap();
    let path = write_shard_map(
        &dir,
        r#"{"00000000-7fffffff":"node1","80000000-ffffffff":"node2"}"#,
    )
    .await;
    let cluster = MemoryCluster::new();

    let outcome = move_node_with(&migrator(&cluster), &remap_operation(Some(&path), true))
        .await
        .unwrap();

    match &outcome {
        MoveNodeOutcome::Planned(plan) => {
            assert_eq!(
                plan.moves,
                vec![ShardMove::from_owner("00000000-7fffffff", "node1", "node3")]
            );
        }
        other => panic!("expected plan, got {other:?}"),
    }
    assert_eq!(
        outcome.render(OutputFormat::Text).unwrap(),
        "00000000-7fffffff: node1 -> node3"
    );
    assert!(cluster.calls().is_empty());
}

#[test_log::test(tokio::test)]
async fn remap_reads_shard_map_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_shard_map(
        &dir,
        r#"{"00000000-7fffffff":"node1","80000000-ffffffff":"node1"}"#,
    )
    .await;
    let cluster = MemoryCluster::new().with_default_owners(["node1"]);

    let outcome = move_node_with(&migrator(&cluster), &remap_operation(Some(&path), false))
        .await
        .unwrap();

    assert_eq!(outcome, MoveNodeOutcome::Moved(vec!["node1".to_string()]));
    assert_eq!(cluster.move_calls().len(), 2);
}

#[test_log::test(tokio::test)]
async fn remap_without_shard_map_is_rejected() {
    let cluster = MemoryCluster::new();

    let err = move_node_with(&migrator(&cluster), &remap_operation(None, false))
        .await
        .unwrap_err();

    let err = err.downcast::<MigrationError>().unwrap();
    assert!(matches!(err, MigrationError::MissingShardMap));
    assert!(cluster.calls().is_empty());
}

#[test_log::test(tokio::test)]
async fn explicit_destination_moves_every_shard() {
    let cluster = MemoryCluster::new()
        .with_shards(["s1", "s2"])
        .with_default_owners(["old"]);
    let opt = MoveNodeOperation {
        to: Some("new".to_string()),
        ..Default::default()
    };

    let outcome = move_node_with(&migrator(&cluster), &opt).await.unwrap();

    assert_eq!(outcome, MoveNodeOutcome::Moved(vec!["old".to_string()]));
    assert_eq!(cluster.count(&ClusterCall::GetNodes), 0);
    assert_eq!(
        cluster.move_calls(),
        vec![
            ("s1".to_string(), "new".to_string()),
            ("s2".to_string(), "new".to_string()),
        ]
    );
}
