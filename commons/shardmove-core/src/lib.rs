pub mod error;
mod memory;
pub mod migrator;
pub mod model;
pub mod owners;
pub mod plan;
pub mod traits;


pub use error::{BoxError, ClusterResult, MigrationError, MigrationResult};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::{ClusterCall, FailPoint, MemoryCluster};
pub use migrator::ShardMigrator;
pub use model::{
    DbName, DestinationSpec, NodeId, NodeRemap, ShardId, ShardMap, ShardMove,
    SyncStatus,
};
pub use owners::OwnerSet;
pub use plan::MigrationPlan;
pub use traits::{ClusterApi, ShardMover};
