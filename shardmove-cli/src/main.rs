use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use shardmove_cli::ShardmoveCli;

#[tokio::main]
async fn main() {
    init_log();
    let cli = ShardmoveCli::parse();
    shardmove_cli::run(cli).await
}

fn init_log() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("SHARDMOVE_LOG")
                .from_env_lossy(),
        )
        .init();
}
