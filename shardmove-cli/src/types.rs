/// Main CLI structure
#[derive(clap::Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct ShardmoveCli {
    #[command(subcommand)]
    pub command: ShardmoveCommands,
    #[clap(flatten)]
    pub conn: ConnectionArgs,
}

/// Available CLI commands
#[derive(clap::Subcommand, Clone, Debug)]
pub enum ShardmoveCommands {
    /// Reassign shard ownership to one node or from old nodes to new ones
    #[clap(aliases = &["move", "mv"])]
    MoveNode {
        #[clap(flatten)]
        opt: MoveNodeOperation,
    },
    /// Trigger a shard sync on every database of the cluster
    #[clap(aliases = &["sync"])]
    SyncShards,
}

/// Shard reassignment parameters
#[derive(clap::Args, Clone, Debug, Default)]
pub struct MoveNodeOperation {
    /// Destination node. Defaults to the only node of the cluster
    #[arg(short, long, conflicts_with = "remap")]
    pub to: Option<String>,
    /// Old to new node pairs for multi-node migration.
    /// Example: `-r node1@10.0.0.1=node3@10.0.0.3 -r node2@10.0.0.2=node4@10.0.0.4`
    #[arg(short, long, value_parser = parse_remap_entry)]
    pub remap: Vec<(String, String)>,
    /// Current shard ownership as a JSON object of range to node, read from
    /// a file or from stdin if `-` is given. Required with `--remap`
    #[arg(short, long)]
    pub shard_map: Option<clap_stdin::FileOrStdin>,
    /// Print the planned moves without executing them
    #[arg(long)]
    pub dry_run: bool,
    #[clap(flatten)]
    pub output: OutputArgs,
}

/// Parse one `OLD=NEW` remap entry.
pub fn parse_remap_entry(entry: &str) -> Result<(String, String), String> {
    match entry.split_once('=') {
        Some((old, new)) if !old.is_empty() && !new.is_empty() => {
            Ok((old.to_string(), new.to_string()))
        }
        _ => Err(format!("invalid remap entry '{entry}', expected OLD=NEW")),
    }
}

/// Connection configuration, overriding the `COUCH_*` environment
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Cluster base URL, e.g. `http://127.0.0.1:5984`
    #[arg(short = 'u', long, global = true)]
    pub url: Option<String>,
    /// Admin user name
    #[arg(long, global = true)]
    pub user: Option<String>,
    /// Admin password
    #[arg(long, global = true)]
    pub password: Option<String>,
}

/// Output formatting options
#[derive(clap::Args, Clone, Debug, Default)]
pub struct OutputArgs {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Available output formats
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
