use shardmove_core::{MigrationPlan, NodeId};

pub use crate::types::OutputFormat;

/// Node list, one per line in text form.
pub fn render_nodes(nodes: &[NodeId], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(nodes)?),
        OutputFormat::Text => Ok(nodes.join("\n")),
    }
}

pub fn render_plan(plan: &MigrationPlan, format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(plan)?);
    }
    if plan.is_empty() {
        return Ok("No shard scheduled for move".to_string());
    }
    let lines: Vec<String> = plan
        .moves
        .iter()
        .map(|mv| match &mv.from {
            Some(from) => format!("{}: {} -> {}", mv.shard, from, mv.to),
            None => format!("{} -> {}", mv.shard, mv.to),
        })
        .collect();
    Ok(lines.join("\n"))
}
