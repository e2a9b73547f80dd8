use super::open_document;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use jsongraph_editor::{StructuralPath, VALUE_FIELD};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// JSON document
    pub file: PathBuf,

    /// Node path, e.g. '$["users"][0]'
    #[arg(default_value = "$")]
    pub path: StructuralPath,

    /// Print the editable fields as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn show(args: ShowArgs) -> Result<()> {
    let pipeline = open_document(&args.file)?;

    let node = pipeline
        .graph()
        .node_at(&args.path)
        .ok_or_else(|| anyhow!("No node at {}", args.path))?;
    let projection = pipeline.projector().project(&node.rows);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&projection.fields)?);
        return Ok(());
    }

    println!("{} {}", "Node".bright_blue().bold(), args.path.to_string().cyan());
    println!("{}", projection.display);

    if projection.fields.is_empty() {
        println!();
        println!("{}", "No editable fields".yellow());
        return Ok(());
    }

    println!();
    for (key, text) in &projection.fields {
        let label = if key == VALUE_FIELD { "(value)" } else { key.as_str() };
        println!("  {} = {:?}", label.bright_white(), text);
    }

    Ok(())
}
