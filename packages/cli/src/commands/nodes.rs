use super::open_document;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct NodesArgs {
    /// JSON document
    pub file: PathBuf,
}

pub fn nodes(args: NodesArgs) -> Result<()> {
    let pipeline = open_document(&args.file)?;
    let projector = pipeline.projector();

    for node in pipeline.graph().nodes() {
        let projection = projector.project(&node.rows);
        let summary = projection.display.replace('\n', " ");

        println!(
            "{:>4}  {}  {}",
            node.id.bright_black(),
            node.path.to_string().cyan(),
            summary
        );
    }

    println!();
    println!(
        "{} nodes, {} edges",
        pipeline.graph().nodes().len(),
        pipeline.graph().edges().len()
    );

    Ok(())
}
