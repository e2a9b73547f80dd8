use super::{open_document, FilePipeline};
use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use jsongraph_editor::{CommitOutcome, EditableFieldSet, PipelineResult, StructuralPath};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SetArgs {
    /// JSON document
    pub file: PathBuf,

    /// Target path, e.g. '$["user"]["age"]'
    pub path: StructuralPath,

    /// Fields to write into the container at PATH
    #[arg(value_name = "KEY=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Replace the value at PATH outright
    #[arg(long, value_name = "RAW", conflicts_with = "fields")]
    pub value: Option<String>,

    /// Print the result instead of writing the file
    #[arg(long)]
    pub stdout: bool,
}

fn parse_field(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", arg))
}

/// Commit the requested edit without touching the file
fn apply_edit(pipeline: &mut FilePipeline, args: &SetArgs) -> Result<PipelineResult> {
    let result = match &args.value {
        Some(raw) => pipeline.commit_scalar(&args.path, raw)?,
        None => {
            if args.fields.is_empty() {
                bail!("Nothing to set: pass KEY=VALUE fields or --value");
            }
            let fields: EditableFieldSet = args.fields.iter().cloned().collect();
            pipeline.commit_fields(&args.path, &fields)?
        }
    };
    Ok(result)
}

pub fn set(args: SetArgs) -> Result<()> {
    let mut pipeline = open_document(&args.file)?;
    let result = apply_edit(&mut pipeline, &args)?;

    if args.stdout {
        println!("{}", pipeline.text());
        return Ok(());
    }

    if result.outcome == CommitOutcome::Unchanged {
        println!("{} {} unchanged", "·".bright_black(), args.path);
        return Ok(());
    }

    std::fs::write(&args.file, pipeline.text())
        .with_context(|| format!("Cannot write {}", args.file.display()))?;

    println!(
        "{} Updated {} in {}",
        "✓".green(),
        args.path.to_string().cyan(),
        args.file.display()
    );

    Ok(())
}
