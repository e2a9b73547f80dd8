pub mod nodes;
pub mod set;
pub mod show;

pub use nodes::{nodes, NodesArgs};
pub use set::{set, SetArgs};
pub use show::{show, ShowArgs};

use anyhow::{Context, Result};
use jsongraph_editor::{EditorConfig, MemoryBuffer, MemoryTextStore, Pipeline};
use std::path::Path;

pub type FilePipeline = Pipeline<MemoryTextStore, MemoryBuffer>;

/// Load a document file into a pipeline, using the config beside it
pub fn open_document(file: &Path) -> Result<FilePipeline> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Cannot read {}", file.display()))?;

    let dir = file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let config = EditorConfig::load(dir)?;

    let pipeline = Pipeline::new(MemoryTextStore::new(text), MemoryBuffer::default(), config)
        .with_context(|| format!("{} is not valid JSON", file.display()))?;

    tracing::debug!(file = %file.display(), nodes = pipeline.graph().nodes().len(), "document opened");
    Ok(pipeline)
}
