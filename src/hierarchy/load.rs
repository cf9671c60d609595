use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use super::model::{Dataset, HierarchyNode};

const BUILTIN_DATASET: &str = include_str!("../../assets/words.json");

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatasetSource {
    Builtin,
    File(PathBuf),
}

impl DatasetSource {
    pub fn label(&self) -> String {
        match self {
            Self::Builtin => "built-in sample".to_owned(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

pub fn load_dataset(source: &DatasetSource) -> Result<Dataset> {
    let raw = match source {
        DatasetSource::Builtin => BUILTIN_DATASET.to_owned(),
        DatasetSource::File(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset {}", path.display()))?,
    };

    let roots = parse_dataset(&raw)
        .with_context(|| format!("failed to parse dataset from {}", source.label()))?;
    let dataset = Dataset {
        label: source.label(),
        roots,
    };

    tracing::info!(
        source = %dataset.label,
        nodes = dataset.node_count(),
        "loaded hierarchy dataset"
    );
    Ok(dataset)
}

/// Parses a top-level array of nodes or a single node object. Nesting depth
/// is unbounded; every hierarchy level costs two JSON levels.
pub(super) fn parse_dataset(raw: &str) -> Result<Vec<HierarchyNode>> {
    let body = raw.trim_start();
    if body.is_empty() {
        return Err(anyhow!("dataset is empty"));
    }

    let mut deserializer = serde_json::Deserializer::from_str(body);
    deserializer.disable_recursion_limit();
    let roots = if body.starts_with('[') {
        Vec::<HierarchyNode>::deserialize(&mut deserializer)
    } else {
        HierarchyNode::deserialize(&mut deserializer).map(|node| vec![node])
    }
    .context("expected a node object or an array of nodes")?;
    deserializer
        .end()
        .context("unexpected trailing characters after the dataset")?;

    Ok(roots)
}
