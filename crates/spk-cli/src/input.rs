//! Object file loading.
//!
//! Files ending in `.yaml` or `.yml` are read as YAML, everything else as
//! JSON. The root must be an object; it is materialized as a node through
//! the process-wide resolver.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use spk_core::Base;
use spk_registry::{materialize_object, DiscriminatorResolver};

/// Parse `path` into a JSON value.
pub fn read_document(path: &Path) -> Result<serde_json::Value> {
    if !path.exists() {
        bail!("file not found: {}", path.display());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML: {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON: {}", path.display()))
    }
}

/// Load the root node stored in `path`.
pub fn load_root(path: &Path, resolver: &DiscriminatorResolver) -> Result<Arc<Base>> {
    let document = read_document(path)?;
    let Some(map) = document.as_object() else {
        bail!("root of {} is not an object", path.display());
    };
    let root = materialize_object(map, resolver)
        .with_context(|| format!("invalid object in {}", path.display()))?;
    Ok(Arc::new(root))
}
