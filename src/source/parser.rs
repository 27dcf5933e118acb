//! Sources file loading and validation

use super::types::{SourceConfig, SourcesFile};
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use url::Url;

/// Format of a sources document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Yaml,
    Json,
}

impl SourceFormat {
    /// Pick the format from a file extension; anything unknown is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                SourceFormat::Yaml
            }
            _ => SourceFormat::Json,
        }
    }
}

/// Load and validate every source in a file
pub fn load_sources(path: impl AsRef<Path>) -> Result<Vec<SourceConfig>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read sources file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_sources_from_str(&content, SourceFormat::from_path(path))
}

/// Load and validate sources from a string
pub fn load_sources_from_str(content: &str, format: SourceFormat) -> Result<Vec<SourceConfig>> {
    let file: SourcesFile = match format {
        SourceFormat::Yaml => serde_yaml::from_str(content)?,
        SourceFormat::Json => serde_json::from_str(content)?,
    };

    let mut seen = HashSet::new();
    for source in &file.sources {
        validate_source(source)?;
        if !seen.insert(source.id.as_str()) {
            return Err(Error::config(format!("Duplicate source id: {}", source.id)));
        }
    }

    Ok(file.sources)
}

/// Check the fields a source cannot run without
pub fn validate_source(source: &SourceConfig) -> Result<()> {
    if source.id.trim().is_empty() {
        return Err(Error::missing_field("id"));
    }

    if source.url.trim().is_empty() {
        return Err(Error::missing_field(format!("{}.url", source.id)));
    }
    let url = Url::parse(&source.url)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid_value(
            format!("{}.url", source.id),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if source.target_collection.trim().is_empty() {
        return Err(Error::missing_field(format!(
            "{}.target_collection",
            source.id
        )));
    }

    if source.mapping.is_empty() {
        return Err(Error::missing_field(format!("{}.mapping", source.id)));
    }

    Ok(())
}
