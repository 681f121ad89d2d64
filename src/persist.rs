//! Config persistence: typed sections to and from YAML files.
//!
//! Saving builds a [`StructuralModel`], emits it with `serde_yaml`, injects the
//! model's comments and hands the finished text to
//! [`write_replace`](crate::replace::write_replace). The file on disk is only
//! ever swapped whole. Loading parses the file into a YAML mapping and
//! resolves it into the section type.

use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::annotate;
use crate::error::ConfigError;
use crate::model::{self, StructuralModel};
use crate::replace::{self, FileSystem, StdFs};
use crate::resolve;
use crate::schema::Section;

/// Pure function: the text `model` is saved as.
pub fn render_model(model: &StructuralModel) -> Result<String, ConfigError> {
    let plain = serde_yaml::to_string(&model.values().to_yaml()).map_err(ConfigError::EmitError)?;
    if !model.has_comments() {
        return Ok(plain);
    }
    Ok(annotate::annotate(&plain, model))
}

/// Pure function: the text `config` is saved as.
pub fn render<C: Section>(config: &C) -> Result<String, ConfigError> {
    render_model(&model::build(Some(config))?)
}

/// Write `config` to `path`, creating parent directories as needed.
pub fn save<C: Section>(path: &Path, config: &C) -> Result<(), ConfigError> {
    save_with(&StdFs, path, config)
}

/// Like [`save`] but through an explicit [`FileSystem`].
pub fn save_with<C: Section>(
    fs: &dyn FileSystem,
    path: &Path,
    config: &C,
) -> Result<(), ConfigError> {
    write_text_with(fs, path, &render(config)?)
}

/// Swap already-rendered config text into `path`.
pub fn write_text(path: &Path, text: &str) -> Result<(), ConfigError> {
    write_text_with(&StdFs, path, text)
}

fn write_text_with(fs: &dyn FileSystem, path: &Path, text: &str) -> Result<(), ConfigError> {
    replace::write_replace(fs, path, text.as_bytes()).into_result(path)?;
    debug!(path = %path.display(), bytes = text.len(), "config saved");
    Ok(())
}

/// Read and resolve the config at `path`.
pub fn load<C: Section>(path: &Path) -> Result<C, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(ConfigError::io(path, e)),
    };

    let mapping = parse_document(&content, path)?;
    let config = resolve::resolve(&mapping)?;
    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Parse a config document into its top-level mapping. An empty document is
/// an empty mapping.
pub fn parse_document(content: &str, path: &Path) -> Result<Mapping, ConfigError> {
    if content.trim().is_empty() {
        return Ok(Mapping::new());
    }
    let value: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}
