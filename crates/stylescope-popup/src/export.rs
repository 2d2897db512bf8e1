//! Tailwind theme export.
//!
//! Produces `{"theme": {"extend": {"colors": {...}, "fontFamily": {...}}}}`
//! with keys `<prefix>-1`, `<prefix>-2`, ... in ranking order.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};
use stylescope_protocols::AnalysisResult;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export, run an analysis first")]
    NothingToExport,

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Theme extension document for `result`.
pub fn tailwind_config(result: &AnalysisResult, key_prefix: &str) -> Value {
    let mut colors = Map::new();
    for (index, color) in result.colors.iter().enumerate() {
        colors.insert(key(key_prefix, index), Value::String(color.hex.clone()));
    }

    let mut font_family = Map::new();
    for (index, font) in result.fonts.iter().enumerate() {
        font_family.insert(key(key_prefix, index), json!([font.primary_family()]));
    }

    json!({
        "theme": {
            "extend": {
                "colors": colors,
                "fontFamily": font_family,
            }
        }
    })
}

fn key(prefix: &str, index: usize) -> String {
    if prefix.is_empty() {
        (index + 1).to_string()
    } else {
        format!("{}-{}", prefix, index + 1)
    }
}

/// Pretty-printed config with two-space indentation.
pub fn render(result: &AnalysisResult, key_prefix: &str) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&tailwind_config(result, key_prefix))?)
}

/// Write `contents` to `dir/file_name`, creating `dir` when needed.
pub fn write_config(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf, ExportError> {
    let path = dir.join(file_name);
    let io_err = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };
    fs::create_dir_all(dir).map_err(io_err)?;
    fs::write(&path, contents).map_err(io_err)?;
    info!(path = %path.display(), "Tailwind config written");
    Ok(path)
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
