//! Shared utilities for command handlers

use crate::error::{Error, ErrorContext, Result};
use crate::output::OutputWriter;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Document encodings the CLI reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Some(DocumentFormat::Json),
            Some("yaml") | Some("yml") => Some(DocumentFormat::Yaml),
            _ => None,
        }
    }
}

/// Parse a document, trying JSON before YAML when the format is unknown
pub fn parse_document(content: &str, format: Option<DocumentFormat>) -> Result<Value> {
    match format {
        Some(DocumentFormat::Json) => Ok(serde_json::from_str(content)?),
        Some(DocumentFormat::Yaml) => Ok(serde_yaml::from_str(content)?),
        None => match serde_json::from_str(content) {
            Ok(value) => Ok(value),
            Err(_) => Ok(serde_yaml::from_str(content)?),
        },
    }
}

/// Load a JSON or YAML document from disk
pub fn load_document(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Read document");

    let format = DocumentFormat::from_path(path);
    parse_document(&content, format).map_err(|e| match (format, e) {
        (None, _) => Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON or YAML".to_string(),
        },
        (Some(_), e) => e,
    })
}

/// Read the input document from a file, or stdin when the path is absent or `-`
pub fn read_input(path: Option<&Path>) -> Result<Value> {
    match path {
        Some(path) if path != Path::new("-") => load_document(path),
        _ => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read input from stdin")?;
            tracing::debug!(bytes = content.len(), "Read document from stdin");
            parse_document(&content, None)
        }
    }
}

/// Save a document, as YAML for `.yaml`/`.yml` paths and pretty JSON otherwise
pub fn save_document(path: &Path, document: &Value) -> Result<()> {
    let content = match DocumentFormat::from_path(path) {
        Some(DocumentFormat::Yaml) => serde_yaml::to_string(document)?,
        _ => {
            let mut json = serde_json::to_string_pretty(document)?;
            json.push('\n');
            json
        }
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Print a result, or save it when `save_to` is given
pub fn emit_document(
    output: &mut OutputWriter,
    document: &Value,
    save_to: Option<&Path>,
    title: &str,
) -> Result<()> {
    match save_to {
        Some(path) => {
            tracing::debug!("Writing {} to file: {}", title, path.display());
            save_document(path, document)?;
            output.success(&format!("✓ {} saved to {}", title, path.display()))
        }
        None => {
            output.section(title)?;
            output.document(document)
        }
    }
}
