//! Loading input mappings

use std::io::Read;
use std::path::Path;

use opts_core::Value;

use crate::error::{CliError, Result};

/// Read a mapping from `source`, a file path or `-` for stdin.
///
/// Files ending in `.yaml` or `.yml` are parsed as YAML, everything else
/// (stdin included) as JSON.
pub fn load(source: &str) -> Result<Value> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return parse(&text, Format::Json);
    }

    let path = Path::new(source);
    if !path.is_file() {
        return Err(CliError::user(format!("input file not found: {source}")));
    }
    let text = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "Read input");
    parse(&text, Format::for_path(path))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Format::Yaml,
            _ => Format::Json,
        }
    }
}

fn parse(text: &str, format: Format) -> Result<Value> {
    Ok(match format {
        Format::Json => serde_json::from_str(text)?,
        Format::Yaml => serde_yaml::from_str(text)?,
    })
}

/// Split a dotted section path; `.` and the empty string name the root.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('.').filter(|part| !part.is_empty()).collect()
}
