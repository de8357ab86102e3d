//! Commands that read an input mapping

use colored::Colorize;
use opts_catalog::catalog;
use opts_core::{Error, OptionsNode, Value};

use crate::error::Result;
use crate::input::{self, split_path};

/// Run the check command
pub fn run_check(source: &str, class: &str) -> Result<()> {
    let node = load_node(source, class)?;
    tracing::debug!(class = node.class_name(), entries = node.len(), "Input is valid");
    println!("{}", "ok".green().bold());
    Ok(())
}

/// Run the section command
pub fn run_section(source: &str, class: &str, path: &str) -> Result<()> {
    let root = load_node(source, class)?;
    let section = catalog().isolate(&root, class, &split_path(path))?;
    println!("{}", serde_json::to_string_pretty(&section.to_mapping())?);
    Ok(())
}

/// Run the get command
pub fn run_get(source: &str, class: &str, path: &str, key: &str, phase: Option<i64>) -> Result<()> {
    let root = load_node(source, class)?;
    let value = lookup(&root, &split_path(path), key, phase)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn load_node(source: &str, class: &str) -> Result<OptionsNode> {
    let data = input::load(source)?;
    Ok(catalog().build(class, data)?)
}

/// Value of `key` in the section at `path`; `null` when unset.
fn lookup(root: &OptionsNode, path: &[&str], key: &str, phase: Option<i64>) -> Result<Value> {
    let node = root.get_section(path)?;
    let schema = node.schema();
    let canonical = schema.canonical(key);
    if !schema.accepts(canonical) {
        return Err(Error::UnrecognizedOption {
            class: schema.name().to_string(),
            key: key.to_string(),
            known: schema.allowed_names().into_iter().map(String::from).collect(),
        }
        .into());
    }
    Ok(node
        .get_phase(canonical, phase.unwrap_or(-1))
        .cloned()
        .unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use serde_json::json;

    fn root() -> OptionsNode {
        catalog()
            .build(
                "Options",
                json!({
                    "RunControl": {"PhaseIters": [0, 100, 200], "nIter": 50},
                    "RunMatrix": {"Keys": ["mach"], "Definitions": {"mach": {"Format": "%.2f"}}}
                }),
            )
            .unwrap()
    }

    #[test]
    fn lookup_clamps_phase() {
        let root = root();
        assert_eq!(lookup(&root, &["RunControl"], "PhaseIters", Some(9)).unwrap(), json!(200));
        assert_eq!(lookup(&root, &["RunControl"], "PhaseIters", None).unwrap(), json!([0, 100, 200]));
    }

    #[test]
    fn lookup_walks_tagged_sections() {
        let root = root();
        let path = ["RunMatrix", "Definitions", "mach"];
        assert_eq!(lookup(&root, &path, "Format", None).unwrap(), json!("%.2f"));
        assert_eq!(lookup(&root, &path, "Value", None).unwrap(), json!("float"));
    }

    #[test]
    fn lookup_unset_without_default_is_null() {
        let root = root();
        assert_eq!(lookup(&root, &["RunMatrix"], "File", None).unwrap(), Value::Null);
    }

    #[test]
    fn lookup_rejects_unknown_option() {
        let root = root();
        let err = lookup(&root, &["RunControl"], "NotAKey", None).unwrap_err();
        assert!(matches!(err, CliError::Core(Error::UnrecognizedOption { .. })));
    }

    #[test]
    fn lookup_rejects_unknown_section() {
        let root = root();
        let err = lookup(&root, &["Mesh"], "File", None).unwrap_err();
        assert!(matches!(err, CliError::Core(Error::UnknownSection { .. })));
    }
}
