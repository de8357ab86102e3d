//! Subsection isolation
//!
//! [`isolate_subsection`] returns the node for a section path no matter how
//! much of the path the caller has already walked. The input may be
//! nothing, raw data for the target section, the root node, or any node
//! along the path:
//!
//! - at each level, a node of the current class is descended into;
//! - anything else is passed down unchanged and treated as data for a
//!   deeper class;
//! - at the end of the path, nothing gives a default node, a node of the
//!   target class is borrowed as-is and raw data is built.

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::node::{OptionsNode, mismatch};
use crate::schema::{Schema, SectionClass};

/// Borrowed input to [`isolate_subsection`].
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    None,
    Raw(&'a Value),
    Node(&'a OptionsNode),
}

impl<'a> From<&'a Value> for Input<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => Input::None,
            other => Input::Raw(other),
        }
    }
}

impl<'a> From<Option<&'a Value>> for Input<'a> {
    fn from(value: Option<&'a Value>) -> Self {
        value.map_or(Input::None, Input::from)
    }
}

impl<'a> From<&'a OptionsNode> for Input<'a> {
    fn from(node: &'a OptionsNode) -> Self {
        Input::Node(node)
    }
}

/// Node of the class found at `path` below `class`.
///
/// With an empty path and a node already of class `class`, the node itself
/// is returned borrowed; nothing is copied.
pub fn isolate_subsection<'a>(
    input: impl Into<Input<'a>>,
    class: &Arc<Schema>,
    path: &[&str],
) -> Result<Cow<'a, OptionsNode>> {
    let input = input.into();
    let Some((first, rest)) = path.split_first() else {
        return leaf(input, class);
    };

    let section_class = match class.section_class(first) {
        Some(SectionClass::Fixed(cls)) => cls,
        _ => {
            return Err(Error::UnknownSection {
                class: class.name().to_string(),
                section: first.to_string(),
            });
        }
    };

    match input {
        Input::Node(node) if node.is_a(class.name()) => {
            let child = node.section(first).ok_or_else(|| Error::UnknownSection {
                class: class.name().to_string(),
                section: first.to_string(),
            })?;
            isolate_subsection(child, section_class, rest)
        }
        other => isolate_subsection(other, section_class, rest),
    }
}

fn leaf<'a>(input: Input<'a>, class: &Arc<Schema>) -> Result<Cow<'a, OptionsNode>> {
    match input {
        Input::None => Ok(Cow::Owned(OptionsNode::new(class))),
        Input::Node(node) if node.is_a(class.name()) => Ok(Cow::Borrowed(node)),
        Input::Node(node) => Err(mismatch(class, node.class_name())),
        Input::Raw(value) => OptionsNode::build(class, value.clone()).map(Cow::Owned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemaRegistry;
    use crate::schema::SchemaDef;
    use crate::types;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .register_all([
                SchemaDef::new("ULimitOpts").opts(["s"]).types("s", types::INT_OR_STR),
                SchemaDef::new("RunControlOpts")
                    .opts(["nProc"])
                    .types("nProc", types::INT)
                    .default("nProc", 1)
                    .section("ulimit", "ULimitOpts"),
                SchemaDef::new("Options").section("RunControl", "RunControlOpts"),
            ])
            .unwrap();
        registry
    }

    #[test]
    fn test_none_gives_default_node() {
        let reg = registry();
        let node = reg.isolate(Input::None, "Options", &["RunControl"]).unwrap();
        assert_eq!(node.class_name(), "RunControlOpts");
        assert_eq!(node.get("nProc"), Some(&json!(1)));
        assert!(matches!(node, Cow::Owned(_)));
    }

    #[test]
    fn test_empty_path_on_same_class_is_identity() {
        let reg = registry();
        let root = reg.build("Options", json!({"RunControl": {"nProc": 4}})).unwrap();
        let rc = root.section("RunControl").unwrap();

        let isolated = reg.isolate(rc, "RunControlOpts", &[]).unwrap();
        assert!(matches!(isolated, Cow::Borrowed(_)));
        assert!(std::ptr::eq(isolated.as_ref(), rc));
    }

    #[test]
    fn test_walks_down_from_root_without_copying() {
        let reg = registry();
        let root = reg.build("Options", json!({"RunControl": {"ulimit": {"s": 4194304}}})).unwrap();

        let ulimit = reg.isolate(&root, "Options", &["RunControl", "ulimit"]).unwrap();
        assert_eq!(ulimit.class_name(), "ULimitOpts");
        assert_eq!(ulimit.get("s"), Some(&json!(4194304)));
        let expected = root.get_section(&["RunControl", "ulimit"]).unwrap();
        assert!(std::ptr::eq(ulimit.as_ref(), expected));
    }

    #[test]
    fn test_partially_walked_node_passes_through() {
        let reg = registry();
        let root = reg.build("Options", json!({"RunControl": {"nProc": 8}})).unwrap();
        let rc = root.section("RunControl").unwrap();

        let isolated = reg.isolate(rc, "Options", &["RunControl"]).unwrap();
        assert!(std::ptr::eq(isolated.as_ref(), rc));
    }

    #[test]
    fn test_raw_mapping_is_section_data() {
        let reg = registry();
        let raw = json!({"nProc": 16});
        let node = reg.isolate(&raw, "Options", &["RunControl"]).unwrap();
        assert_eq!(node.class_name(), "RunControlOpts");
        assert_eq!(node.get("nProc"), Some(&json!(16)));
    }

    #[test]
    fn test_raw_mapping_is_validated() {
        let reg = registry();
        let raw = json!({"nProc": "many"});
        assert!(matches!(
            reg.isolate(&raw, "Options", &["RunControl"]),
            Err(Error::ValueType { .. })
        ));
    }

    #[test]
    fn test_unknown_section() {
        let reg = registry();
        let err = reg.isolate(Input::None, "Options", &["Mesh"]).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownSection {
                class: "Options".into(),
                section: "Mesh".into(),
            }
        );
    }

    #[test]
    fn test_wrong_input_kind() {
        let reg = registry();
        let raw = json!(3);
        assert!(matches!(
            reg.isolate(&raw, "Options", &["RunControl"]),
            Err(Error::TypeMismatch { .. })
        ));
        let ulimit = reg.build("ULimitOpts", Value::Null).unwrap();
        assert!(matches!(
            reg.isolate(&ulimit, "RunControlOpts", &[]),
            Err(Error::TypeMismatch { .. })
        ));
    }
}
