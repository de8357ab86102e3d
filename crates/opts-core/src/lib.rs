//! Schema-driven hierarchical options resolution.
//!
//! Classes of options are declared once with [`SchemaDef`] and registered in
//! a [`SchemaRegistry`], which merges each declaration with its ancestors'
//! and checks it for consistency. Raw JSON-like input is then turned into
//! validated, default-aware [`OptionsNode`]s:
//!
//! ```text
//! raw mapping
//!   -> alias resolution
//!   -> per-key validation (depth, type, permissible values, padding)
//!   -> section dispatch (fixed class or tagged union)
//!   -> OptionsNode tree
//!   -> isolate_subsection(path) -> node of the leaf class
//! ```
//!
//! # Example
//!
//! ```
//! use opts_core::{SchemaDef, SchemaRegistry, types};
//! use serde_json::json;
//!
//! let mut registry = SchemaRegistry::new();
//! registry
//!     .register(
//!         SchemaDef::new("KeyDefnOpts")
//!             .opts(["Value"])
//!             .values("Value", ["float", "int", "str"])
//!             .default("Value", "float"),
//!     )
//!     .unwrap();
//!
//! let node = registry.build("KeyDefnOpts", json!({"Value": "int"})).unwrap();
//! assert_eq!(node.get("Value"), Some(&json!("int")));
//! assert!(registry.build("KeyDefnOpts", json!({"Value": "bogus"})).is_err());
//! ```

pub mod accessors;
pub mod alias;
pub mod dispatch;
pub mod doc;
pub mod error;
pub mod isolate;
pub mod item;
pub mod node;
pub mod registry;
pub mod schema;
pub mod types;
pub mod validate;

pub use accessors::OptionsView;
pub use error::{Error, Result};
pub use isolate::{Input, isolate_subsection};
pub use node::{OptionsNode, Source};
pub use registry::SchemaRegistry;
pub use schema::{DEFAULT_KEY, Hooks, Schema, SchemaDef, SectionClass, TaggedUnion, WarnMode};
pub use serde_json::{Map, Value};
pub use types::OptType;
