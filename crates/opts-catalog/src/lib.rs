//! Stock options classes.
//!
//! The catalogue is registered once per process, leaf classes first, and
//! shared read-only afterwards:
//!
//! ```text
//! Options
//! ├── RunControl: RunControlOpts
//! │   ├── Environ: EnvironOpts
//! │   ├── aflr3: AFLR3Opts (ExecOpts)
//! │   ├── intersect: IntersectOpts (ExecOpts)
//! │   ├── ulimit: ULimitOpts
//! │   └── verify: VerifyOpts (ExecOpts)
//! └── RunMatrix: RunMatrixOpts
//!     └── Definitions: KeyDefnCollectionOpts
//!         └── <key>: KeyDefnOpts | PressureKeyDefnOpts (by "Type")
//! ```

pub mod exec;
pub mod options;
pub mod runctl;
pub mod runmatrix;
pub mod views;

use std::sync::{Arc, LazyLock};

use opts_core::{Input, OptionsNode, OptionsView, Result, Schema, SchemaDef, SchemaRegistry, Source};

pub use options::OPTIONS;
pub use views::{AFLR3Opts, KeyDefnOpts, Options, RunControlOpts, RunMatrixOpts, ULimitOpts};

/// Number of classes in the catalogue.
pub const BUILTIN_COUNT: usize = 12;

/// Every catalogue class, in registration order.
pub fn definitions() -> Vec<SchemaDef> {
    vec![
        exec::exec(),
        exec::aflr3(),
        exec::intersect(),
        exec::verify(),
        runctl::ulimit(),
        runctl::environ(),
        runctl::run_control(),
        runmatrix::key_defn(),
        runmatrix::pressure_key_defn(),
        runmatrix::key_defn_collection(),
        runmatrix::run_matrix(),
        options::options(),
    ]
}

static CATALOG: LazyLock<SchemaRegistry> = LazyLock::new(|| {
    let mut registry = SchemaRegistry::new();
    registry
        .register_all(definitions())
        .expect("built-in options classes are consistent");
    registry
});

/// The process-wide registry of catalogue classes.
pub fn catalog() -> &'static SchemaRegistry {
    &CATALOG
}

/// Effective schema of a catalogue class.
pub fn class(name: &str) -> Result<&'static Arc<Schema>> {
    catalog().lookup(name)
}

/// Build a node of a catalogue class.
pub fn build(class: &str, source: impl Into<Source>) -> Result<OptionsNode> {
    catalog().build(class, source)
}

/// Typed view of the section at `path` below the root `Options` class.
///
/// The input may be nothing, the root node, a node already partway down
/// the path, or raw data for the target section.
pub fn isolate<'a, V: OptionsView>(input: impl Into<Input<'a>>, path: &[&str]) -> Result<V> {
    let node = catalog().isolate(input, OPTIONS, path)?;
    V::try_from_node(node.into_owned())
}
