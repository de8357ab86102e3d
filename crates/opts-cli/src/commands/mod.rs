//! Command implementations for opts-cli

pub mod catalog;
pub mod inspect;

pub use catalog::{run_classes, run_doc};
pub use inspect::{run_check, run_get, run_section};
