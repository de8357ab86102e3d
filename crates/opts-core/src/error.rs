//! Error types for opts-core

/// Result type for opts-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while declaring schemas or resolving options against them.
///
/// Every variant carries the class name plus the offending key or value so
/// the source mapping can be fixed without a debugger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A class declaration is internally inconsistent
    #[error("Invalid schema for '{class}': {message}")]
    Schema { class: String, message: String },

    /// Input to a node constructor is not null, a mapping, or a compatible node
    #[error("Options for '{class}' must be {expected}; got '{actual}'")]
    TypeMismatch {
        class: String,
        expected: String,
        actual: String,
    },

    /// A key (after alias resolution) is not declared by the class
    #[error("Unrecognized option '{key}' for '{class}'; known options: {}", .known.join(", "))]
    UnrecognizedOption {
        class: String,
        key: String,
        known: Vec<String>,
    },

    /// A value has the wrong primitive type
    #[error(
        "'{class}' option '{key}'{}: got type '{actual}'; expected '{}'",
        element_suffix(.index),
        .expected.join("' | '")
    )]
    ValueType {
        class: String,
        key: String,
        expected: Vec<String>,
        actual: String,
        index: Option<usize>,
    },

    /// A value is nested deeper (or more raggedly) than the declared list depth
    #[error("'{class}' option '{key}' requires list depth {expected}; got depth {found}")]
    ListDepth {
        class: String,
        key: String,
        expected: usize,
        found: usize,
    },

    /// A value is not one of the permissible values
    #[error(
        "'{class}' option '{key}' has invalid value {value}; permissible values: {}",
        .allowed.join(", ")
    )]
    ValueDomain {
        class: String,
        key: String,
        value: String,
        allowed: Vec<String>,
    },

    /// A phase index is beyond the supported number of phases
    #[error("'{class}' option '{key}': phase {index} is out of range; at most {max} phases")]
    PhaseIndex {
        class: String,
        key: String,
        index: usize,
        max: usize,
    },

    /// A discriminator value selects no registered class and there is no fallback
    #[error("No section class for {field}={value} in '{class}' and no default class registered")]
    UnknownSectionClass {
        class: String,
        field: String,
        value: String,
    },

    /// A subsection path names a section the class does not declare
    #[error("Class '{class}' has no section '{section}'")]
    UnknownSection { class: String, section: String },

    /// A class name was looked up but never registered
    #[error("Options class not registered: {class}")]
    UnknownClass { class: String },
}

impl Error {
    pub fn schema(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            class: class.into(),
            message: message.into(),
        }
    }

    /// Name of the class the error was raised for.
    pub fn class(&self) -> &str {
        match self {
            Error::Schema { class, .. }
            | Error::TypeMismatch { class, .. }
            | Error::UnrecognizedOption { class, .. }
            | Error::ValueType { class, .. }
            | Error::ListDepth { class, .. }
            | Error::ValueDomain { class, .. }
            | Error::PhaseIndex { class, .. }
            | Error::UnknownSectionClass { class, .. }
            | Error::UnknownSection { class, .. }
            | Error::UnknownClass { class } => class,
        }
    }
}

fn element_suffix(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" (element {i})"),
        None => String::new(),
    }
}
