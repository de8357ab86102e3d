//! Primitive value types an option may be constrained to

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A primitive type accepted by an option.
///
/// `Int` and `Float` are distinct: an integer literal does not satisfy a
/// `Float`-only option. Declare both (see [`NUMBER`]) to accept either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptType {
    Bool,
    Int,
    Float,
    Str,
    Dict,
}

impl OptType {
    pub fn name(self) -> &'static str {
        match self {
            OptType::Bool => "bool",
            OptType::Int => "int",
            OptType::Float => "float",
            OptType::Str => "str",
            OptType::Dict => "dict",
        }
    }

    /// Whether a single (non-list) value is an instance of this type
    pub fn matches(self, value: &Value) -> bool {
        match self {
            OptType::Bool => value.is_boolean(),
            OptType::Int => value.is_i64() || value.is_u64(),
            OptType::Float => value.is_f64(),
            OptType::Str => value.is_string(),
            OptType::Dict => value.is_object(),
        }
    }
}

impl std::fmt::Display for OptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub const BOOL: &[OptType] = &[OptType::Bool];
pub const INT: &[OptType] = &[OptType::Int];
pub const FLOAT: &[OptType] = &[OptType::Float];
pub const NUMBER: &[OptType] = &[OptType::Float, OptType::Int];
pub const STR: &[OptType] = &[OptType::Str];
pub const DICT: &[OptType] = &[OptType::Dict];
pub const INT_OR_STR: &[OptType] = &[OptType::Int, OptType::Str];
pub const FLOAT_OR_STR: &[OptType] = &[OptType::Float, OptType::Str];

/// Short type name of a JSON value, as used in error messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
