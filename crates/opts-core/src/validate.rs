//! Value validation and list-depth normalization
//!
//! Every option value goes through [`normalize`] before it is stored, both
//! at construction and when a single key is set. The steps are:
//!
//! 1. broadcast a value that is shallower than the declared list depth
//!    (an empty list is kept as-is),
//! 2. reject values nested deeper than declared or ragged,
//! 3. type-check each leaf against the declared type union,
//! 4. check each leaf against the permissible values,
//! 5. pad short sequences per the key's `min_len`.
//!
//! Validation is all-or-nothing: the caller only receives a value when
//! every step passed.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::item;
use crate::schema::Schema;
use crate::types::type_name;

/// Validate `value` for `key` and return its normalized form.
pub fn normalize(schema: &Schema, key: &str, value: Value) -> Result<Value> {
    let depth = schema.list_depth(key);
    let mut value = broadcast(schema, key, value, depth)?;
    check_leaves(schema, key, &value, depth)?;
    if let (Some(len), Value::Array(items)) = (schema.min_len(key), &mut value) {
        item::pad(items, len);
    }
    Ok(value)
}

fn broadcast(schema: &Schema, key: &str, value: Value, depth: usize) -> Result<Value> {
    let found = item::array_depth(&value);
    if found > depth {
        return Err(depth_error(schema, key, depth, found));
    }
    if matches!(&value, Value::Array(items) if items.is_empty()) {
        return Ok(value);
    }
    let mut value = value;
    for _ in found..depth {
        value = Value::Array(vec![value]);
    }
    Ok(value)
}

fn check_leaves(schema: &Schema, key: &str, value: &Value, depth: usize) -> Result<()> {
    let mut leaves = Vec::new();
    collect_leaves(value, depth, 0, None, &mut leaves)
        .map_err(|found| depth_error(schema, key, depth, found))?;

    for (index, leaf) in leaves {
        check_type(schema, key, leaf, index)?;
        check_domain(schema, key, leaf)?;
    }
    Ok(())
}

/// Gather the leaves of a value of uniform depth, with the index of the
/// top-level element each belongs to. On a depth mismatch returns the depth
/// at which the offending element sits.
fn collect_leaves<'v>(
    value: &'v Value,
    remaining: usize,
    level: usize,
    index: Option<usize>,
    out: &mut Vec<(Option<usize>, &'v Value)>,
) -> std::result::Result<(), usize> {
    match (value, remaining) {
        (Value::Array(_), 0) => Err(level + item::array_depth(value)),
        (Value::Array(items), _) => {
            for (i, element) in items.iter().enumerate() {
                collect_leaves(element, remaining - 1, level + 1, index.or(Some(i)), out)?;
            }
            Ok(())
        }
        (_, 0) => {
            out.push((index, value));
            Ok(())
        }
        (_, _) => Err(level),
    }
}

fn check_type(schema: &Schema, key: &str, leaf: &Value, index: Option<usize>) -> Result<()> {
    let Some(types) = schema.types_of(key) else {
        return Ok(());
    };
    if types.iter().any(|t| t.matches(leaf)) {
        return Ok(());
    }
    Err(Error::ValueType {
        class: schema.name().to_string(),
        key: key.to_string(),
        expected: types.iter().map(|t| t.name().to_string()).collect(),
        actual: type_name(leaf).to_string(),
        index,
    })
}

fn check_domain(schema: &Schema, key: &str, leaf: &Value) -> Result<()> {
    let Some(allowed) = schema.allowed_values(key) else {
        return Ok(());
    };
    if allowed.contains(leaf) {
        return Ok(());
    }
    Err(Error::ValueDomain {
        class: schema.name().to_string(),
        key: key.to_string(),
        value: leaf.to_string(),
        allowed: allowed.iter().map(Value::to_string).collect(),
    })
}

fn depth_error(schema: &Schema, key: &str, expected: usize, found: usize) -> Error {
    Error::ListDepth {
        class: schema.name().to_string(),
        key: key.to_string(),
        expected,
        found,
    }
}
