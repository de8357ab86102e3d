//! Section dispatch for tagged unions
//!
//! A section stored under a key that is neither a declared option nor a
//! fixed section gets its class from the discriminator field inside its own
//! data. A discriminator that names no registered kind but names a sibling
//! entry of the same mapping takes that sibling's class instead, so
//! `{"stack": {"Type": "PlotFM"}, "stack_CA": {"Type": "stack"}}` builds
//! both entries as `PlotFM`.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::schema::{Schema, TaggedUnion};

/// Choose the class for section `key` with raw `data` inside `owner`.
///
/// `siblings` is the raw mapping `key` was found in, when there is one.
/// Data without a discriminator in a union without a fallback is not a
/// section; `None` leaves it to the owner's option rules.
pub fn resolve<'u>(
    owner: &Schema,
    union: &'u TaggedUnion,
    key: &str,
    data: &Value,
    siblings: Option<&Map<String, Value>>,
) -> Result<Option<&'u Arc<Schema>>> {
    if union.fallback().is_none() && data.get(union.field()).is_none_or(Value::is_null) {
        return Ok(None);
    }
    let mut visited = BTreeSet::new();
    let cls = follow(owner, union, key, data, siblings, &mut visited)?;
    tracing::debug!(
        class = %owner.name(),
        key,
        field = union.field(),
        section = %cls.name(),
        "Dispatched section class"
    );
    Ok(Some(cls))
}

fn follow<'u, 'd>(
    owner: &Schema,
    union: &'u TaggedUnion,
    key: &'d str,
    data: &'d Value,
    siblings: Option<&'d Map<String, Value>>,
    visited: &mut BTreeSet<&'d str>,
) -> Result<&'u Arc<Schema>> {
    visited.insert(key);
    let tag = match data.get(union.field()) {
        None | Some(Value::Null) => {
            return union
                .fallback()
                .ok_or_else(|| unknown(owner, union, "null".to_string()));
        }
        Some(tag) => tag,
    };

    if let Some(name) = tag.as_str() {
        if let Some(cls) = union.kind(name) {
            return Ok(cls);
        }
        if let Some((sibling, sibling_data)) = siblings.and_then(|s| s.get_key_value(name)) {
            if sibling_data.is_object() && !visited.contains(sibling.as_str()) {
                return follow(owner, union, sibling, sibling_data, siblings, visited);
            }
        }
    }

    union.fallback().ok_or_else(|| unknown(owner, union, tag.to_string()))
}

fn unknown(owner: &Schema, union: &TaggedUnion, value: String) -> Error {
    Error::UnknownSectionClass {
        class: owner.name().to_string(),
        field: union.field().to_string(),
        value,
    }
}

/// Default each child's missing discriminator to the key it is stored under.
pub fn inject_discriminators(owner: &Schema, union: &TaggedUnion, raw: &mut Map<String, Value>) {
    for (key, value) in raw.iter_mut() {
        let canonical = owner.canonical(key);
        if owner.has_option(canonical) || owner.sections().contains_key(canonical) {
            continue;
        }
        if let Value::Object(child) = value {
            if !child.contains_key(union.field()) {
                tracing::debug!(
                    class = %owner.name(),
                    key = %key,
                    field = union.field(),
                    "Injected discriminator from key name"
                );
                child.insert(union.field().to_string(), Value::String(key.clone()));
            }
        }
    }
}
