//! Per-phase list utilities
//!
//! Options that vary by phase are stored as sequences. Reading phase `j`
//! past the end of a sequence repeats its last element, so a short list
//! applies to every later phase.

use serde_json::Value;

/// Nesting depth of a value, following first elements (`3` → 0, `[[1]]` → 2).
pub fn array_depth(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.first().map_or(0, array_depth),
        _ => 0,
    }
}

/// Element `j` of a sequence, clamped to its last element.
///
/// A negative `j` returns the whole value, a scalar is returned regardless
/// of `j`, and an empty sequence has no element to return.
pub fn sample_phase(value: &Value, j: i64) -> Option<&Value> {
    if j < 0 {
        return Some(value);
    }
    match value {
        Value::Array(items) => {
            let idx = usize::try_from(j).unwrap_or(usize::MAX);
            items.get(idx).or_else(|| items.last())
        }
        _ => Some(value),
    }
}

/// Element `j mod len` of a sequence.
pub fn sample_ring(value: &Value, j: i64) -> Option<&Value> {
    if j < 0 {
        return Some(value);
    }
    match value {
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) => {
            let len = items.len() as i64;
            items.get((j % len) as usize)
        }
        _ => Some(value),
    }
}

/// Largest number of phases a sequence option may be extended to.
pub const MAX_PHASES: usize = 10_000;

/// Write element `j` into a sequence.
///
/// A missing or scalar current value is first turned into a sequence; a
/// sequence shorter than `j` is extended by repeating its last element.
/// Returns `None` when `j` is not below [`MAX_PHASES`].
pub fn set_phase(current: Option<&Value>, j: usize, value: Value) -> Option<Value> {
    if j >= MAX_PHASES {
        return None;
    }
    let mut items = match current {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other.clone()],
    };
    if j < items.len() {
        items[j] = value;
    } else {
        let fill = items.last().cloned().unwrap_or_else(|| value.clone());
        items.resize(j, fill);
        items.push(value);
    }
    Some(Value::Array(items))
}

/// Pad a sequence to at least `len` elements by repeating its last element.
pub fn pad(items: &mut Vec<Value>, len: usize) {
    if let Some(last) = items.last().cloned() {
        if items.len() < len {
            items.resize(len, last);
        }
    }
}
