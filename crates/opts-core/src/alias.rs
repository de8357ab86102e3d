//! Alias resolution
//!
//! Legacy and alternate spellings of option names are mapped to their
//! canonical key before any other check runs. A key without an alias entry
//! passes through unchanged and is judged against the option list later.

use std::collections::BTreeMap;

/// Resolve `key` through an alias table.
pub fn resolve<'a>(aliases: &'a BTreeMap<String, String>, key: &'a str) -> &'a str {
    match aliases.get(key) {
        Some(canonical) => {
            tracing::trace!(alias = key, canonical = %canonical, "Resolved option alias");
            canonical.as_str()
        }
        None => key,
    }
}

/// All aliases pointing at `canonical`, sorted.
pub fn aliases_of<'a>(aliases: &'a BTreeMap<String, String>, canonical: &str) -> Vec<&'a str> {
    aliases
        .iter()
        .filter(|(_, target)| target.as_str() == canonical)
        .map(|(alias, _)| alias.as_str())
        .collect()
}
