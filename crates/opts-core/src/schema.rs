//! Schema declarations and their effective form
//!
//! A class is declared with a [`SchemaDef`] builder and registered in a
//! [`SchemaRegistry`](crate::registry::SchemaRegistry), which merges the
//! declaration with its ancestors' once and caches the resulting
//! [`Schema`]. Nodes only ever see effective schemas.
//!
//! ```ignore
//! let def = SchemaDef::new("KeyDefnOpts")
//!     .opts(["Value", "Label"])
//!     .values("Value", ["float", "int", "str"])
//!     .default("Value", "float")
//!     .types("Label", types::BOOL);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::alias;
use crate::error::{Error, Result};
use crate::node::OptionsNode;
use crate::types::OptType;
use crate::validate;

/// Reserved key whose `types`/`values`/`list_depth` entries apply to every
/// key without an entry of its own.
pub const DEFAULT_KEY: &str = "_default_";

/// Discriminator field used when a tagged union does not name one.
pub const DEFAULT_TAG_FIELD: &str = "Type";

/// How invalid options are handled while setting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarnMode {
    /// Store without any checks
    None,
    /// Drop the option silently
    Quiet,
    /// Drop the option and log a warning
    Warn,
    /// Return the error
    #[default]
    Error,
}

/// Class-specific hooks run during construction.
#[derive(Clone, Copy, Default)]
pub struct Hooks {
    /// Rewrites the raw mapping before any key is processed
    pub preprocess: Option<fn(&mut Map<String, Value>)>,
    /// Turns a non-mapping input into a mapping, or declines with `None`
    pub coerce: Option<fn(&Value) -> Option<Map<String, Value>>>,
    /// Runs on every freshly built node, including default ones
    pub post_init: Option<fn(&mut OptionsNode)>,
}

impl Hooks {
    fn overlay(self, other: Hooks) -> Hooks {
        Hooks {
            preprocess: other.preprocess.or(self.preprocess),
            coerce: other.coerce.or(self.coerce),
            post_init: other.post_init.or(self.post_init),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("preprocess", &self.preprocess.is_some())
            .field("coerce", &self.coerce.is_some())
            .field("post_init", &self.post_init.is_some())
            .finish()
    }
}

/// Declaration of a discriminated union of section classes.
#[derive(Debug, Clone, Default)]
pub(crate) struct TaggedDef {
    pub(crate) field: Option<String>,
    pub(crate) kinds: BTreeMap<String, String>,
    pub(crate) fallback: Option<String>,
    pub(crate) inject_key: Option<bool>,
}

/// Declaration of one options class, before inheritance is applied.
#[derive(Debug, Clone)]
pub struct SchemaDef {
    pub(crate) name: String,
    pub(crate) parent: Option<String>,
    pub(crate) optlist: BTreeSet<String>,
    pub(crate) optmap: BTreeMap<String, String>,
    pub(crate) opttypes: BTreeMap<String, Vec<OptType>>,
    pub(crate) optvals: BTreeMap<String, Vec<Value>>,
    pub(crate) optlistdepth: BTreeMap<String, usize>,
    pub(crate) min_len: BTreeMap<String, usize>,
    pub(crate) rc: BTreeMap<String, Value>,
    pub(crate) sec_cls: BTreeMap<String, String>,
    pub(crate) tagged: Option<TaggedDef>,
    pub(crate) descriptions: BTreeMap<String, String>,
    pub(crate) open: Option<bool>,
    pub(crate) warn_mode: Option<WarnMode>,
    pub(crate) hooks: Hooks,
}

impl SchemaDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            optlist: BTreeSet::new(),
            optmap: BTreeMap::new(),
            opttypes: BTreeMap::new(),
            optvals: BTreeMap::new(),
            optlistdepth: BTreeMap::new(),
            min_len: BTreeMap::new(),
            rc: BTreeMap::new(),
            sec_cls: BTreeMap::new(),
            tagged: None,
            descriptions: BTreeMap::new(),
            open: None,
            warn_mode: None,
            hooks: Hooks::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inherit every declaration of an already registered class.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Add canonical option names.
    pub fn opts<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optlist.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.optmap.insert(alias.into(), canonical.into());
        self
    }

    pub fn types(mut self, key: impl Into<String>, types: &[OptType]) -> Self {
        self.opttypes.insert(key.into(), types.to_vec());
        self
    }

    /// Restrict a key to a closed set of values.
    pub fn values<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.optvals
            .insert(key.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn list_depth(mut self, key: impl Into<String>, depth: usize) -> Self {
        self.optlistdepth.insert(key.into(), depth);
        self
    }

    /// Pad sequences for `key` to at least `len` elements with their last element.
    pub fn min_len(mut self, key: impl Into<String>, len: usize) -> Self {
        self.min_len.insert(key.into(), len);
        self
    }

    pub fn default(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.rc.insert(key.into(), value.into());
        self
    }

    /// Declare a section whose class is fixed.
    pub fn section(mut self, key: impl Into<String>, class: impl Into<String>) -> Self {
        self.sec_cls.insert(key.into(), class.into());
        self
    }

    /// Dispatch undeclared mapping-valued keys on `field` inside their data.
    pub fn tagged(mut self, field: impl Into<String>) -> Self {
        self.tagged.get_or_insert_with(TaggedDef::default).field = Some(field.into());
        self
    }

    /// Map a discriminator value to a section class.
    pub fn kind(mut self, tag: impl Into<String>, class: impl Into<String>) -> Self {
        self.tagged
            .get_or_insert_with(TaggedDef::default)
            .kinds
            .insert(tag.into(), class.into());
        self
    }

    /// Class used when the discriminator is absent or unmapped.
    pub fn fallback(mut self, class: impl Into<String>) -> Self {
        self.tagged.get_or_insert_with(TaggedDef::default).fallback = Some(class.into());
        self
    }

    /// Default a missing discriminator to the key the section is stored under.
    pub fn inject_tag_from_key(mut self) -> Self {
        self.tagged.get_or_insert_with(TaggedDef::default).inject_key = Some(true);
        self
    }

    pub fn describe(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.descriptions.insert(key.into(), text.into());
        self
    }

    /// Accept keys outside the option list.
    pub fn open(mut self) -> Self {
        self.open = Some(true);
        self
    }

    pub fn warn_mode(mut self, mode: WarnMode) -> Self {
        self.warn_mode = Some(mode);
        self
    }

    pub fn preprocess(mut self, hook: fn(&mut Map<String, Value>)) -> Self {
        self.hooks.preprocess = Some(hook);
        self
    }

    pub fn coerce(mut self, hook: fn(&Value) -> Option<Map<String, Value>>) -> Self {
        self.hooks.coerce = Some(hook);
        self
    }

    pub fn post_init(mut self, hook: fn(&mut OptionsNode)) -> Self {
        self.hooks.post_init = Some(hook);
        self
    }
}

/// Effective discriminated union of section classes.
#[derive(Debug, Clone)]
pub struct TaggedUnion {
    pub(crate) field: String,
    pub(crate) kinds: BTreeMap<String, Arc<Schema>>,
    pub(crate) fallback: Option<Arc<Schema>>,
    pub(crate) inject_key: bool,
}

impl TaggedUnion {
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn kind(&self, tag: &str) -> Option<&Arc<Schema>> {
        self.kinds.get(tag)
    }

    pub fn kinds(&self) -> &BTreeMap<String, Arc<Schema>> {
        &self.kinds
    }

    pub fn fallback(&self) -> Option<&Arc<Schema>> {
        self.fallback.as_ref()
    }

    pub fn injects_key(&self) -> bool {
        self.inject_key
    }

    /// Whether a node of class `schema` may be stored in this union.
    pub fn admits(&self, schema: &Schema) -> bool {
        self.kinds
            .values()
            .chain(self.fallback.iter())
            .any(|cls| schema.is_a(cls.name()))
    }
}

/// How the class of a section is chosen.
#[derive(Debug, Clone, Copy)]
pub enum SectionClass<'a> {
    Fixed(&'a Arc<Schema>),
    Tagged(&'a TaggedUnion),
}

/// The effective schema of a class: its declaration merged over all of its
/// ancestors'. Immutable once registered and shared by every node.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(crate) name: String,
    pub(crate) lineage: Vec<String>,
    pub(crate) optlist: BTreeSet<String>,
    pub(crate) optmap: BTreeMap<String, String>,
    pub(crate) opttypes: BTreeMap<String, Vec<OptType>>,
    pub(crate) optvals: BTreeMap<String, Vec<Value>>,
    pub(crate) optlistdepth: BTreeMap<String, usize>,
    pub(crate) min_len: BTreeMap<String, usize>,
    pub(crate) rc: BTreeMap<String, Value>,
    pub(crate) descriptions: BTreeMap<String, String>,
    pub(crate) sections: BTreeMap<String, Arc<Schema>>,
    pub(crate) tagged: Option<TaggedUnion>,
    pub(crate) open: bool,
    pub(crate) warn_mode: WarnMode,
    pub(crate) hooks: Hooks,
}

impl Schema {
    pub(crate) fn root(name: &str) -> Self {
        Self {
            name: name.to_string(),
            lineage: vec![name.to_string()],
            optlist: BTreeSet::new(),
            optmap: BTreeMap::new(),
            opttypes: BTreeMap::new(),
            optvals: BTreeMap::new(),
            optlistdepth: BTreeMap::new(),
            min_len: BTreeMap::new(),
            rc: BTreeMap::new(),
            descriptions: BTreeMap::new(),
            sections: BTreeMap::new(),
            tagged: None,
            open: false,
            warn_mode: WarnMode::default(),
            hooks: Hooks::default(),
        }
    }

    /// A copy of this schema renamed as a subclass.
    pub(crate) fn inherit(&self, name: &str) -> Self {
        let mut lineage = Vec::with_capacity(self.lineage.len() + 1);
        lineage.push(name.to_string());
        lineage.extend(self.lineage.iter().cloned());
        Self {
            name: name.to_string(),
            lineage,
            ..self.clone()
        }
    }

    pub(crate) fn overlay_hooks(&mut self, hooks: Hooks) {
        self.hooks = self.hooks.overlay(hooks);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class names from this class up to its root ancestor.
    pub fn lineage(&self) -> &[String] {
        &self.lineage
    }

    /// Whether this class is `class` or derives from it.
    pub fn is_a(&self, class: &str) -> bool {
        self.lineage.iter().any(|c| c == class)
    }

    /// Canonical spelling of `key`.
    pub fn canonical<'a>(&'a self, key: &'a str) -> &'a str {
        alias::resolve(&self.optmap, key)
    }

    /// Canonical option names, sorted. Sections are not included.
    pub fn option_names(&self) -> impl Iterator<Item = &str> {
        self.optlist.iter().map(String::as_str)
    }

    /// Every name a strict node accepts: options and sections, sorted.
    pub fn allowed_names(&self) -> Vec<&str> {
        let names: BTreeSet<&str> = self
            .optlist
            .iter()
            .chain(self.sections.keys())
            .map(String::as_str)
            .collect();
        names.into_iter().collect()
    }

    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.optmap
    }

    pub fn aliases_of(&self, key: &str) -> Vec<&str> {
        alias::aliases_of(&self.optmap, key)
    }

    pub fn has_option(&self, key: &str) -> bool {
        self.optlist.contains(key)
    }

    /// Whether a node of this class stores `key` as a plain option.
    pub fn accepts(&self, key: &str) -> bool {
        self.open || self.optlist.contains(key)
    }

    pub fn types_of(&self, key: &str) -> Option<&[OptType]> {
        self.opttypes
            .get(key)
            .or_else(|| self.opttypes.get(DEFAULT_KEY))
            .map(Vec::as_slice)
    }

    pub fn allowed_values(&self, key: &str) -> Option<&[Value]> {
        self.optvals
            .get(key)
            .or_else(|| self.optvals.get(DEFAULT_KEY))
            .map(Vec::as_slice)
    }

    pub fn list_depth(&self, key: &str) -> usize {
        self.optlistdepth
            .get(key)
            .or_else(|| self.optlistdepth.get(DEFAULT_KEY))
            .copied()
            .unwrap_or(0)
    }

    pub fn min_len(&self, key: &str) -> Option<usize> {
        self.min_len.get(key).copied()
    }

    pub fn default_of(&self, key: &str) -> Option<&Value> {
        self.rc.get(key)
    }

    pub fn defaults(&self) -> &BTreeMap<String, Value> {
        &self.rc
    }

    pub fn description(&self, key: &str) -> Option<&str> {
        self.descriptions.get(key).map(String::as_str)
    }

    pub fn sections(&self) -> &BTreeMap<String, Arc<Schema>> {
        &self.sections
    }

    pub fn tagged(&self) -> Option<&TaggedUnion> {
        self.tagged.as_ref()
    }

    /// How the class of section `name` is chosen, if `name` can be a section.
    ///
    /// Fixed sections win; declared options are never sections; any other
    /// key is a candidate for the tagged union.
    pub fn section_class(&self, name: &str) -> Option<SectionClass<'_>> {
        if let Some(cls) = self.sections.get(name) {
            return Some(SectionClass::Fixed(cls));
        }
        if self.optlist.contains(name) {
            return None;
        }
        self.tagged.as_ref().map(SectionClass::Tagged)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn warn_mode(&self) -> WarnMode {
        self.warn_mode
    }

    pub fn hooks(&self) -> Hooks {
        self.hooks
    }

    /// Check self-consistency and normalize the defaults.
    pub(crate) fn finalize(mut self) -> Result<Self> {
        let allowed: BTreeSet<&str> = self.allowed_names().into_iter().collect();
        let declared = self
            .opttypes
            .keys()
            .chain(self.optvals.keys())
            .chain(self.optlistdepth.keys())
            .chain(self.min_len.keys())
            .chain(self.rc.keys())
            .chain(self.descriptions.keys());
        for key in declared {
            if key != DEFAULT_KEY && !allowed.contains(key.as_str()) {
                return Err(Error::schema(
                    &self.name,
                    format!("'{key}' is declared but is not in the option list"),
                ));
            }
        }

        for (alias, target) in &self.optmap {
            if !self.optlist.contains(target) && !self.sections.contains_key(target) {
                return Err(Error::schema(
                    &self.name,
                    format!("alias '{alias}' points at undeclared option '{target}'"),
                ));
            }
        }

        if let Some(key) = self.rc.keys().find(|k| self.sections.contains_key(*k)) {
            return Err(Error::schema(
                &self.name,
                format!("section '{key}' cannot have a default value"),
            ));
        }

        if let Some(union) = &self.tagged {
            if union.field.is_empty() {
                return Err(Error::schema(&self.name, "discriminator field is empty"));
            }
        }

        let rc = self
            .rc
            .iter()
            .map(|(key, value)| {
                validate::normalize(&self, key, value.clone())
                    .map(|v| (key.clone(), v))
                    .map_err(|e| {
                        Error::schema(&self.name, format!("invalid default for '{key}': {e}"))
                    })
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        self.rc = rc;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemaRegistry;
    use crate::types;
    use serde_json::json;

    #[test]
    fn test_default_key_applies_to_undeclared() {
        let mut registry = SchemaRegistry::new();
        let schema = registry
            .register(
                SchemaDef::new("ULimitOpts")
                    .opts(["s", "n"])
                    .types("_default_", types::INT_OR_STR)
                    .types("n", types::INT),
            )
            .unwrap();

        assert_eq!(schema.types_of("s"), Some(types::INT_OR_STR));
        assert_eq!(schema.types_of("n"), Some(types::INT));
        assert_eq!(schema.list_depth("s"), 0);
    }

    #[test]
    fn test_inherit_lineage() {
        let mut registry = SchemaRegistry::new();
        registry.register(SchemaDef::new("ExecOpts").opts(["run"])).unwrap();
        let child = registry
            .register(SchemaDef::new("AFLR3Opts").extends("ExecOpts").opts(["mdf"]))
            .unwrap();

        assert_eq!(child.lineage(), ["AFLR3Opts", "ExecOpts"]);
        assert!(child.is_a("ExecOpts"));
        assert!(!child.is_a("RunControlOpts"));
        assert_eq!(child.option_names().collect::<Vec<_>>(), vec!["mdf", "run"]);
    }

    #[test]
    fn test_section_class_precedence() {
        let mut registry = SchemaRegistry::new();
        registry.register(SchemaDef::new("Child")).unwrap();
        let schema = registry
            .register(
                SchemaDef::new("Parent")
                    .opts(["Value"])
                    .section("Fixed", "Child")
                    .tagged("Type")
                    .fallback("Child"),
            )
            .unwrap();

        assert!(matches!(schema.section_class("Fixed"), Some(SectionClass::Fixed(_))));
        assert!(schema.section_class("Value").is_none());
        assert!(matches!(schema.section_class("other"), Some(SectionClass::Tagged(_))));
    }

    #[test]
    fn test_defaults_are_normalized() {
        let mut registry = SchemaRegistry::new();
        let schema = registry
            .register(
                SchemaDef::new("RunMatrixOpts")
                    .opts(["Keys"])
                    .types("Keys", types::STR)
                    .list_depth("Keys", 1)
                    .default("Keys", "mach"),
            )
            .unwrap();
        assert_eq!(schema.default_of("Keys"), Some(&json!(["mach"])));
    }

    #[test]
    fn test_hooks_debug_hides_pointers() {
        let hooks = Hooks::default();
        assert_eq!(
            format!("{hooks:?}"),
            "Hooks { preprocess: false, coerce: false, post_init: false }"
        );
    }
}
