//! Configuration nodes
//!
//! An [`OptionsNode`] is a validated, default-aware mapping built from raw
//! input against an effective [`Schema`]. It owns its option values and its
//! child sections; children do not point back at their parent. The path
//! from the root is kept for diagnostics only.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::dispatch;
use crate::error::{Error, Result};
use crate::item;
use crate::schema::{Schema, SectionClass, WarnMode};
use crate::types::type_name;
use crate::validate;

/// Input accepted when building a node.
#[derive(Debug, Clone, Default)]
pub enum Source {
    /// No input; the node holds defaults only
    #[default]
    Empty,
    /// Raw JSON-like data, normally a mapping
    Raw(Value),
    /// An existing node, kept as-is when its class is compatible
    Node(OptionsNode),
}

impl From<Value> for Source {
    fn from(value: Value) -> Self {
        Source::Raw(value)
    }
}

impl From<Map<String, Value>> for Source {
    fn from(map: Map<String, Value>) -> Self {
        Source::Raw(Value::Object(map))
    }
}

impl From<OptionsNode> for Source {
    fn from(node: OptionsNode) -> Self {
        Source::Node(node)
    }
}

impl From<Option<Value>> for Source {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Source::Empty, Source::Raw)
    }
}

/// A schema-validated mapping of options and child sections.
#[derive(Debug, Clone)]
pub struct OptionsNode {
    schema: Arc<Schema>,
    path: Vec<String>,
    options: BTreeMap<String, Value>,
    sections: BTreeMap<String, OptionsNode>,
}

impl PartialEq for OptionsNode {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name()
            && self.options == other.options
            && self.sections == other.sections
    }
}

impl OptionsNode {
    /// A node holding only defaults, with every fixed section present.
    pub fn new(schema: &Arc<Schema>) -> Self {
        Self::with_defaults(schema, Vec::new())
    }

    /// Build a node of class `schema` from `source`.
    ///
    /// Accepts nothing (or `null`), a mapping, a value the class knows how
    /// to coerce into a mapping, or a node whose class is `schema` or a
    /// subclass of it. A compatible node is returned unchanged.
    pub fn build(schema: &Arc<Schema>, source: impl Into<Source>) -> Result<Self> {
        Self::build_at(schema, source.into(), Vec::new())
    }

    fn blank(schema: &Arc<Schema>, path: Vec<String>) -> Self {
        Self {
            schema: Arc::clone(schema),
            path,
            options: BTreeMap::new(),
            sections: BTreeMap::new(),
        }
    }

    fn with_defaults(schema: &Arc<Schema>, path: Vec<String>) -> Self {
        let mut node = Self::blank(schema, path);
        node.fill_sections();
        node.run_post_init();
        node
    }

    fn build_at(schema: &Arc<Schema>, source: Source, path: Vec<String>) -> Result<Self> {
        match source {
            Source::Empty | Source::Raw(Value::Null) => Ok(Self::with_defaults(schema, path)),
            Source::Node(mut node) if node.is_a(schema.name()) => {
                if !path.is_empty() {
                    node.relocate(path);
                }
                Ok(node)
            }
            Source::Node(node) => Err(mismatch(schema, node.class_name())),
            Source::Raw(Value::Object(map)) => Self::from_map(schema, map, path),
            Source::Raw(other) => match schema.hooks().coerce.and_then(|coerce| coerce(&other)) {
                Some(map) => Self::from_map(schema, map, path),
                None => Err(mismatch(schema, type_name(&other))),
            },
        }
    }

    fn from_map(schema: &Arc<Schema>, mut raw: Map<String, Value>, path: Vec<String>) -> Result<Self> {
        if let Some(preprocess) = schema.hooks().preprocess {
            preprocess(&mut raw);
        }
        if let Some(union) = schema.tagged() {
            if union.injects_key() {
                dispatch::inject_discriminators(schema, union, &mut raw);
            }
        }

        let mut node = Self::blank(schema, path);
        let mode = schema.warn_mode();
        for (key, value) in &raw {
            node.assign(key, Source::Raw(value.clone()), mode, Some(&raw))?;
        }
        node.fill_sections();
        node.run_post_init();
        Ok(node)
    }

    fn fill_sections(&mut self) {
        let schema = Arc::clone(&self.schema);
        for (name, cls) in schema.sections() {
            if !self.sections.contains_key(name) {
                let child = Self::with_defaults(cls, self.child_path(name));
                self.sections.insert(name.clone(), child);
            }
        }
    }

    fn run_post_init(&mut self) {
        let hook = self.schema.hooks().post_init;
        if let Some(hook) = hook {
            hook(self);
        }
    }

    fn relocate(&mut self, path: Vec<String>) {
        self.path = path;
        let names: Vec<String> = self.sections.keys().cloned().collect();
        for name in names {
            let child_path = self.child_path(&name);
            if let Some(child) = self.sections.get_mut(&name) {
                child.relocate(child_path);
            }
        }
    }

    fn child_path(&self, name: &str) -> Vec<String> {
        let mut path = self.path.clone();
        path.push(name.to_string());
        path
    }

    /// Route one key to a section or an option, validating it.
    fn assign(
        &mut self,
        key: &str,
        source: Source,
        mode: WarnMode,
        siblings: Option<&Map<String, Value>>,
    ) -> Result<()> {
        let schema = Arc::clone(&self.schema);
        let key = schema.canonical(key);
        let cls = match (schema.section_class(key), &source) {
            (Some(SectionClass::Fixed(cls)), _) => Some(Arc::clone(cls)),
            (Some(SectionClass::Tagged(union)), Source::Node(node)) => {
                if !union.admits(node.schema()) {
                    return Err(mismatch(&schema, node.class_name()));
                }
                Some(Arc::clone(node.schema()))
            }
            (Some(SectionClass::Tagged(union)), Source::Raw(data @ Value::Object(_))) => {
                match dispatch::resolve(&schema, union, key, data, siblings) {
                    Ok(cls) => cls.map(Arc::clone),
                    Err(err) => return self.reject(err, mode),
                }
            }
            _ => None,
        };
        let Some(cls) = cls else {
            return self.assign_option(key, source, mode);
        };
        match Self::build_at(&cls, source, self.child_path(key)) {
            Ok(child) => {
                self.sections.insert(key.to_string(), child);
                Ok(())
            }
            Err(err) => self.reject(err, mode),
        }
    }

    fn assign_option(&mut self, key: &str, source: Source, mode: WarnMode) -> Result<()> {
        let value = match source {
            Source::Empty => Value::Null,
            Source::Raw(value) => value,
            Source::Node(node) => {
                let err = Error::ValueType {
                    class: self.schema.name().to_string(),
                    key: key.to_string(),
                    expected: self
                        .schema
                        .types_of(key)
                        .map(|types| types.iter().map(|t| t.name().to_string()).collect())
                        .unwrap_or_default(),
                    actual: node.class_name().to_string(),
                    index: None,
                };
                return self.reject(err, mode);
            }
        };

        if mode != WarnMode::None && !self.schema.accepts(key) {
            let err = Error::UnrecognizedOption {
                class: self.schema.name().to_string(),
                key: key.to_string(),
                known: self.schema.allowed_names().into_iter().map(String::from).collect(),
            };
            return self.reject(err, mode);
        }

        if value.is_null() {
            self.options.remove(key);
            return Ok(());
        }

        let value = if mode == WarnMode::None {
            value
        } else {
            match validate::normalize(&self.schema, key, value) {
                Ok(value) => value,
                Err(err) => return self.reject(err, mode),
            }
        };
        self.options.insert(key.to_string(), value);
        Ok(())
    }

    fn reject(&self, err: Error, mode: WarnMode) -> Result<()> {
        match mode {
            WarnMode::Error => Err(err),
            WarnMode::Warn => {
                tracing::warn!(section = %self.label(), "{err}");
                Ok(())
            }
            WarnMode::Quiet | WarnMode::None => Ok(()),
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn class_name(&self) -> &str {
        self.schema.name()
    }

    pub fn is_a(&self, class: &str) -> bool {
        self.schema.is_a(class)
    }

    /// Section names from the root to this node.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Class name plus path, for messages.
    pub fn label(&self) -> String {
        if self.path.is_empty() {
            self.class_name().to_string()
        } else {
            format!("{} ({})", self.class_name(), self.path.join(" > "))
        }
    }

    /// Value of `key`, falling back to the class default.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let key = self.schema.canonical(key);
        self.options.get(key).or_else(|| self.schema.default_of(key))
    }

    /// Element `j` of `key`, clamped to the last element.
    ///
    /// A negative `j` returns the whole value. Scalars are returned for any
    /// `j`; an empty sequence yields `None`.
    pub fn get_phase(&self, key: &str, j: i64) -> Option<&Value> {
        self.get(key).and_then(|value| item::sample_phase(value, j))
    }

    /// Element `j mod len` of `key`.
    pub fn get_ring(&self, key: &str, j: i64) -> Option<&Value> {
        self.get(key).and_then(|value| item::sample_ring(value, j))
    }

    /// Copy of `key` with a sequence padded to `len` by its last element.
    pub fn get_padded(&self, key: &str, len: usize) -> Option<Value> {
        let mut value = self.get(key)?.clone();
        if let Value::Array(items) = &mut value {
            item::pad(items, len);
        }
        Some(value)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    /// Whether `key` is stored explicitly (defaults do not count).
    pub fn contains(&self, key: &str) -> bool {
        let key = self.schema.canonical(key);
        self.options.contains_key(key) || self.sections.contains_key(key)
    }

    /// Set `key` using the class warning mode.
    ///
    /// A mapping given for a section key rebuilds that section. `null`
    /// removes the option so its default applies again.
    pub fn set_opt(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let mode = self.schema.warn_mode();
        self.set_opt_with(key, value, mode)
    }

    pub fn set_opt_with(&mut self, key: &str, value: impl Into<Value>, mode: WarnMode) -> Result<()> {
        self.assign(key, Source::Raw(value.into()), mode, None)
    }

    /// Set `key` unless it is already stored.
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        if self.contains(key) {
            return Ok(());
        }
        self.set_opt(key, value)
    }

    /// Store an already built node as section `key`.
    pub fn set_section(&mut self, key: &str, node: OptionsNode) -> Result<()> {
        let mode = self.schema.warn_mode();
        self.assign(key, Source::Node(node), mode, None)
    }

    /// Write element `j` of a sequence option.
    ///
    /// Missing elements before `j` repeat the last existing one; the result
    /// is validated like any other set. `j` must be below
    /// [`MAX_PHASES`](crate::item::MAX_PHASES).
    pub fn set_phase(&mut self, key: &str, j: usize, value: impl Into<Value>) -> Result<()> {
        let key = self.schema.canonical(key).to_string();
        if self.schema.list_depth(&key) == 0 {
            return Err(Error::ListDepth {
                class: self.schema.name().to_string(),
                key,
                expected: 0,
                found: 1,
            });
        }
        let updated = item::set_phase(self.get(&key), j, value.into()).ok_or_else(|| {
            Error::PhaseIndex {
                class: self.schema.name().to_string(),
                key: key.clone(),
                index: j,
                max: item::MAX_PHASES,
            }
        })?;
        self.set_opt(&key, updated)
    }

    /// Append to a sequence option or merge into a mapping option.
    ///
    /// An absent key starts from a copy of its default. Extending with
    /// `null` does nothing.
    pub fn extend_opt(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        if value.is_null() {
            return Ok(());
        }
        let key = self.schema.canonical(key).to_string();
        let depth = self.schema.list_depth(&key);
        let merged = match (self.get(&key).cloned(), value) {
            (None, value) => value,
            (Some(Value::Array(mut items)), Value::Array(more))
                if 1 + more.first().map_or(0, item::array_depth) >= depth =>
            {
                items.extend(more);
                Value::Array(items)
            }
            (Some(Value::Array(mut items)), other) => {
                items.push(other);
                Value::Array(items)
            }
            (Some(Value::Object(mut map)), Value::Object(more)) => {
                map.extend(more);
                Value::Object(map)
            }
            (Some(current), other) => {
                return Err(Error::ValueType {
                    class: self.schema.name().to_string(),
                    key,
                    expected: vec![type_name(&current).to_string()],
                    actual: type_name(&other).to_string(),
                    index: None,
                });
            }
        };
        self.set_opt(&key, merged)
    }

    /// Remove an explicitly stored option.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let key = self.schema.canonical(key).to_string();
        self.options.remove(&key)
    }

    pub fn section(&self, name: &str) -> Option<&OptionsNode> {
        self.sections.get(self.schema.canonical(name))
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut OptionsNode> {
        let name = self.schema.canonical(name).to_string();
        self.sections.get_mut(&name)
    }

    /// Walk a path of section names below this node.
    pub fn get_section(&self, path: &[&str]) -> Result<&OptionsNode> {
        let mut node = self;
        for name in path {
            node = node.section(name).ok_or_else(|| Error::UnknownSection {
                class: node.class_name().to_string(),
                section: name.to_string(),
            })?;
        }
        Ok(node)
    }

    /// Explicitly stored options, sorted by key.
    pub fn options(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Child sections, sorted by key.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &OptionsNode)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of stored options plus sections.
    pub fn len(&self) -> usize {
        self.options.len() + self.sections.len()
    }

    /// True when nothing is stored here or in any section.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.sections.values().all(OptionsNode::is_empty)
    }

    /// Explicit content as a JSON mapping, sections included.
    ///
    /// Building the same class from the result yields an equal node.
    pub fn to_mapping(&self) -> Value {
        let mut map = Map::new();
        for (key, value) in &self.options {
            map.insert(key.clone(), value.clone());
        }
        for (key, section) in &self.sections {
            map.insert(key.clone(), section.to_mapping());
        }
        Value::Object(map)
    }
}

impl Serialize for OptionsNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_mapping().serialize(serializer)
    }
}

impl fmt::Display for OptionsNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_mapping())
    }
}

pub(crate) fn mismatch(schema: &Schema, actual: &str) -> Error {
    let mut expected = String::from("null, a mapping");
    if schema.hooks().coerce.is_some() {
        expected.push_str(", a coercible value");
    }
    expected.push_str(&format!(" or a '{}' node", schema.name()));
    Error::TypeMismatch {
        class: schema.name().to_string(),
        expected,
        actual: actual.to_string(),
    }
}
