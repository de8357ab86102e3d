//! Registry of options classes
//!
//! Classes are registered leaf-first: a parent class and every section
//! class must be registered before the classes that refer to them. The
//! effective schema is computed once, here, and shared through an `Arc`.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::isolate::{self, Input};
use crate::node::{OptionsNode, Source};
use crate::schema::{DEFAULT_TAG_FIELD, Schema, SchemaDef, TaggedDef, TaggedUnion};

/// Process-wide table of effective schemas, keyed by class name.
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    classes: BTreeMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class and return its effective schema.
    ///
    /// Fails with [`Error::Schema`] if the name is taken, a referenced class
    /// is not registered yet, or the merged declaration is inconsistent.
    pub fn register(&mut self, def: SchemaDef) -> Result<Arc<Schema>> {
        if self.classes.contains_key(&def.name) {
            return Err(Error::schema(&def.name, "class is already registered"));
        }
        let schema = Arc::new(self.resolve(def)?.finalize()?);
        tracing::debug!(
            class = %schema.name(),
            options = schema.optlist.len(),
            sections = schema.sections.len(),
            "Registered options class"
        );
        self.classes
            .insert(schema.name().to_string(), Arc::clone(&schema));
        Ok(schema)
    }

    /// Register several classes in order.
    pub fn register_all(&mut self, defs: impl IntoIterator<Item = SchemaDef>) -> Result<()> {
        for def in defs {
            self.register(def)?;
        }
        Ok(())
    }

    pub fn get(&self, class: &str) -> Option<&Arc<Schema>> {
        self.classes.get(class)
    }

    /// Like [`get`](Self::get), failing with [`Error::UnknownClass`].
    pub fn lookup(&self, class: &str) -> Result<&Arc<Schema>> {
        self.classes.get(class).ok_or_else(|| Error::UnknownClass {
            class: class.to_string(),
        })
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// List all registered class names (sorted).
    pub fn names(&self) -> Vec<&str> {
        self.classes.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.classes.values()
    }

    /// Build a node of class `class`.
    pub fn build(&self, class: &str, source: impl Into<Source>) -> Result<OptionsNode> {
        OptionsNode::build(self.lookup(class)?, source)
    }

    /// Extract the node at `path` below a root of class `class`.
    pub fn isolate<'a>(
        &self,
        input: impl Into<Input<'a>>,
        class: &str,
        path: &[&str],
    ) -> Result<Cow<'a, OptionsNode>> {
        isolate::isolate_subsection(input, self.lookup(class)?, path)
    }

    fn referenced(&self, owner: &str, class: &str, role: &str) -> Result<Arc<Schema>> {
        self.classes.get(class).cloned().ok_or_else(|| {
            Error::schema(owner, format!("{role} class '{class}' is not registered"))
        })
    }

    fn resolve(&self, def: SchemaDef) -> Result<Schema> {
        let SchemaDef {
            name,
            parent,
            optlist,
            optmap,
            opttypes,
            optvals,
            optlistdepth,
            min_len,
            rc,
            sec_cls,
            tagged,
            descriptions,
            open,
            warn_mode,
            hooks,
        } = def;

        let mut schema = match parent {
            Some(parent) => self.referenced(&name, &parent, "parent")?.inherit(&name),
            None => Schema::root(&name),
        };

        schema.optlist.extend(optlist);
        schema.optmap.extend(optmap);
        schema.opttypes.extend(opttypes);
        schema.optvals.extend(optvals);
        schema.optlistdepth.extend(optlistdepth);
        schema.min_len.extend(min_len);
        schema.rc.extend(rc);
        schema.descriptions.extend(descriptions);
        for (key, class) in sec_cls {
            let cls = self.referenced(&name, &class, "section")?;
            schema.sections.insert(key, cls);
        }
        if let Some(tagged) = tagged {
            schema.tagged = Some(self.resolve_tagged(&name, schema.tagged.take(), tagged)?);
        }
        if let Some(open) = open {
            schema.open = open;
        }
        if let Some(mode) = warn_mode {
            schema.warn_mode = mode;
        }
        schema.overlay_hooks(hooks);
        Ok(schema)
    }

    fn resolve_tagged(
        &self,
        owner: &str,
        inherited: Option<TaggedUnion>,
        def: TaggedDef,
    ) -> Result<TaggedUnion> {
        let mut union = inherited.unwrap_or_else(|| TaggedUnion {
            field: DEFAULT_TAG_FIELD.to_string(),
            kinds: BTreeMap::new(),
            fallback: None,
            inject_key: false,
        });
        if let Some(field) = def.field {
            union.field = field;
        }
        for (tag, class) in def.kinds {
            let cls = self.referenced(owner, &class, "section")?;
            union.kinds.insert(tag, cls);
        }
        if let Some(class) = def.fallback {
            union.fallback = Some(self.referenced(owner, &class, "fallback")?);
        }
        if let Some(inject) = def.inject_key {
            union.inject_key = inject;
        }
        Ok(union)
    }
}
