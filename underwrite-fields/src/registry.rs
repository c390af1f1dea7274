//! Immutable field and group registries.
//!
//! Both registries are built once from a set of definitions and never change
//! afterwards. They are `Send + Sync`, so a loaded dictionary can be shared
//! behind an `Arc` and queried from any number of callers.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{FieldsError, Result};
use crate::path::{MatchStrategy, TemplateMatcher};
use crate::types::{FieldDef, GroupDef};

/// Field definitions keyed by data key, in insertion order.
#[derive(Debug)]
pub struct FieldRegistry {
    fields: IndexMap<String, FieldDef>,
    templates: Box<dyn TemplateMatcher>,
}

impl FieldRegistry {
    /// Build with the default matching strategy.
    pub fn new(defs: impl IntoIterator<Item = FieldDef>) -> Result<Self> {
        Self::with_strategy(defs, MatchStrategy::default())
    }

    /// Build with an explicit matching strategy.
    ///
    /// Fails on duplicate keys and on template keys that would match the
    /// same concrete keys.
    pub fn with_strategy(
        defs: impl IntoIterator<Item = FieldDef>,
        strategy: MatchStrategy,
    ) -> Result<Self> {
        let mut fields = IndexMap::new();
        let mut templates = strategy.matcher();
        for def in defs {
            if fields.contains_key(&def.key) {
                return Err(FieldsError::DuplicateFieldKey { key: def.key });
            }
            if def.is_template() {
                templates.insert(&def.key)?;
            }
            fields.insert(def.key.clone(), def);
        }
        debug!(
            fields = fields.len(),
            templates = templates.len(),
            ?strategy,
            "field registry built"
        );
        Ok(Self { fields, templates })
    }

    /// Exact lookup by key, templates included.
    pub fn get(&self, key: &str) -> Option<&FieldDef> {
        self.fields.get(key)
    }

    /// The template key that would serve a concrete key.
    pub fn template_for(&self, key: &str) -> Option<&str> {
        self.templates.find(key)
    }

    /// All definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// Fields assigned to a group, sorted by `order` (ties keep insertion order).
    pub fn fields_in_group(&self, group_id: &str) -> Vec<&FieldDef> {
        let mut fields: Vec<_> = self
            .fields
            .values()
            .filter(|f| f.group.as_deref() == Some(group_id))
            .collect();
        fields.sort_by(|a, b| a.order.total_cmp(&b.order));
        fields
    }
}

/// Group definitions keyed by id, in insertion order.
#[derive(Debug, Clone)]
pub struct GroupRegistry {
    groups: IndexMap<String, GroupDef>,
}

impl GroupRegistry {
    /// Build and validate: unique ids, well-formed templates, acyclic parents.
    pub fn new(defs: impl IntoIterator<Item = GroupDef>) -> Result<Self> {
        let mut groups = IndexMap::new();
        for def in defs {
            if groups.contains_key(&def.id) {
                return Err(FieldsError::DuplicateGroupId { id: def.id });
            }
            if def.is_template {
                check_template(&def)?;
            }
            groups.insert(def.id.clone(), def);
        }
        let registry = Self { groups };
        registry.check_acyclic()?;
        debug!(groups = registry.len(), "group registry built");
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&GroupDef> {
        self.groups.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.groups.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupDef> {
        self.groups.values()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups rendered as-is (templates excluded).
    pub fn static_groups(&self) -> impl Iterator<Item = &GroupDef> {
        self.groups.values().filter(|g| !g.is_template)
    }

    /// Template groups, in insertion order.
    pub fn templates(&self) -> impl Iterator<Item = &GroupDef> {
        self.groups.values().filter(|g| g.is_template)
    }

    /// Follow parent links from every group; revisiting a group on the same
    /// walk means a cycle. Links to unknown parents end the walk.
    fn check_acyclic(&self) -> Result<()> {
        for start in self.groups.values() {
            let mut seen = HashSet::new();
            let mut current = start;
            while let Some(parent_id) = current.parent_group.as_deref() {
                if !seen.insert(current.id.as_str()) {
                    return Err(FieldsError::GroupCycle {
                        id: start.id.clone(),
                    });
                }
                match self.groups.get(parent_id) {
                    Some(parent) => current = parent,
                    None => break,
                }
            }
        }
        Ok(())
    }
}

fn check_template(def: &GroupDef) -> Result<()> {
    let invalid = |message: &str| FieldsError::InvalidTemplateGroup {
        id: def.id.clone(),
        message: message.to_string(),
    };
    if def.template_pattern.as_deref().map_or(true, str::is_empty) {
        return Err(invalid("missing template_pattern"));
    }
    if def.parent_group.as_deref() == Some(def.id.as_str()) {
        return Err(invalid("template is its own parent"));
    }
    Ok(())
}
