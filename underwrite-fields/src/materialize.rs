//! Expansion of template groups into one concrete group per collection element.
//!
//! Instances are derived on every call from the current data document and are
//! never cached, so adding or removing a vehicle is reflected immediately.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::data;
use crate::path::PLACEHOLDER;
use crate::types::GroupDef;

/// Placeholder in `dynamic_name_pattern` replaced by the 1-based position.
pub const NAME_PLACEHOLDER: &str = "{n}";

/// Ties a template pattern to the array it expands over.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionBinding {
    /// Template pattern as written on the group, e.g. `auto.vehicles[*]`.
    pub pattern: String,
    /// Data path of the array; defaults to the pattern without `[*]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Prefix of instance ids; defaults to the singular collection name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_base: Option<String>,
}

impl CollectionBinding {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            path: None,
            id_base: None,
        }
    }

    pub fn data_path(&self) -> &str {
        self.path
            .as_deref()
            .unwrap_or_else(|| self.pattern.trim_end_matches(PLACEHOLDER))
    }

    /// `client.household_members[*]` → `household_member`.
    pub fn id_base(&self) -> String {
        if let Some(base) = &self.id_base {
            return base.clone();
        }
        let collection = self
            .data_path()
            .rsplit('.')
            .next()
            .unwrap_or_default();
        collection
            .strip_suffix('s')
            .unwrap_or(collection)
            .to_string()
    }
}

/// The set of collections template groups may expand over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionBindings {
    bindings: Vec<CollectionBinding>,
}

impl CollectionBindings {
    /// The repeated collections of the insurance application record.
    pub const BUILTIN: [&'static str; 4] = [
        "client.household_members[*]",
        "home.additional_interests[*]",
        "auto.vehicles[*]",
        "auto.drivers[*]",
    ];

    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    pub fn builtin() -> Self {
        Self {
            bindings: Self::BUILTIN
                .iter()
                .map(|p| CollectionBinding::new(*p))
                .collect(),
        }
    }

    /// Add a binding; one with the same pattern is replaced.
    pub fn with(mut self, binding: CollectionBinding) -> Self {
        match self
            .bindings
            .iter_mut()
            .find(|b| b.pattern == binding.pattern)
        {
            Some(existing) => *existing = binding,
            None => self.bindings.push(binding),
        }
        self
    }

    pub fn find(&self, pattern: &str) -> Option<&CollectionBinding> {
        self.bindings.iter().find(|b| b.pattern == pattern)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollectionBinding> {
        self.bindings.iter()
    }
}

impl Default for CollectionBindings {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Produces concrete per-instance groups from template groups.
#[derive(Debug, Clone, Default)]
pub struct GroupMaterializer {
    bindings: CollectionBindings,
}

impl GroupMaterializer {
    pub fn new(bindings: CollectionBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &CollectionBindings {
        &self.bindings
    }

    /// One group per element of each template's collection, in template order
    /// then element order. Non-template groups, unbound patterns and missing
    /// or non-array collections contribute nothing.
    pub fn materialize<'a>(
        &self,
        templates: impl IntoIterator<Item = &'a GroupDef>,
        data: &Value,
    ) -> Vec<GroupDef> {
        let mut groups = Vec::new();
        for template in templates.into_iter().filter(|g| g.is_template) {
            let Some(pattern) = template.template_pattern.as_deref() else {
                continue;
            };
            let Some(binding) = self.bindings.find(pattern) else {
                debug!(group = %template.id, %pattern, "no collection bound to template pattern");
                continue;
            };
            let count = data::lookup(data, binding.data_path())
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            let base = binding.id_base();
            groups.extend((0..count).map(|i| instance(template, &base, i)));
        }
        groups
    }
}

fn instance(template: &GroupDef, base: &str, index: usize) -> GroupDef {
    let n = (index + 1).to_string();
    let name = match template.dynamic_name_pattern.as_deref() {
        Some(pattern) => pattern.replace(NAME_PLACEHOLDER, &n),
        None => format!("{} {n}", template.name),
    };
    let description = match template.description.as_deref() {
        Some(desc) => desc.replace(NAME_PLACEHOLDER, &n),
        None => format!("Details for {name}"),
    };
    GroupDef {
        id: format!("{base}_{index}"),
        name,
        description: Some(description),
        order: template.order + index as f64,
        parent_group: template.parent_group.clone(),
        is_template: false,
        template_pattern: None,
        dynamic_name_pattern: None,
        instance_of: Some(template.id.clone()),
    }
}
