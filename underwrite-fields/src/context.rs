//! DictionaryContext: loaded dictionary and its builder.
//!
//! Reads field and group definitions from YAML files under a dictionary
//! directory, layers them over optional defaults, validates the result and
//! freezes it into immutable registries.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{FieldsError, Result};
use crate::hierarchy::GroupHierarchy;
use crate::materialize::{CollectionBindings, GroupMaterializer};
use crate::path::MatchStrategy;
use crate::registry::{FieldRegistry, GroupRegistry};
use crate::types::{FieldDef, GroupDef};

/// A collection of default field and group definitions.
///
/// Definitions loaded from disk with the same key (fields) or id (groups)
/// replace a default in place.
#[derive(Debug, Clone, Default)]
pub struct DictionaryDefaults {
    fields: Vec<FieldDef>,
    groups: Vec<GroupDef>,
}

impl DictionaryDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a default field definition.
    pub fn field(mut self, def: FieldDef) -> Self {
        self.fields.push(def);
        self
    }

    /// Add a default group definition.
    pub fn group(mut self, def: GroupDef) -> Self {
        self.groups.push(def);
        self
    }

    /// Append every definition of `other`.
    pub fn extend(mut self, other: DictionaryDefaults) -> Self {
        self.fields.extend(other.fields);
        self.groups.extend(other.groups);
        self
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn groups(&self) -> &[GroupDef] {
        &self.groups
    }
}

/// Builder for `DictionaryContext`. Created by `DictionaryContext::open()` or
/// `DictionaryContext::in_memory()`.
pub struct DictionaryContextBuilder {
    root: Option<PathBuf>,
    defaults: Option<DictionaryDefaults>,
    strategy: MatchStrategy,
    bindings: CollectionBindings,
    strict: bool,
}

impl DictionaryContextBuilder {
    /// Definitions to load before (and underneath) the files on disk.
    pub fn with_defaults(mut self, defaults: DictionaryDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Collections template groups may expand over.
    pub fn with_bindings(mut self, bindings: CollectionBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// In strict mode an unreadable or duplicate definition fails the build
    /// instead of being skipped with a warning.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Load, merge and validate.
    pub async fn build(self) -> Result<DictionaryContext> {
        let defaults = self.defaults.unwrap_or_default();
        let has_defaults = !defaults.fields.is_empty() || !defaults.groups.is_empty();

        let mut fields: IndexMap<String, FieldDef> = IndexMap::new();
        for def in defaults.fields {
            fields.insert(def.key.clone(), def);
        }
        let mut groups: IndexMap<String, GroupDef> = IndexMap::new();
        for def in defaults.groups {
            groups.insert(def.id.clone(), def);
        }

        if let Some(root) = &self.root {
            if root.is_dir() {
                let loaded: Vec<FieldDef> = load_dir(&root.join("fields"), self.strict).await?;
                merge(&mut fields, loaded, |f| f.key.clone(), self.strict, |key| {
                    FieldsError::DuplicateFieldKey { key }
                })?;
                let loaded: Vec<GroupDef> = load_dir(&root.join("groups"), self.strict).await?;
                merge(&mut groups, loaded, |g| g.id.clone(), self.strict, |id| {
                    FieldsError::DuplicateGroupId { id }
                })?;
            } else if !has_defaults {
                return Err(FieldsError::NotInitialized { path: root.clone() });
            } else {
                warn!(path = %root.display(), "dictionary directory not found, using defaults only");
            }
        }

        let ctx = DictionaryContext {
            root: self.root,
            fields: FieldRegistry::with_strategy(fields.into_values(), self.strategy)?,
            groups: GroupRegistry::new(groups.into_values())?,
            materializer: GroupMaterializer::new(self.bindings),
        };
        ctx.warn_dangling_references();

        debug!(
            fields = ctx.fields.len(),
            templates = ctx.fields.template_count(),
            groups = ctx.groups.len(),
            "dictionary context opened"
        );
        Ok(ctx)
    }
}

/// Overlay loaded definitions onto `target`. A definition that repeats one
/// loaded earlier from disk is an error in strict mode, otherwise the later
/// one wins.
fn merge<T>(
    target: &mut IndexMap<String, T>,
    loaded: Vec<T>,
    id_of: impl Fn(&T) -> String,
    strict: bool,
    duplicate: impl Fn(String) -> FieldsError,
) -> Result<()> {
    let mut seen = HashSet::new();
    for def in loaded {
        let id = id_of(&def);
        if !seen.insert(id.clone()) {
            if strict {
                return Err(duplicate(id));
            }
            warn!(%id, "duplicate definition on disk, keeping the later one");
        }
        target.insert(id, def);
    }
    Ok(())
}

/// Read every `.yaml`/`.yml` file in `dir` (sorted by file name), each holding
/// a sequence of definitions. A missing directory loads nothing.
async fn load_dir<T: DeserializeOwned>(dir: &Path, strict: bool) -> Result<Vec<T>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut paths = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        ) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut defs = Vec::new();
    for path in paths {
        let content = fs::read_to_string(&path).await?;
        match serde_yaml_ng::from_str::<Vec<T>>(&content) {
            Ok(mut loaded) => {
                debug!(path = %path.display(), count = loaded.len(), "loaded dictionary file");
                defs.append(&mut loaded);
            }
            Err(source) if strict => return Err(FieldsError::Yaml { path, source }),
            Err(e) => {
                warn!(?path, %e, "skipping invalid dictionary file");
            }
        }
    }
    Ok(defs)
}

/// A loaded, validated dictionary.
///
/// Directory layout:
/// ```text
/// <root>/
///   fields/    ← YAML sequences of field definitions
///   groups/    ← YAML sequences of group definitions
/// ```
#[derive(Debug)]
pub struct DictionaryContext {
    root: Option<PathBuf>,
    fields: FieldRegistry,
    groups: GroupRegistry,
    materializer: GroupMaterializer,
}

impl DictionaryContext {
    /// Load a dictionary directory. Returns a builder for optional configuration.
    ///
    /// ```rust,ignore
    /// let ctx = DictionaryContext::open(path)
    ///     .with_defaults(builtin::defaults()?)
    ///     .build()
    ///     .await?;
    /// let def = ctx.fields().resolve("auto.vehicles[0].vin")?;
    /// ```
    pub fn open(root: impl Into<PathBuf>) -> DictionaryContextBuilder {
        DictionaryContextBuilder {
            root: Some(root.into()),
            ..Self::in_memory()
        }
    }

    /// Build from defaults only, without touching the file system.
    pub fn in_memory() -> DictionaryContextBuilder {
        DictionaryContextBuilder {
            root: None,
            defaults: None,
            strategy: MatchStrategy::default(),
            bindings: CollectionBindings::default(),
            strict: false,
        }
    }

    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    pub fn materializer(&self) -> &GroupMaterializer {
        &self.materializer
    }

    /// The dictionary directory, if loaded from disk.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Navigation tree for a data document.
    pub fn hierarchy(&self, data: &Value) -> GroupHierarchy {
        self.groups.hierarchy(&self.materializer, data)
    }

    /// Report references that point nowhere. These do not fail the load: an
    /// unknown group just leaves the field ungrouped and an unknown
    /// conditional target reads as null.
    fn warn_dangling_references(&self) {
        for field in self.fields.iter() {
            if let Some(group) = field.group.as_deref() {
                if !self.groups.contains(group) {
                    warn!(key = %field.key, %group, "field references unknown group");
                }
            }
            if let Some(rule) = &field.conditional {
                if self.fields.resolve(&rule.field).is_err() {
                    warn!(key = %field.key, target = %rule.field, "conditional targets unknown field");
                }
            }
        }
        for group in self.groups.iter() {
            if let Some(parent) = group.parent_group.as_deref() {
                if !self.groups.contains(parent) {
                    warn!(group = %group.id, %parent, "group references unknown parent");
                }
            }
            if let Some(pattern) = group.template_pattern.as_deref() {
                if self.materializer.bindings().find(pattern).is_none() {
                    warn!(group = %group.id, %pattern, "template pattern has no collection binding");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InputType;
    use tempfile::TempDir;

    fn make_test_field(key: &str, label: &str) -> FieldDef {
        FieldDef::new(key, label, InputType::Text)
    }

    fn sample_defaults() -> DictionaryDefaults {
        DictionaryDefaults::new()
            .field(make_test_field("client.first_name", "First Name"))
            .field(make_test_field("client.last_name", "Last Name"))
            .group(GroupDef::new("client", "Client", 1.0))
    }

    async fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        fs::write(path, content).await.unwrap();
    }

    #[tokio::test]
    async fn in_memory_uses_defaults() {
        let ctx = DictionaryContext::in_memory()
            .with_defaults(sample_defaults())
            .build()
            .await
            .unwrap();
        assert_eq!(ctx.fields().len(), 2);
        assert_eq!(ctx.groups().len(), 1);
        assert!(ctx.root().is_none());
    }

    #[tokio::test]
    async fn missing_root_without_defaults_errors() {
        let tmp = TempDir::new().unwrap();
        let result = DictionaryContext::open(tmp.path().join("nope")).build().await;
        assert!(matches!(result, Err(FieldsError::NotInitialized { .. })));
    }

    #[tokio::test]
    async fn missing_root_with_defaults_loads_defaults() {
        let tmp = TempDir::new().unwrap();
        let ctx = DictionaryContext::open(tmp.path().join("nope"))
            .with_defaults(sample_defaults())
            .build()
            .await
            .unwrap();
        assert_eq!(ctx.fields().len(), 2);
    }

    #[tokio::test]
    async fn loads_files_in_name_order() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(
            root,
            "fields/b_home.yaml",
            "- key: home.construction.year_built\n  label: Year Built\n  input_type: number\n",
        )
        .await;
        write(
            root,
            "fields/a_client.yaml",
            "- key: client.first_name\n  label: First Name\n  input_type: text\n- key: client.email\n  label: Email\n  input_type: email\n",
        )
        .await;
        write(root, "fields/notes.txt", "ignored").await;
        write(root, "groups/main.yml", "- id: client\n  name: Client\n  order: 1\n").await;

        let ctx = DictionaryContext::open(root).build().await.unwrap();
        let keys: Vec<_> = ctx.fields().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["client.first_name", "client.email", "home.construction.year_built"]
        );
        assert!(ctx.groups().contains("client"));
    }

    #[tokio::test]
    async fn disk_definitions_override_defaults_in_place() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(
            root,
            "fields/client.yaml",
            "- key: client.first_name\n  label: Given Name\n  input_type: text\n",
        )
        .await;

        let ctx = DictionaryContext::open(root)
            .with_defaults(sample_defaults())
            .build()
            .await
            .unwrap();
        assert_eq!(ctx.fields().len(), 2);
        let first = ctx.fields().iter().next().unwrap();
        assert_eq!(first.key, "client.first_name");
        assert_eq!(first.label, "Given Name");
    }

    #[tokio::test]
    async fn invalid_file_skipped_unless_strict() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(
            root,
            "fields/bad.yaml",
            "- key: home.construction.roof_type\n  label: Roof\n  input_type: dropdown\n  state_specific_options:\n    FL:\n      - value: metal\n        label: Metal\n",
        )
        .await;
        write(
            root,
            "fields/good.yaml",
            "- key: client.first_name\n  label: First Name\n  input_type: text\n",
        )
        .await;

        let ctx = DictionaryContext::open(root).build().await.unwrap();
        assert_eq!(ctx.fields().len(), 1);

        let result = DictionaryContext::open(root).strict(true).build().await;
        match result {
            Err(FieldsError::Yaml { path, .. }) => assert!(path.ends_with("bad.yaml")),
            other => panic!("expected Yaml error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn duplicate_on_disk_errors_only_when_strict() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(
            root,
            "fields/a.yaml",
            "- key: client.first_name\n  label: One\n  input_type: text\n",
        )
        .await;
        write(
            root,
            "fields/b.yaml",
            "- key: client.first_name\n  label: Two\n  input_type: text\n",
        )
        .await;

        let ctx = DictionaryContext::open(root).build().await.unwrap();
        assert_eq!(ctx.fields().get("client.first_name").unwrap().label, "Two");

        let result = DictionaryContext::open(root).strict(true).build().await;
        assert!(matches!(result, Err(FieldsError::DuplicateFieldKey { .. })));
    }

    #[tokio::test]
    async fn ambiguous_templates_fail_even_when_lenient() {
        let result = DictionaryContext::in_memory()
            .with_strategy(MatchStrategy::Scan)
            .with_defaults(
                DictionaryDefaults::new()
                    .field(make_test_field("auto.vehicles[*].coverages[*].limit", "Limit"))
                    .field(make_test_field("auto.vehicles[*].coverages[0].limit", "Primary")),
            )
            .build()
            .await;
        assert!(matches!(result, Err(FieldsError::AmbiguousTemplate { .. })));
    }

    #[tokio::test]
    async fn context_hierarchy_uses_bindings() {
        let ctx = DictionaryContext::in_memory()
            .with_bindings(CollectionBindings::empty())
            .with_defaults(
                DictionaryDefaults::new()
                    .group(GroupDef::new("auto", "Auto", 1.0))
                    .group(
                        GroupDef::new("vehicle_template", "Vehicle", 10.0)
                            .with_parent("auto")
                            .template("auto.vehicles[*]", "Vehicle {n}"),
                    ),
            )
            .build()
            .await
            .unwrap();
        let data = serde_json::json!({ "auto": { "vehicles": [{}] } });
        assert!(ctx.hierarchy(&data).children_of("auto").is_empty());
    }
}
