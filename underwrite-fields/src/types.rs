//! Core field and group types for the dictionary.
//!
//! All types serialize to/from YAML via serde. Field definitions describe how a
//! single data-schema key is presented. Group definitions are the orderable
//! containers fields are rendered in; template groups expand into one concrete
//! group per element of a repeated collection.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::MissingDefault;
use crate::path;

/// A single selectable option of a dropdown, radio or multiselect field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The input widget a field is edited with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    Text,
    Number,
    Currency,
    Percentage,
    Phone,
    Email,
    Date,
    Dropdown,
    Multiselect,
    Textarea,
    Radio,
    Checkbox,
    Zip,
    Ssn,
    License,
    Vin,
    Address,
    MaterialPercentage,
    ClaimsArray,
}

impl InputType {
    /// Inputs that pick from an option list.
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            InputType::Dropdown | InputType::Multiselect | InputType::Radio
        )
    }
}

/// Text-transform hint for displaying or entering a value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Casing {
    Upper,
    Lower,
    Title,
    Sentence,
    Preserve,
}

impl Casing {
    /// Apply the transform to a display string.
    pub fn apply(self, s: &str) -> String {
        match self {
            Casing::Upper => s.to_uppercase(),
            Casing::Lower => s.to_lowercase(),
            Casing::Title => s
                .split(' ')
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" "),
            Casing::Sentence => capitalize(&s.to_lowercase()),
            Casing::Preserve => s.to_string(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Kind of a descriptive validation rule. Rules are carried for the
/// rendering layer; the dictionary does not enforce them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    Required,
    Min,
    Max,
    MinLength,
    MaxLength,
    Pattern,
    Email,
    Phone,
    Zip,
    Custom,
}

/// One validation rule: kind, optional parameter, message shown on failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationRule {
    pub kind: ValidationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    pub message: String,
}

/// Top-level domain a field belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Client,
    Home,
    Auto,
    Umbrella,
    Policy,
}

/// Comparison used by a visibility rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    In,
    NotIn,
    Exists,
    NotExists,
    GreaterThan,
    LessThan,
}

/// Visibility rule: show the field only when `field` compares to `value`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conditional {
    pub field: String,
    pub operator: ConditionOperator,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub value: serde_json::Value,
}

/// Region-dependent option lists with a mandatory fallback.
///
/// Serialized as a flat map of region code to option list in which the
/// `default` entry is required. Region codes are upper-cased on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "IndexMap<String, Vec<SelectOption>>",
    into = "IndexMap<String, Vec<SelectOption>>"
)]
pub struct StateOptions {
    default: Vec<SelectOption>,
    states: IndexMap<String, Vec<SelectOption>>,
}

impl StateOptions {
    pub const DEFAULT_KEY: &'static str = "default";

    pub fn new(default: Vec<SelectOption>) -> Self {
        Self {
            default,
            states: IndexMap::new(),
        }
    }

    /// Add (or replace) the list for a region code.
    pub fn with_state(mut self, code: &str, options: Vec<SelectOption>) -> Self {
        self.states.insert(code.to_uppercase(), options);
        self
    }

    /// The fallback list.
    pub fn default_options(&self) -> &[SelectOption] {
        &self.default
    }

    /// Region codes with their own list, in definition order.
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    /// The list for an already-normalized region code, or the default.
    pub fn for_state(&self, code: Option<&str>) -> &[SelectOption] {
        code.and_then(|c| self.states.get(c))
            .map(Vec::as_slice)
            .unwrap_or(self.default.as_slice())
    }
}

impl TryFrom<IndexMap<String, Vec<SelectOption>>> for StateOptions {
    type Error = MissingDefault;

    fn try_from(mut map: IndexMap<String, Vec<SelectOption>>) -> Result<Self, Self::Error> {
        let default = map.shift_remove(Self::DEFAULT_KEY).ok_or(MissingDefault)?;
        let states = map
            .into_iter()
            .map(|(code, options)| (code.to_uppercase(), options))
            .collect();
        Ok(Self { default, states })
    }
}

impl From<StateOptions> for IndexMap<String, Vec<SelectOption>> {
    fn from(opts: StateOptions) -> Self {
        let mut map = opts.states;
        map.insert(StateOptions::DEFAULT_KEY.to_string(), opts.default);
        map
    }
}

fn is_zero(n: &f64) -> bool {
    *n == 0.0
}

/// A field definition: presentation metadata for one data-schema key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDef {
    /// Dotted path; may contain `[*]` (template) or a concrete index.
    pub key: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub input_type: InputType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_specific_options: Option<StateOptions>,
    /// Data path the region code is read from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on_state_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_casing: Option<Casing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_casing: Option<Casing>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validations: Vec<ValidationRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub order: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<Conditional>,
}

impl FieldDef {
    /// Minimal definition; remaining metadata is filled in with struct update syntax.
    pub fn new(key: impl Into<String>, label: impl Into<String>, input_type: InputType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: None,
            input_type,
            options: None,
            state_specific_options: None,
            depends_on_state_from: None,
            display_casing: None,
            input_casing: None,
            validations: Vec::new(),
            group: None,
            order: 0.0,
            section: None,
            conditional: None,
        }
    }

    /// True when the key carries a `[*]` placeholder.
    pub fn is_template(&self) -> bool {
        path::is_template_key(&self.key)
    }

    pub fn is_required(&self) -> bool {
        self.validations
            .iter()
            .any(|v| v.kind == ValidationKind::Required)
    }
}

/// A group definition: a named, orderable container of fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupDef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub order: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_group: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_template: bool,
    /// Collection this template expands over, e.g. `auto.vehicles[*]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_pattern: Option<String>,
    /// Instance name with `{n}` standing for the 1-based position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_name_pattern: Option<String>,
    /// Set on materialized instances: the template they came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_of: Option<String>,
}

impl GroupDef {
    pub fn new(id: impl Into<String>, name: impl Into<String>, order: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            order,
            parent_group: None,
            is_template: false,
            template_pattern: None,
            dynamic_name_pattern: None,
            instance_of: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_group = Some(parent.into());
        self
    }

    /// Turn this group into a template over `pattern`.
    pub fn template(mut self, pattern: impl Into<String>, name_pattern: impl Into<String>) -> Self {
        self.is_template = true;
        self.template_pattern = Some(pattern.into());
        self.dynamic_name_pattern = Some(name_pattern.into());
        self
    }
}
