//! Field registry and group hierarchy for an insurance application record
//!
//! `underwrite-fields` is a schema-only crate: it maps every data key of an
//! application document to presentation metadata and arranges those keys into
//! a navigable tree of groups. It never owns or validates the values
//! themselves; callers pass the data document in wherever the answer depends
//! on it.
//!
//! # Architecture
//!
//! - **Templates**: keys like `auto.vehicles[*].vin` stand for every element of
//!   a repeated collection and resolve against concrete keys like
//!   `auto.vehicles[2].vin`
//! - **State-aware options**: a dropdown can carry per-state option lists read
//!   off another field of the document, with a mandatory fallback
//! - **Dynamic groups**: template groups expand into one group per collection
//!   element on every call, so the tree always mirrors the current data
//! - **YAML on disk**: a dictionary directory holds `fields/*.yaml` and
//!   `groups/*.yaml`, layered over the embedded [`builtin`] dictionary
//! - **Immutable after load**: registries are frozen by the builder and can be
//!   shared across threads

pub mod builtin;
pub mod context;
pub mod data;
pub mod error;
pub mod hierarchy;
pub mod materialize;
pub mod options;
pub mod path;
pub mod registry;
pub mod resolve;
pub mod states;
pub mod types;
pub mod visibility;

pub use context::{DictionaryContext, DictionaryContextBuilder, DictionaryDefaults};
pub use error::{FieldsError, MissingDefault, Result};
pub use hierarchy::GroupHierarchy;
pub use materialize::{CollectionBinding, CollectionBindings, GroupMaterializer};
pub use path::{MatchStrategy, TemplateMatcher};
pub use registry::{FieldRegistry, GroupRegistry};
pub use states::normalize_state_code;
pub use types::{
    Casing, ConditionOperator, Conditional, FieldDef, GroupDef, InputType, Section, SelectOption,
    StateOptions, ValidationKind, ValidationRule,
};
pub use visibility::is_visible;
