//! The starter dictionary compiled into the binary.
//!
//! Covers the client, home, auto and policy sections of an insurance
//! application, including the four repeated collections. Consumers layer
//! their own dictionary directory on top via `with_defaults()`.

use std::path::PathBuf;

use serde::de::DeserializeOwned;

use crate::context::DictionaryDefaults;
use crate::error::{FieldsError, Result};
use crate::types::{FieldDef, GroupDef};

const FIELD_SOURCES: &[(&str, &str)] = &[
    ("fields/client.yaml", include_str!("../builtin/fields/client.yaml")),
    ("fields/home.yaml", include_str!("../builtin/fields/home.yaml")),
    ("fields/auto.yaml", include_str!("../builtin/fields/auto.yaml")),
    ("fields/policy.yaml", include_str!("../builtin/fields/policy.yaml")),
];

const GROUP_SOURCE: (&str, &str) = ("groups.yaml", include_str!("../builtin/groups.yaml"));

/// Parse the embedded definitions.
pub fn defaults() -> Result<DictionaryDefaults> {
    let mut defaults = DictionaryDefaults::new();
    for (name, source) in FIELD_SOURCES {
        for def in parse::<FieldDef>(name, source)? {
            defaults = defaults.field(def);
        }
    }
    let (name, source) = GROUP_SOURCE;
    for def in parse::<GroupDef>(name, source)? {
        defaults = defaults.group(def);
    }
    Ok(defaults)
}

fn parse<T: DeserializeOwned>(name: &str, source: &str) -> Result<Vec<T>> {
    serde_yaml_ng::from_str(source).map_err(|source| FieldsError::Yaml {
        path: PathBuf::from("builtin").join(name),
        source,
    })
}
