//! Template resolution: concrete data key → field definition.

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::error::{FieldsError, Result};
use crate::path;
use crate::registry::FieldRegistry;
use crate::types::FieldDef;

/// Group ids ending in this suffix are rewritten per instance.
pub const TEMPLATE_GROUP_SUFFIX: &str = "_template";

impl FieldRegistry {
    /// Find the definition that applies to a concrete data key.
    ///
    /// An exact entry is returned untouched. Otherwise the matching template is
    /// copied with `key` set to `data_key` and, when its group ends in
    /// `_template`, the group rewritten to `<base>_<index>` using the first
    /// bracketed index of `data_key`.
    pub fn resolve(&self, data_key: &str) -> Result<Cow<'_, FieldDef>> {
        if let Some(def) = self.get(data_key) {
            trace!(key = %data_key, "exact field match");
            return Ok(Cow::Borrowed(def));
        }

        let Some(def) = self.template_for(data_key).and_then(|t| self.get(t)) else {
            debug!(key = %data_key, "no field definition for key");
            return Err(FieldsError::FieldNotFound {
                key: data_key.to_string(),
            });
        };

        trace!(key = %data_key, template = %def.key, "template field match");
        Ok(Cow::Owned(materialize(def, data_key)))
    }
}

/// Copy a template definition onto a concrete key.
fn materialize(template: &FieldDef, data_key: &str) -> FieldDef {
    let mut def = template.clone();
    def.key = data_key.to_string();
    if let Some(index) = path::first_index(data_key) {
        def.group = template
            .group
            .as_deref()
            .map(|group| instance_group(group, index));
    }
    def
}

/// `household_member_template` → `household_member_<index>`; other ids unchanged.
pub fn instance_group(group: &str, index: &str) -> String {
    match group.strip_suffix(TEMPLATE_GROUP_SUFFIX) {
        Some(base) => format!("{base}_{index}"),
        None => group.to_string(),
    }
}
