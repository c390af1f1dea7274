//! Effective option lists for choice fields.

use serde_json::Value;
use tracing::trace;

use crate::data;
use crate::types::{FieldDef, SelectOption};

/// The options a field offers against the current data document.
///
/// Static `options` win. Otherwise, when the field has state-specific options
/// and a state path, the value at that path is upper-cased and used to pick a
/// list, falling back to `default`. Anything else yields an empty list.
pub fn resolve<'a>(field: &'a FieldDef, data: &Value) -> &'a [SelectOption] {
    if let Some(options) = &field.options {
        return options;
    }

    let (Some(by_state), Some(state_path)) = (
        &field.state_specific_options,
        field.depends_on_state_from.as_deref(),
    ) else {
        return &[];
    };

    let code = data::lookup(data, state_path)
        .and_then(Value::as_str)
        .map(str::to_uppercase);
    trace!(key = %field.key, state = ?code, "resolving state-specific options");
    by_state.for_state(code.as_deref())
}
