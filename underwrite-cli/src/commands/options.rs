//! `underwrite options`: effective option list of a choice field.

use anyhow::{bail, Context, Result};
use comfy_table::Table;
use serde_json::Value;
use underwrite_fields::states::state_name;
use underwrite_fields::{data, normalize_state_code, options, DictionaryContext, FieldDef};

use crate::table::new_table;

/// Which list a state-dependent field picks for a record, in words.
pub fn state_note(field: &FieldDef, record: &Value) -> Option<String> {
    if field.options.is_some() {
        return None;
    }
    let (by_state, path) = (
        field.state_specific_options.as_ref()?,
        field.depends_on_state_from.as_deref()?,
    );
    let Some(raw) = data::lookup(record, path).and_then(Value::as_str) else {
        return Some(format!("{path} is not set: default list"));
    };
    let code = raw.to_uppercase();
    if by_state.states().any(|s| s == code) {
        let name = state_name(&code).unwrap_or("unknown region");
        return Some(format!("{path} = {raw:?}: list for {code} ({name})"));
    }
    let hint = match normalize_state_code(raw) {
        Some(normalized) if normalized != code => format!(" (did you mean {normalized}?)"),
        _ => String::new(),
    };
    Some(format!("{path} = {raw:?}: default list{hint}"))
}

/// Value and label of every effective option.
pub fn options_table(field: &FieldDef, record: &Value) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Value", "Label"]);
    for option in options::resolve(field, record) {
        table.add_row(vec![&option.value, &option.label]);
    }
    table
}

pub fn run_options(ctx: &DictionaryContext, key: &str, record: &Value) -> Result<()> {
    let field = ctx
        .fields()
        .resolve(key)
        .with_context(|| format!("no definition applies to '{key}'"))?;
    if !field.input_type.is_choice() {
        bail!("'{key}' is a {:?} field and has no options", field.input_type);
    }
    if let Some(note) = state_note(&field, record) {
        println!("{note}");
    }
    println!("{}", options_table(&field, record));
    println!("{} option(s)", options::resolve(&field, record).len());
    Ok(())
}
