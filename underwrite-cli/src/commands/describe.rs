//! `underwrite describe`: every value of a record with its presentation.

use std::borrow::Cow;

use anyhow::Result;
use comfy_table::Table;
use serde_json::Value;
use underwrite_fields::{data, is_visible, DictionaryContext, FieldDef, InputType};

use crate::table::{new_table, truncate, MAX_CELL_LENGTH};

/// A record value matched against the dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub key: String,
    /// `None` when no definition applies; the raw key is shown instead.
    pub label: Option<String>,
    pub group: Option<String>,
    pub value: String,
    pub visible: bool,
}

/// Inputs whose value is an object or array rather than a scalar.
fn is_composite(input_type: InputType) -> bool {
    matches!(
        input_type,
        InputType::MaterialPercentage
            | InputType::ClaimsArray
            | InputType::Address
            | InputType::Multiselect
    )
}

/// `a.b[0].c` → `a.b[0]` → `a.b` → `a`.
fn parent_key(key: &str) -> Option<&str> {
    key.rfind(['.', '[']).map(|cut| &key[..cut])
}

/// The definition for a leaf key: its own, or that of the nearest enclosing
/// composite field.
fn definition_for<'a>(ctx: &'a DictionaryContext, key: &str) -> Option<Cow<'a, FieldDef>> {
    if let Ok(def) = ctx.fields().resolve(key) {
        return Some(def);
    }
    let mut current = parent_key(key);
    while let Some(ancestor) = current {
        if let Ok(def) = ctx.fields().resolve(ancestor) {
            return is_composite(def.input_type).then_some(def);
        }
        current = parent_key(ancestor);
    }
    None
}

fn display_value(def: Option<&FieldDef>, value: &Value) -> String {
    match (value, def.and_then(|d| d.display_casing)) {
        (Value::String(s), Some(casing)) => casing.apply(s),
        (Value::String(s), None) => s.clone(),
        (other, _) => other.to_string(),
    }
}

/// One row per scalar in the record, in key order.
pub fn describe(ctx: &DictionaryContext, record: &Value) -> Vec<Row> {
    data::leaf_keys(record)
        .into_iter()
        .map(|key| {
            let def = definition_for(ctx, &key);
            let value = data::lookup(record, &key).unwrap_or(&Value::Null);
            Row {
                label: def.as_ref().map(|d| d.label.clone()),
                group: def.as_ref().and_then(|d| d.group.clone()),
                value: display_value(def.as_deref(), value),
                visible: def.as_ref().is_none_or(|d| is_visible(d, record)),
                key,
            }
        })
        .collect()
}

pub fn describe_table(rows: &[Row], all: bool) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Key", "Label", "Group", "Value", "Visible"]);
    for row in rows.iter().filter(|r| all || r.visible) {
        table.add_row(vec![
            row.key.clone(),
            row.label.clone().unwrap_or_else(|| "-".to_string()),
            row.group.clone().unwrap_or_else(|| "-".to_string()),
            truncate(&row.value, MAX_CELL_LENGTH),
            if row.visible { "yes" } else { "no" }.to_string(),
        ]);
    }
    table
}

pub fn run_describe(ctx: &DictionaryContext, record: &Value, all: bool) -> Result<()> {
    let rows = describe(ctx, record);
    println!("{}", describe_table(&rows, all));
    let unmatched = rows.iter().filter(|r| r.label.is_none()).count();
    let hidden = rows.iter().filter(|r| !r.visible).count();
    println!(
        "{} value(s), {unmatched} without a definition, {hidden} hidden",
        rows.len()
    );
    Ok(())
}
