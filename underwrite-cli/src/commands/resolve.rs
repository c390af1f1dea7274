//! `underwrite resolve`: show the definition serving a data key.

use anyhow::{Context, Result};
use underwrite_fields::{DictionaryContext, FieldDef};

/// Serialize a resolved definition.
pub fn render(def: &FieldDef, json: bool) -> Result<String> {
    let text = if json {
        serde_json::to_string_pretty(def)?
    } else {
        serde_yaml_ng::to_string(def)?
    };
    Ok(text)
}

pub fn run_resolve(ctx: &DictionaryContext, key: &str, json: bool) -> Result<()> {
    let def = ctx
        .fields()
        .resolve(key)
        .with_context(|| format!("no definition applies to '{key}'"))?;
    if !json {
        if let Some(template) = ctx.fields().template_for(key) {
            println!("# from template {template}");
        }
    }
    print!("{}", render(&def, json)?);
    if json {
        println!();
    }
    Ok(())
}
