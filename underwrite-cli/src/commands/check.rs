//! `underwrite check`: load the dictionary and summarize it.

use anyhow::Result;
use comfy_table::Table;
use underwrite_config::Settings;
use underwrite_fields::DictionaryContext;

use crate::table::new_table;

/// Summary of a loaded dictionary.
pub fn summary_table(ctx: &DictionaryContext, settings: &Settings) -> Table {
    let source = match (ctx.root(), settings.builtin) {
        (Some(root), true) => format!("{} + built-in", root.display()),
        (Some(root), false) => root.display().to_string(),
        (None, _) => "built-in".to_string(),
    };
    let fields = ctx.fields();
    let groups = ctx.groups();

    let mut table = new_table();
    table.set_header(vec!["Dictionary", "Value"]);
    table.add_row(vec!["Source".to_string(), source]);
    table.add_row(vec!["Matcher".to_string(), format!("{:?}", settings.matcher)]);
    table.add_row(vec!["Fields".to_string(), fields.len().to_string()]);
    table.add_row(vec![
        "Template fields".to_string(),
        fields.template_count().to_string(),
    ]);
    table.add_row(vec!["Groups".to_string(), groups.len().to_string()]);
    table.add_row(vec![
        "Template groups".to_string(),
        groups.templates().count().to_string(),
    ]);
    table.add_row(vec![
        "Collections".to_string(),
        ctx.materializer().bindings().iter().count().to_string(),
    ]);
    table
}

pub fn run_check(ctx: &DictionaryContext, settings: &Settings) -> Result<()> {
    println!("{}", summary_table(ctx, settings));
    let ungrouped = ctx.fields().iter().filter(|f| f.group.is_none()).count();
    if ungrouped > 0 {
        println!("{ungrouped} field(s) without a group");
    }
    println!("Dictionary OK");
    Ok(())
}
