//! `underwrite groups`: the navigation tree for a record.

use anyhow::Result;
use comfy_table::Table;
use serde_json::Value;
use underwrite_fields::{DictionaryContext, GroupDef};

use crate::table::{new_table, truncate, MAX_CELL_LENGTH};

/// Number of fields a group renders. Instances render their template's fields.
fn field_count(ctx: &DictionaryContext, group: &GroupDef) -> usize {
    let id = group.instance_of.as_deref().unwrap_or(&group.id);
    ctx.fields().fields_in_group(id).len()
}

/// One row per group, children indented under their parent.
pub fn groups_table(ctx: &DictionaryContext, record: &Value) -> Table {
    let hierarchy = ctx.hierarchy(record);
    let mut table = new_table();
    table.set_header(vec!["Group", "Id", "Order", "Fields"]);
    for (depth, group) in hierarchy.walk() {
        let name = match depth {
            0 => group.name.clone(),
            _ => format!("  └ {}", group.name),
        };
        table.add_row(vec![
            truncate(&name, MAX_CELL_LENGTH),
            group.id.clone(),
            group.order.to_string(),
            field_count(ctx, group).to_string(),
        ]);
    }
    table
}

pub fn run_groups(ctx: &DictionaryContext, record: &Value) -> Result<()> {
    println!("{}", groups_table(ctx, record));
    let hierarchy = ctx.hierarchy(record);
    let instances = hierarchy
        .walk()
        .filter(|(_, g)| g.instance_of.is_some())
        .count();
    println!(
        "{} group(s), {instances} from repeated collections",
        hierarchy.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use underwrite_fields::builtin;

    async fn ctx() -> DictionaryContext {
        DictionaryContext::in_memory()
            .with_defaults(builtin::defaults().unwrap())
            .build()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_instances_follow_record() {
        let ctx = ctx().await;
        let record = json!({ "auto": { "vehicles": [{}, {}] } });
        let rendered = groups_table(&ctx, &record).to_string();
        assert!(rendered.contains("Vehicle 1"));
        assert!(rendered.contains("vehicle_1"));
        assert!(!rendered.contains("vehicle_2"));
        assert!(!rendered.contains("vehicle_template"));
        assert!(!rendered.contains("driver_0"));
    }

    #[tokio::test]
    async fn test_instance_counts_template_fields() {
        let ctx = ctx().await;
        let record = json!({ "auto": { "vehicles": [{}] } });
        let hierarchy = ctx.hierarchy(&record);
        let vehicle = &hierarchy.children_of("auto")[0];
        assert_eq!(
            field_count(&ctx, vehicle),
            ctx.fields().fields_in_group("vehicle_template").len()
        );
        assert!(field_count(&ctx, vehicle) > 0);
    }
}
