//! End-to-end behaviour of the dictionary against the built-in definitions.

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::{json, Value};
use underwrite_fields::{
    builtin, data, options, CollectionBindings, DictionaryContext, FieldDef, FieldRegistry,
    FieldsError, GroupDef, GroupHierarchy, GroupMaterializer, InputType, MatchStrategy,
    SelectOption, StateOptions,
};

async fn builtin_context(strategy: MatchStrategy) -> DictionaryContext {
    DictionaryContext::in_memory()
        .with_defaults(builtin::defaults().unwrap())
        .with_strategy(strategy)
        .build()
        .await
        .unwrap()
}

fn application() -> Value {
    json!({
        "client": {
            "first_name": "Dana",
            "address": { "state": "fl", "zip": "33101" },
            "household_members": [{ "first_name": "Sam", "relationship": "child" }]
        },
        "home": {
            "construction": { "year_built": 1978, "roof_type": "metal" },
            "pool": { "present": false }
        },
        "auto": {
            "vehicles": [
                { "vin": "1HGCM82633A004352", "financed": true, "lienholder": "First Bank" },
                { "vin": "2T1BURHE0JC074242", "financed": false }
            ],
            "drivers": [{ "first_name": "Dana" }]
        }
    })
}

#[tokio::test]
async fn exact_match_is_returned_unchanged() {
    for strategy in [MatchStrategy::Signature, MatchStrategy::Scan] {
        let ctx = builtin_context(strategy).await;
        let stored = ctx.fields().get("client.first_name").unwrap().clone();
        let resolved = ctx.fields().resolve("client.first_name").unwrap();
        assert_eq!(*resolved, stored);
    }
}

#[tokio::test]
async fn template_keys_resolve_per_instance() {
    let ctx = builtin_context(MatchStrategy::Signature).await;
    let def = ctx.fields().resolve("auto.vehicles[1].vin").unwrap();
    assert_eq!(def.key, "auto.vehicles[1].vin");
    assert_eq!(def.group.as_deref(), Some("vehicle_1"));
    assert_eq!(def.input_type, InputType::Vin);

    let def = ctx
        .fields()
        .resolve("client.household_members[0].relationship")
        .unwrap();
    assert_eq!(def.group.as_deref(), Some("household_member_0"));
}

#[tokio::test]
async fn unknown_key_is_not_found() {
    let ctx = builtin_context(MatchStrategy::Scan).await;
    for key in ["client.shoe_size", "auto.vehicles[0].color", "auto.vehicles.vin"] {
        let err = ctx.fields().resolve(key).unwrap_err();
        assert!(err.is_not_found(), "{key}");
        assert!(matches!(err, FieldsError::FieldNotFound { .. }));
    }
}

#[tokio::test]
async fn roof_options_follow_client_state() {
    let ctx = builtin_context(MatchStrategy::Signature).await;
    let roof = ctx.fields().resolve("home.construction.roof_type").unwrap();
    let default = roof
        .state_specific_options
        .as_ref()
        .unwrap()
        .default_options()
        .to_vec();

    let fl = options::resolve(&roof, &application());
    assert!(fl.iter().any(|o| o.value == "concrete_tile"));

    let tx = json!({ "client": { "address": { "state": "OH" } } });
    assert_eq!(options::resolve(&roof, &tx), default.as_slice());
    assert_eq!(options::resolve(&roof, &json!({})), default.as_slice());
}

#[test]
fn static_options_take_precedence() {
    let field = FieldDef {
        options: Some(vec![SelectOption::new("static", "Static")]),
        state_specific_options: Some(
            StateOptions::new(vec![SelectOption::new("d", "D")])
                .with_state("FL", vec![SelectOption::new("fl", "FL")]),
        ),
        depends_on_state_from: Some("state".into()),
        ..FieldDef::new("x", "X", InputType::Dropdown)
    };
    for data in [json!({ "state": "FL" }), json!({ "state": "TX" }), json!({})] {
        assert_eq!(options::resolve(&field, &data)[0].value, "static");
    }
}

#[tokio::test]
async fn hierarchy_tracks_the_document() {
    let ctx = builtin_context(MatchStrategy::Signature).await;
    let mut doc = application();
    let tree = ctx.hierarchy(&doc);

    let top: Vec<_> = tree.top_level.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(top, vec!["client", "home", "auto", "policy"]);

    let auto: Vec<_> = tree
        .children_of("auto")
        .iter()
        .map(|g| g.id.as_str())
        .collect();
    assert_eq!(auto, vec!["vehicle_0", "vehicle_1", "driver_0"]);
    assert_eq!(tree.children_of("auto")[1].name, "Vehicle 2");
    assert!(!tree.walk().any(|(_, g)| g.is_template));

    doc["auto"]["vehicles"]
        .as_array_mut()
        .unwrap()
        .push(json!({ "vin": "3VWFE21C04M000001" }));
    let tree = ctx.hierarchy(&doc);
    assert_eq!(tree.children_of("auto").len(), 4);
}

#[tokio::test]
async fn resolved_groups_exist_in_hierarchy() {
    let ctx = builtin_context(MatchStrategy::Signature).await;
    let doc = application();
    let tree = ctx.hierarchy(&doc);
    let ids: Vec<_> = tree.walk().map(|(_, g)| g.id.clone()).collect();

    for key in data::leaf_keys(&doc) {
        let Ok(def) = ctx.fields().resolve(&key) else {
            continue;
        };
        let group = def.group.clone().unwrap();
        assert!(ids.contains(&group), "{key} -> {group}");
    }
}

#[tokio::test]
async fn lienholder_visible_only_for_financed_vehicle() {
    let ctx = builtin_context(MatchStrategy::Signature).await;
    let doc = application();
    let first = ctx.fields().resolve("auto.vehicles[0].lienholder").unwrap();
    let second = ctx.fields().resolve("auto.vehicles[1].lienholder").unwrap();
    assert!(underwrite_fields::is_visible(&first, &doc));
    assert!(!underwrite_fields::is_visible(&second, &doc));
}

#[test]
fn orphans_never_surface() {
    let tree = GroupHierarchy::build(
        vec![
            GroupDef::new("home", "Home", 1.0),
            GroupDef::new("stray", "Stray", 1.0).with_parent("missing"),
        ],
        Vec::new(),
    );
    assert!(tree.walk().all(|(_, g)| g.id != "stray"));
    assert!(tree.children.values().flatten().all(|g| g.id != "stray"));
}

#[tokio::test]
async fn registries_are_shareable_across_tasks() {
    let ctx = Arc::new(builtin_context(MatchStrategy::Signature).await);
    let mut handles = Vec::new();
    for i in 0..4usize {
        let ctx = Arc::clone(&ctx);
        handles.push(tokio::spawn(async move {
            let key = format!("auto.drivers[{i}].license_number");
            ctx.fields().resolve(&key).map(|d| d.into_owned())
        }));
    }
    for (i, handle) in handles.into_iter().enumerate() {
        let def = handle.await.unwrap().unwrap();
        assert_eq!(def.group, Some(format!("driver_{i}")));
    }
}

#[test]
fn operations_are_idempotent() {
    let registry = FieldRegistry::new(vec![FieldDef {
        group: Some("vehicle_template".into()),
        ..FieldDef::new("auto.vehicles[*].vin", "VIN", InputType::Vin)
    }])
    .unwrap();
    assert_eq!(
        registry.resolve("auto.vehicles[4].vin").unwrap(),
        registry.resolve("auto.vehicles[4].vin").unwrap()
    );

    let doc = json!({ "auto": { "vehicles": [{}, {}] } });
    let template = GroupDef::new("vehicle_template", "Vehicle", 10.0)
        .with_parent("auto")
        .template("auto.vehicles[*]", "Vehicle {n}");
    let m = GroupMaterializer::new(CollectionBindings::builtin());
    assert_eq!(m.materialize([&template], &doc), m.materialize([&template], &doc));
}

proptest! {
    #[test]
    fn template_round_trip(index in 0usize..10_000, strategy in prop_oneof![
        Just(MatchStrategy::Signature),
        Just(MatchStrategy::Scan),
    ]) {
        let registry = FieldRegistry::with_strategy(
            vec![FieldDef {
                group: Some("claim_template".into()),
                ..FieldDef::new("policy.claims[*].amount", "Amount", InputType::Currency)
            }],
            strategy,
        )
        .unwrap();
        let key = format!("policy.claims[{index}].amount");
        let def = registry.resolve(&key).unwrap();
        prop_assert_eq!(&def.key, &key);
        prop_assert_eq!(def.group.clone(), Some(format!("claim_{index}")));
    }

    #[test]
    fn template_round_trip_wide_index(index in "[1-9][0-9]{19,40}") {
        let registry = FieldRegistry::new(vec![FieldDef {
            group: Some("claim_template".into()),
            ..FieldDef::new("policy.claims[*].amount", "Amount", InputType::Currency)
        }])
        .unwrap();
        let key = format!("policy.claims[{index}].amount");
        let def = registry.resolve(&key).unwrap();
        prop_assert_eq!(&def.key, &key);
        prop_assert_eq!(def.group.clone(), Some(format!("claim_{index}")));
    }

    #[test]
    fn materialized_count_matches_collection(len in 0usize..40) {
        let vehicles = vec![json!({}); len];
        let doc = json!({ "auto": { "vehicles": vehicles } });
        let template = GroupDef::new("vehicle_template", "Vehicle", 10.0)
            .with_parent("auto")
            .template("auto.vehicles[*]", "Vehicle {n}");
        let groups = GroupMaterializer::default().materialize([&template], &doc);
        prop_assert_eq!(groups.len(), len);
        for (i, group) in groups.iter().enumerate() {
            prop_assert_eq!(&group.id, &format!("vehicle_{i}"));
            prop_assert_eq!(group.order, 10.0 + i as f64);
        }
    }
}
