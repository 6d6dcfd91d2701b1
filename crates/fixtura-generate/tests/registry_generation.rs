use std::path::Path;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::json;

use fixtura_core::{ShapeRegistry, validate_registry};
use fixtura_generate::{FixtureEngine, GenerateOptions, GenerationError};

fn registry() -> Arc<ShapeRegistry> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/orders.registry.toml");
    let registry = ShapeRegistry::load(&path).expect("load registry");
    validate_registry(&registry).expect("valid registry");
    Arc::new(registry)
}

fn engine(options: GenerateOptions) -> FixtureEngine {
    FixtureEngine::new(options)
        .expect("engine")
        .with_resolver(registry())
}

#[test]
fn generates_registry_record() {
    let order = engine(GenerateOptions::default().with_collection_size(2))
        .generate_named("Order")
        .expect("generate order");

    assert_eq!(
        order,
        json!({
            "id": 0,
            "customer": { "name": "customer.nameValue", "vip": false },
            "lines": [
                { "sku": "lines0.skuValue", "qty": 0 },
                { "sku": "lines1.skuValue", "qty": 0 },
            ],
            "tags": ["tags0Value", "tags1Value"],
            "totals": { "totals0keyValue": 0.0, "totals1keyValue": 0.0 },
            "status": "Pending",
            "placed_at": "1970-01-01T00:00:00Z",
            "notes": "notesValue",
            "checksum": [0, 0, 0, 0],
        })
    );
}

#[test]
fn options_apply_to_registry_records() {
    let options = GenerateOptions::default()
        .with_prefix("order")
        .with_null_optionals(true)
        .with_reference_instant(Utc.with_ymd_and_hms(2023, 5, 17, 8, 0, 0).unwrap())
        .with_override(r"order\.lines\d+\.qty", 7);
    let order = engine(options).generate_named("Order").expect("generate order");

    assert_eq!(order["notes"], serde_json::Value::Null);
    assert_eq!(order["placed_at"], json!("2023-05-17T08:00:00Z"));
    assert_eq!(order["lines"][2]["qty"], json!(7));
    assert_eq!(order["lines"][2]["sku"], json!("order.lines2.skuValue"));
    assert_eq!(order["customer"]["name"], json!("order.customer.nameValue"));
}

#[test]
fn recursive_registry_record_hits_depth_limit() {
    let err = engine(GenerateOptions::default().with_max_depth(3))
        .generate_named("Category")
        .expect_err("cyclic registry");
    assert!(matches!(
        err,
        GenerationError::CyclicTypeGraph { ref path, ref type_name, max_depth: 3 }
            if path == "parent.parent.parent" && type_name == "Category"
    ));

    let category = engine(GenerateOptions::default().with_null_optionals(true))
        .generate_named("Category")
        .expect("null optionals stop recursion");
    assert_eq!(category, json!({ "title": "titleValue", "parent": null }));
}

#[test]
fn opaque_and_unsupported_registry_fields_fail_with_paths() {
    let err = engine(GenerateOptions::default())
        .generate_named("Payment")
        .expect_err("opaque reference");
    assert!(matches!(
        err,
        GenerationError::NotConstructible { ref path, .. } if path == "reference"
    ));

    let err = engine(GenerateOptions::default().with_override("reference", "ref-1"))
        .generate_named("Payment")
        .expect_err("queue container");
    assert!(matches!(
        err,
        GenerationError::UnsupportedContainerType { ref path, ref container, .. }
            if path == "attempts" && container == "queue"
    ));

    let payment = engine(
        GenerateOptions::default()
            .with_override("reference", "ref-1")
            .with_override("attempts", json!(["first"])),
    )
    .generate_named("Payment")
    .expect("generate payment");
    assert_eq!(
        payment,
        json!({ "amount": 0.0, "reference": "ref-1", "attempts": ["first"] })
    );
}

#[test]
fn unknown_root_is_not_constructible() {
    let err = engine(GenerateOptions::default())
        .generate_named("Invoice")
        .expect_err("unknown record");
    assert!(matches!(
        err,
        GenerationError::NotConstructible { ref path, ref type_name }
            if path.is_empty() && type_name == "Invoice"
    ));

    let err = FixtureEngine::new(GenerateOptions::default())
        .expect("engine")
        .generate_named("Order")
        .expect_err("no registry attached");
    assert!(matches!(err, GenerationError::NotConstructible { .. }));
}

#[test]
fn mistyped_overrides_fail_construction_on_registry_records() {
    let err = engine(GenerateOptions::default().with_override("id", "not-a-number"))
        .generate_named("Order")
        .expect_err("string for i64");
    assert!(matches!(
        err,
        GenerationError::ConstructionFailed { ref path, ref type_name, .. }
            if path.is_empty() && type_name == "Order"
    ));
    assert!(err.to_string().contains("field `id`"));

    let err = engine(GenerateOptions::default().with_override(r"lines\d+\.qty", -1))
        .generate_named("Order")
        .expect_err("negative u32");
    assert!(matches!(
        err,
        GenerationError::ConstructionFailed { ref path, ref type_name, .. }
            if path == "lines0" && type_name == "Line"
    ));

    let err = engine(GenerateOptions::default().with_override("status", "Lost"))
        .generate_named("Order")
        .expect_err("unknown variant");
    assert!(matches!(err, GenerationError::ConstructionFailed { .. }));

    let order = engine(
        GenerateOptions::default()
            .with_override("customer", json!({ "name": "Ada", "vip": true }))
            .with_override("status", "Shipped"),
    )
    .generate_named("Order")
    .expect("well-typed overrides");
    assert_eq!(order["customer"], json!({ "name": "Ada", "vip": true }));
    assert_eq!(order["status"], json!("Shipped"));
}
