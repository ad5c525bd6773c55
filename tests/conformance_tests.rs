//! The model validator and the JSON Schema engine agree on instances
//!
//! Both engines read the same catalog and policy, so a document the model
//! walk accepts must satisfy the projected schema, and the rejections
//! below must be rejected by both.

use std::path::Path;

use rap_spec::{
    InstanceValidator, ModelCatalog, PolicyConfig, SchemaConformance, SchemaKind, SchemaProjector,
};
use serde_json::{json, Value};

fn load(relative: &str) -> Value {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(relative);
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

/// (model engine accepts, schema engine accepts)
fn both(document: &Value, kind: SchemaKind) -> (bool, bool) {
    let catalog = ModelCatalog::standard().unwrap();
    let policy = PolicyConfig::default();
    let validator = InstanceValidator::new(&catalog, &policy).unwrap();
    let projector = SchemaProjector::new(&catalog, &policy);
    let engine = SchemaConformance::new(&projector).unwrap();

    let model = validator.validate(document, kind).is_ok();
    let schema = engine.is_valid(document, kind).unwrap();
    (model, schema)
}

#[test]
fn test_engines_accept_published_instances() {
    let published = [
        ("samples/timeseries-product.jsonld", SchemaKind::ResearchProduct),
        ("samples/relaxometry-product.jsonld", SchemaKind::ResearchProduct),
        ("tests/fixtures/participant.json", SchemaKind::Participant),
        ("tests/fixtures/aggregate.json", SchemaKind::Aggregate),
        ("tests/fixtures/collection.json", SchemaKind::Collection),
        ("tests/fixtures/api-descriptor.json", SchemaKind::ApiDescriptor),
    ];
    for (relative, kind) in published {
        assert_eq!(both(&load(relative), kind), (true, true), "{}", relative);
    }
}

#[test]
fn test_engines_reject_broken_products() {
    let edits: [(&str, Option<Value>); 5] = [
        ("participant", None),
        (
            "measurement",
            Some(json!({"measurementType": "spectroscopy", "specificMeasure": "gaba"})),
        ),
        ("productType", Some(json!("raw_timeseries"))),
        ("@id", Some(json!("not a url"))),
        ("extraField", Some(json!(true))),
    ];
    for (field, value) in edits {
        let mut doc = load("samples/timeseries-product.jsonld");
        let object = doc.as_object_mut().unwrap();
        match value {
            Some(value) => object.insert(field.to_string(), value),
            None => object.remove(field),
        };
        assert_eq!(both(&doc, SchemaKind::ResearchProduct), (false, false), "{}", field);
    }
}

#[test]
fn test_engines_agree_on_url_schemes() {
    let cases = [
        ("urn:uuid:1234", false),
        ("ftp://data.example.org/products/1", false),
        ("HTTPS://data.example.org/products/1", true),
        ("http://data.example.org:8080/products/1?format=jsonld", true),
    ];
    for (id, valid) in cases {
        let mut doc = load("samples/timeseries-product.jsonld");
        doc["@id"] = json!(id);
        assert_eq!(both(&doc, SchemaKind::ResearchProduct), (valid, valid), "{}", id);
    }
}

#[test]
fn test_engines_reject_out_of_range_flip_angle() {
    let mut doc = load("samples/relaxometry-product.jsonld");
    doc["measurement"]["acquisitionParameters"]["flipAngle"] = json!(181);
    assert_eq!(both(&doc, SchemaKind::ResearchProduct), (false, false));
}

#[test]
fn test_engines_agree_participant_is_open() {
    let mut doc = load("tests/fixtures/participant.json");
    doc["nickname"] = json!("sub-one");
    assert_eq!(both(&doc, SchemaKind::Participant), (true, true));
}

#[test]
fn test_schema_engine_reports_instance_path() {
    let catalog = ModelCatalog::standard().unwrap();
    let policy = PolicyConfig::default();
    let projector = SchemaProjector::new(&catalog, &policy);
    let engine = SchemaConformance::new(&projector).unwrap();

    let mut doc = load("tests/fixtures/aggregate.json");
    doc["aggregates"][0]["statistics"]["confidenceInterval"]["level"] = json!(1.1);
    let violations = engine.violations(&doc, SchemaKind::Aggregate).unwrap();
    assert!(!violations.is_empty());
    // Optional records project as `anyOf [T, null]`, so the engine stops at the field
    assert!(violations
        .iter()
        .any(|v| v.instance_path == "/aggregates/0/statistics/confidenceInterval"));
}
