//! Schema projection over the standard catalog
//!
//! Idempotence, published identifiers, the closed-object policy and the
//! on-disk layout written by the projector.

use std::fs;

use rap_spec::drift;
use rap_spec::{ModelCatalog, OutputFormat, PolicyConfig, SchemaKind, SchemaProjector};
use serde_json::Value;

const BASE: &str = "https://rap-spec.evidencepub.io/v1/schemas/";

#[test]
fn test_projection_is_idempotent() {
    let catalog = ModelCatalog::standard().unwrap();
    let policy = PolicyConfig::default();
    let projector = SchemaProjector::new(&catalog, &policy);

    for kind in SchemaKind::all() {
        let first = projector.generate(*kind).unwrap();
        let second = projector.generate(*kind).unwrap();
        assert_eq!(first.text, second.text, "{}", kind);
        assert_eq!(first.checksum, second.checksum, "{}", kind);
    }
}

#[test]
fn test_every_kind_has_its_published_id() {
    let catalog = ModelCatalog::standard().unwrap();
    let policy = PolicyConfig::default();
    let projector = SchemaProjector::new(&catalog, &policy);

    let expected = [
        (SchemaKind::BaseMeasurement, "measurements/base-measurement.json"),
        (SchemaKind::RelaxometryMri, "measurements/relaxometry-mri.json"),
        (SchemaKind::Timeseries, "measurements/timeseries.json"),
        (SchemaKind::VectorData, "data-types/vector-data.json"),
        (SchemaKind::ResearchProduct, "research-product.json"),
        (SchemaKind::Participant, "participant.json"),
        (SchemaKind::Collection, "collection.json"),
        (SchemaKind::Aggregate, "aggregate.json"),
        (SchemaKind::ApiDescriptor, "api-descriptor.json"),
    ];
    for (kind, path) in expected {
        let schema = projector.project(kind).unwrap();
        assert_eq!(schema["$id"], format!("{}{}", BASE, path));
        assert_eq!(schema["$schema"], "https://json-schema.org/draft/2020-12/schema");
        assert_eq!(schema["title"], kind.root_definition());
        assert_eq!(schema["type"], "object");
    }
}

#[test]
fn test_header_keys_come_last() {
    let catalog = ModelCatalog::standard().unwrap();
    let policy = PolicyConfig::default();
    let projector = SchemaProjector::new(&catalog, &policy);
    let schema = projector.project(SchemaKind::ResearchProduct).unwrap();

    let keys: Vec<&String> = schema.as_object().unwrap().keys().collect();
    let n = keys.len();
    assert_eq!(
        keys[n - 3..],
        [&"$schema".to_string(), &"$id".to_string(), &"additionalProperties".to_string()],
    );
}

#[test]
fn test_closed_policy_follows_configuration() {
    let catalog = ModelCatalog::standard().unwrap();

    let default = PolicyConfig::default();
    let projector = SchemaProjector::new(&catalog, &default);
    let closed: Vec<SchemaKind> = SchemaKind::all()
        .iter()
        .copied()
        .filter(|k| {
            projector.project(*k).unwrap().get("additionalProperties") == Some(&Value::Bool(false))
        })
        .collect();
    assert_eq!(closed, vec![SchemaKind::ResearchProduct]);

    let open = PolicyConfig::open();
    let projector = SchemaProjector::new(&catalog, &open);
    for kind in SchemaKind::all() {
        assert!(projector.project(*kind).unwrap().get("additionalProperties").is_none());
    }
}

#[test]
fn test_nested_definitions_stay_open() {
    let catalog = ModelCatalog::standard().unwrap();
    let policy = PolicyConfig::default();
    let projector = SchemaProjector::new(&catalog, &policy);
    let schema = projector.project(SchemaKind::ResearchProduct).unwrap();

    for (name, def) in schema["$defs"].as_object().unwrap() {
        assert!(def.get("additionalProperties").is_none(), "{}", name);
    }
    let text = serde_json::to_string(&schema).unwrap();
    assert_eq!(text.matches("\"additionalProperties\"").count(), 1);
}

#[test]
fn test_collection_member_is_untagged_union() {
    let catalog = ModelCatalog::standard().unwrap();
    let policy = PolicyConfig::default();
    let projector = SchemaProjector::new(&catalog, &policy);
    let schema = projector.project(SchemaKind::Collection).unwrap();

    let items = &schema["properties"]["member"]["items"];
    assert_eq!(items["oneOf"][0]["$ref"], "#/$defs/ResearchProduct");
    assert_eq!(items["oneOf"][1]["$ref"], "#/$defs/ProductSummary");
    assert!(items.get("discriminator").is_none());
    // The embedded product is reached through the collection, so it is not closed
    assert!(schema["$defs"]["ResearchProduct"].get("additionalProperties").is_none());
}

#[test]
fn test_write_tree_matches_layout() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = ModelCatalog::standard().unwrap();
    let policy = PolicyConfig::default();
    let projector = SchemaProjector::new(&catalog, &policy);

    for kind in SchemaKind::all() {
        let (generated, path) = projector.write(*kind, dir.path()).unwrap();
        assert_eq!(path, dir.path().join(kind.relative_path()));
        let on_disk = fs::read_to_string(&path).unwrap();
        assert!(generated.checksum.verify(&on_disk));
        let parsed: Value = serde_json::from_str(&on_disk).unwrap();
        assert_eq!(parsed, generated.content);
    }

    assert!(dir.path().join("measurements").is_dir());
    assert!(dir.path().join("data-types").is_dir());
    let report = drift::check_all(&projector, dir.path()).unwrap();
    assert!(!report.has_drift());
}

#[test]
fn test_compact_format_changes_text_not_content() {
    let catalog = ModelCatalog::standard().unwrap();
    let policy = PolicyConfig::default();
    let pretty = SchemaProjector::new(&catalog, &policy).generate(SchemaKind::Participant).unwrap();
    let compact = SchemaProjector::new(&catalog, &policy)
        .with_format(OutputFormat::Compact)
        .generate(SchemaKind::Participant)
        .unwrap();

    assert_eq!(pretty.content, compact.content);
    assert_ne!(pretty.checksum, compact.checksum);
    assert_eq!(compact.text.lines().count(), 1);
}
