//! Instance validation against the standard catalog
//!
//! Covers the published sample instances, numeric bounds, the `@type`
//! closure of each entity, the closed-object policy and measurement
//! dispatch.

use std::path::{Path, PathBuf};

use proptest::prelude::*;
use rap_spec::{
    FieldPath, InstanceValidator, ModelCatalog, PolicyConfig, SchemaKind, ValidationError,
    ViolationKind,
};
use serde_json::{json, Value};

fn manifest_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn load(relative: &str) -> Value {
    let text = std::fs::read_to_string(manifest_path(relative)).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn fixture(name: &str) -> Value {
    load(&format!("tests/fixtures/{}", name))
}

fn validate(
    document: &Value,
    kind: SchemaKind,
) -> Result<rap_spec::ValidatedEntity, ValidationError> {
    let catalog = ModelCatalog::standard().unwrap();
    let policy = PolicyConfig::default();
    let validator = InstanceValidator::new(&catalog, &policy).unwrap();
    validator.validate(document, kind)
}

fn minimal_product() -> Value {
    json!({
        "@context": "https://rap-spec.evidencepub.io/v1/context",
        "@type": "ResearchProduct",
        "@id": "https://data.example.org/products/1",
        "productType": "processed_vector",
        "processingLevel": "analysis_ready",
        "participant": {
            "@id": "https://data.example.org/participants/sub-01",
            "identifier": "sub-01"
        },
        "measurement": {
            "measurementType": "timeseries",
            "specificMeasure": "eeg"
        }
    })
}

fn minimal_mri_product() -> Value {
    let mut doc = minimal_product();
    doc["measurement"] = json!({
        "measurementType": "relaxometry_mri",
        "specificMeasure": "t1_relaxation_time"
    });
    doc
}

// =============================================================================
// Published instances
// =============================================================================

const PUBLISHED: [(&str, SchemaKind); 6] = [
    ("samples/timeseries-product.jsonld", SchemaKind::ResearchProduct),
    ("samples/relaxometry-product.jsonld", SchemaKind::ResearchProduct),
    ("tests/fixtures/participant.json", SchemaKind::Participant),
    ("tests/fixtures/aggregate.json", SchemaKind::Aggregate),
    ("tests/fixtures/collection.json", SchemaKind::Collection),
    ("tests/fixtures/api-descriptor.json", SchemaKind::ApiDescriptor),
];

#[test]
fn test_published_instances_are_valid() {
    let catalog = ModelCatalog::standard().unwrap();
    let policy = PolicyConfig::default();
    let validator = InstanceValidator::new(&catalog, &policy).unwrap();

    for (relative, kind) in PUBLISHED {
        let entity = validator
            .validate_file(&manifest_path(relative), kind)
            .unwrap_or_else(|e| panic!("{}: {}", relative, e));
        assert_eq!(entity.kind, kind);
    }
}

#[test]
fn test_sample_measurements_resolve() {
    let timeseries = load("samples/timeseries-product.jsonld");
    let entity = validate(&timeseries, SchemaKind::ResearchProduct).unwrap();
    assert_eq!(entity.variant_at("measurement"), Some("TimeseriesMeasurement"));

    let mri = load("samples/relaxometry-product.jsonld");
    let entity = validate(&mri, SchemaKind::ResearchProduct).unwrap();
    assert_eq!(entity.variant_at("measurement"), Some("RelaxometryMRIMeasurement"));
    assert_eq!(entity.variant_at("measurement.unit"), Some("Unit"));
    assert_eq!(entity.variant_at("data.unit"), Some("Unit"));
}

// =============================================================================
// Bounds
// =============================================================================

fn with_confidence_level(level: Value) -> Value {
    let mut doc = fixture("aggregate.json");
    doc["aggregates"][0]["statistics"]["confidenceInterval"]["level"] = level;
    doc
}

fn with_flip_angle(angle: Value) -> Value {
    let mut doc = minimal_mri_product();
    doc["measurement"]["acquisitionParameters"] = json!({"flipAngle": angle});
    doc
}

#[test]
fn test_confidence_level_boundaries() {
    for level in [json!(0), json!(0.95), json!(1)] {
        assert!(validate(&with_confidence_level(level), SchemaKind::Aggregate).is_ok());
    }
    for level in [json!(1.1), json!(-0.01)] {
        let err = validate(&with_confidence_level(level), SchemaKind::Aggregate).unwrap_err();
        assert_eq!(err.kind, ViolationKind::OutOfRange);
        assert_eq!(err.path.to_string(), "aggregates[0].statistics.confidenceInterval.level");
    }
}

#[test]
fn test_flip_angle_boundaries() {
    for angle in [json!(0), json!(90.5), json!(180)] {
        assert!(validate(&with_flip_angle(angle), SchemaKind::ResearchProduct).is_ok());
    }
    for angle in [json!(181), json!(-1)] {
        let err = validate(&with_flip_angle(angle), SchemaKind::ResearchProduct).unwrap_err();
        assert_eq!(err.kind, ViolationKind::OutOfRange);
        assert_eq!(err.path.to_string(), "measurement.acquisitionParameters.flipAngle");
    }
}

fn out_of_range_angle() -> impl Strategy<Value = f64> {
    prop_oneof![-1.0e6f64..-0.000_001, 180.000_001f64..1.0e6]
}

proptest! {
    /// Any level in [0, 1] is accepted.
    #[test]
    fn confidence_level_in_unit_interval(level in 0.0f64..=1.0) {
        prop_assert!(validate(&with_confidence_level(json!(level)), SchemaKind::Aggregate).is_ok());
    }

    /// Any level above 1 is rejected at the level field.
    #[test]
    fn confidence_level_above_one(level in 1.000_001f64..1.0e6) {
        let err = validate(&with_confidence_level(json!(level)), SchemaKind::Aggregate)
            .unwrap_err();
        prop_assert_eq!(err.kind, ViolationKind::OutOfRange);
    }

    /// Flip angles outside [0, 180] never validate.
    #[test]
    fn flip_angle_outside_range(angle in out_of_range_angle()) {
        let result = validate(&with_flip_angle(json!(angle)), SchemaKind::ResearchProduct);
        prop_assert!(result.is_err());
    }

    /// Non-empty numeric vectors always validate; values keep their order.
    #[test]
    fn non_empty_vectors_validate(values in prop::collection::vec(-1.0e9f64..1.0e9, 1..32)) {
        let doc = json!({"values": values, "unit": {"symbol": "ms"}});
        let entity = validate(&doc, SchemaKind::VectorData).unwrap();
        prop_assert_eq!(entity.get("values"), Some(&json!(values)));
    }
}

#[test]
fn test_vector_values_not_empty() {
    let doc = json!({"values": [], "unit": {"symbol": "ms"}});
    let err = validate(&doc, SchemaKind::VectorData).unwrap_err();
    assert_eq!(err.kind, ViolationKind::TooShort);
    assert_eq!(err.path.to_string(), "values");

    let doc = json!({"values": [1.0], "unit": {"symbol": "ms"}});
    assert!(validate(&doc, SchemaKind::VectorData).is_ok());
}

#[test]
fn test_page_numbers_start_at_one() {
    for (page, valid) in [(json!(1), true), (json!(0), false), (json!(-1), false)] {
        let mut doc = fixture("collection.json");
        doc["pagination"]["page"] = page;
        assert_eq!(validate(&doc, SchemaKind::Collection).is_ok(), valid);
    }
}

#[test]
fn test_empty_collection_is_valid() {
    let mut doc = fixture("collection.json");
    doc["totalItems"] = json!(0);
    doc["member"] = json!([]);
    doc.as_object_mut().unwrap().remove("pagination");
    assert!(validate(&doc, SchemaKind::Collection).is_ok());
}

#[test]
fn test_aggregates_must_not_be_empty() {
    let mut doc = fixture("aggregate.json");
    doc["aggregates"] = json!([]);
    let err = validate(&doc, SchemaKind::Aggregate).unwrap_err();
    assert_eq!(err.kind, ViolationKind::TooShort);
    assert_eq!(err.path.to_string(), "aggregates");
}

#[test]
fn test_range_has_exactly_two_items() {
    let mut doc = fixture("aggregate.json");
    doc["aggregates"][0]["statistics"]["range"] = json!([1.0, 2.0, 3.0]);
    let err = validate(&doc, SchemaKind::Aggregate).unwrap_err();
    assert_eq!(err.kind, ViolationKind::TooLong);
}

// =============================================================================
// @type closure
// =============================================================================

#[test]
fn test_entity_type_tag_is_closed() {
    let entities = [
        ("participant.json", SchemaKind::Participant, "Participant"),
        ("aggregate.json", SchemaKind::Aggregate, "AggregateStatistics"),
        ("collection.json", SchemaKind::Collection, "ResearchProductCollection"),
        ("api-descriptor.json", SchemaKind::ApiDescriptor, "ResearchAPIDescriptor"),
    ];
    for (name, kind, tag) in entities {
        let mut doc = fixture(name);
        doc["@type"] = json!("Thing");
        let err = validate(&doc, kind).unwrap_err();
        assert_eq!(err.kind, ViolationKind::NotAllowed);
        assert_eq!(err.path, FieldPath::root().field("@type"));

        // An omitted tag takes the entity's own name
        doc.as_object_mut().unwrap().remove("@type");
        let entity = validate(&doc, kind).unwrap();
        assert_eq!(entity.get("@type"), Some(&json!(tag)));
    }
}

#[test]
fn test_product_type_tag_is_closed() {
    let mut doc = minimal_product();
    doc["@type"] = json!("Dataset");
    let err = validate(&doc, SchemaKind::ResearchProduct).unwrap_err();
    assert_eq!(err.kind, ViolationKind::NotAllowed);
    assert_eq!(
        err.to_string(),
        "ResearchProduct: @type: Input should be 'ResearchProduct', got \"Dataset\"",
    );
}

// =============================================================================
// Closed-object policy
// =============================================================================

#[test]
fn test_closed_policy_applies_to_research_product_only() {
    let mut product = minimal_product();
    product["extraField"] = json!(1);
    let err = validate(&product, SchemaKind::ResearchProduct).unwrap_err();
    assert_eq!(err.kind, ViolationKind::UnknownField);
    assert_eq!(err.path.to_string(), "extraField");

    let mut participant = fixture("participant.json");
    participant["extraField"] = json!(1);
    let entity = validate(&participant, SchemaKind::Participant).unwrap();
    assert!(entity.get("extraField").is_none());
}

#[test]
fn test_open_policy_accepts_product_extras() {
    let catalog = ModelCatalog::standard().unwrap();
    let policy = PolicyConfig::open();
    let validator = InstanceValidator::new(&catalog, &policy).unwrap();
    let mut product = minimal_product();
    product["extraField"] = json!(1);
    assert!(validator.validate(&product, SchemaKind::ResearchProduct).is_ok());
}

// =============================================================================
// Measurements and unions
// =============================================================================

#[test]
fn test_measurement_resolution_fills_discriminator_default() {
    let doc = json!({"specificMeasure": "eeg"});
    let entity = validate(&doc, SchemaKind::Timeseries).unwrap();
    assert_eq!(entity.get("measurementType"), Some(&json!("timeseries")));
    assert_eq!(entity.get("@type"), Some(&json!("Measurement")));
}

#[test]
fn test_measurement_fields_follow_resolved_variant() {
    let mut doc = minimal_product();
    doc["measurement"] = json!({
        "measurementType": "timeseries",
        "specificMeasure": "eeg",
        "channels": {"count": 0}
    });
    let err = validate(&doc, SchemaKind::ResearchProduct).unwrap_err();
    assert_eq!(err.kind, ViolationKind::OutOfRange);
    assert_eq!(err.path.to_string(), "measurement.channels.count");
}

#[test]
fn test_base_measurement_accepts_any_type_string() {
    let doc = json!({"measurementType": "spectroscopy", "specificMeasure": "gaba"});
    assert!(validate(&doc, SchemaKind::BaseMeasurement).is_ok());
}

#[test]
fn test_echo_time_accepts_scalar_or_list() {
    for te in [json!(2.5), json!([2.5, 5.0])] {
        let mut doc = minimal_mri_product();
        doc["measurement"]["acquisitionParameters"] = json!({"TE": te});
        assert!(validate(&doc, SchemaKind::ResearchProduct).is_ok());
    }

    let mut doc = minimal_mri_product();
    doc["measurement"]["acquisitionParameters"] = json!({"TE": "2.5"});
    let err = validate(&doc, SchemaKind::ResearchProduct).unwrap_err();
    assert_eq!(err.kind, ViolationKind::NoMatchingVariant);
    assert_eq!(err.path.to_string(), "measurement.acquisitionParameters.TE");
}

#[test]
fn test_collection_members_resolve_to_summary() {
    let doc = fixture("collection.json");
    let entity = validate(&doc, SchemaKind::Collection).unwrap();
    assert_eq!(entity.variant_at("member[0]"), Some("ProductSummary"));
    assert_eq!(entity.variant_at("member[1]"), Some("ProductSummary"));
}

// =============================================================================
// Aliases and end-to-end
// =============================================================================

#[test]
fn test_aliases_are_the_wire_names() {
    let doc = fixture("api-descriptor.json");
    let entity = validate(&doc, SchemaKind::ApiDescriptor).unwrap();
    assert_eq!(entity.document()["api"]["rapSpecVersion"], "1.0");

    let mut renamed = doc.clone();
    let api = renamed["api"].as_object_mut().unwrap();
    let version = api.remove("rapSpecVersion").unwrap();
    api.insert("rap_spec_version".to_string(), version);
    let err = validate(&renamed, SchemaKind::ApiDescriptor).unwrap_err();
    assert_eq!(err.kind, ViolationKind::Missing);
    assert_eq!(err.path.to_string(), "api.rapSpecVersion");
}

#[test]
fn test_api_descriptor_requires_fixed_context() {
    let mut doc = fixture("api-descriptor.json");
    doc["@context"] = json!({"@vocab": "https://schema.org/"});
    let err = validate(&doc, SchemaKind::ApiDescriptor).unwrap_err();
    assert_eq!(err.kind, ViolationKind::NotAllowed);
    assert_eq!(err.path.to_string(), "@context");
}

#[test]
fn test_end_to_end_minimal_product() {
    let entity = validate(&minimal_product(), SchemaKind::ResearchProduct).unwrap();
    assert_eq!(entity.variant_at("measurement"), Some("TimeseriesMeasurement"));

    let entity = validate(&minimal_mri_product(), SchemaKind::ResearchProduct).unwrap();
    assert_eq!(entity.variant_at("measurement"), Some("RelaxometryMRIMeasurement"));

    let mut doc = minimal_product();
    doc.as_object_mut().unwrap().remove("participant");
    let err = validate(&doc, SchemaKind::ResearchProduct).unwrap_err();
    assert_eq!(err.kind, ViolationKind::Missing);
    assert_eq!(err.path.to_string(), "participant");
    assert_eq!(err.target, "ResearchProduct");
}

#[test]
fn test_validate_str_reports_bad_json() {
    let catalog = ModelCatalog::standard().unwrap();
    let policy = PolicyConfig::default();
    let validator = InstanceValidator::new(&catalog, &policy).unwrap();
    let err = validator.validate_str("{ not json", SchemaKind::Participant).unwrap_err();
    assert!(matches!(err, rap_spec::RapError::Json(_)));
}
