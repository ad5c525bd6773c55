//! Schema Projector
//!
//! Turns catalog definitions into JSON Schema 2020-12 documents. Nested
//! definitions go under `$defs` and are referenced with `$ref`; keys are
//! emitted in a fixed order so regenerating from an unchanged catalog is
//! byte-identical.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::config::{OutputFormat, PolicyConfig};
use crate::error::{DefinitionError, RapError, Result};
use crate::model::{Constraints, ExtraPolicy, FieldDef, ModelCatalog, ModelDef, TypeDesc};
use crate::schema::{GeneratedSchema, SchemaKind, JSON_SCHEMA_DIALECT};

/// Upper bound on URL length, as common URL validators apply it
pub const MAX_URL_LENGTH: u64 = 2083;

/// URL fields accept the http and https schemes only, in any letter case
pub const URL_SCHEME_PATTERN: &str = "^[Hh][Tt][Tt][Pp][Ss]?://";

/// Projects catalog definitions to JSON Schema documents
pub struct SchemaProjector<'a> {
    catalog: &'a ModelCatalog,
    policy: &'a PolicyConfig,
    format: OutputFormat,
}

impl<'a> SchemaProjector<'a> {
    pub fn new(catalog: &'a ModelCatalog, policy: &'a PolicyConfig) -> Self {
        Self {
            catalog,
            policy,
            format: OutputFormat::Pretty,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    // =========================================================================
    // Public operations
    // =========================================================================

    /// Project a published kind, post-processed with its canonical `$id`
    pub fn project(&self, kind: SchemaKind) -> Result<Value> {
        self.project_with_id(kind.root_definition(), &kind.id())
    }

    /// Project any catalog definition under the given `$id`
    pub fn project_with_id(&self, definition: &str, id: &str) -> Result<Value> {
        let raw = self.project_definition(definition)?;
        Ok(self.post_process(raw, id))
    }

    /// Project, render and fingerprint a published kind without touching disk
    pub fn generate(&self, kind: SchemaKind) -> Result<GeneratedSchema> {
        let content = self.project(kind)?;
        let text = self.render(&content)?;
        Ok(GeneratedSchema::new(kind, content, text))
    }

    /// Generate a published kind and write it under `output_dir`
    pub fn write(&self, kind: SchemaKind, output_dir: &Path) -> Result<(GeneratedSchema, PathBuf)> {
        let generated = self.generate(kind)?;
        let path = output_dir.join(kind.relative_path());
        write_atomic(&path, &generated.text)?;
        info!(
            kind = %kind,
            path = %path.display(),
            checksum = %generated.checksum.short(),
            "Wrote schema"
        );
        Ok((generated, path))
    }

    /// Render a schema document as it is written to disk
    pub fn render(&self, schema: &Value) -> Result<String> {
        let mut text = match self.format {
            OutputFormat::Pretty => serde_json::to_string_pretty(schema)?,
            OutputFormat::Compact => serde_json::to_string(schema)?,
        };
        text.push('\n');
        Ok(text)
    }

    /// Fix up a raw projection for publication.
    ///
    /// Sets `$schema` and `$id`, drops any top-level `additionalProperties`
    /// the raw projection produced, then closes the object again only when
    /// the policy names its definition.
    pub fn post_process(&self, schema: Value, id: &str) -> Value {
        let Value::Object(raw) = schema else {
            return schema;
        };

        let title = raw.get("title").and_then(Value::as_str).map(str::to_string);
        let has_properties = raw.contains_key("properties");

        let mut out: Map<String, Value> = raw
            .into_iter()
            .filter(|(key, _)| !matches!(key.as_str(), "$schema" | "$id" | "additionalProperties"))
            .collect();
        out.insert("$schema".to_string(), json!(JSON_SCHEMA_DIALECT));
        out.insert("$id".to_string(), json!(id));

        if has_properties && title.as_deref().is_some_and(|t| self.policy.is_closed(t)) {
            out.insert("additionalProperties".to_string(), Value::Bool(false));
        }

        Value::Object(out)
    }

    // =========================================================================
    // Raw projection
    // =========================================================================

    /// Raw projection of one definition with every reachable definition under `$defs`
    pub fn project_definition(&self, name: &str) -> Result<Value> {
        let root = self
            .catalog
            .get(name)
            .ok_or_else(|| RapError::schema_generation(name, "definition is not in the catalog"))?;

        let mut nested: Vec<&ModelDef> = self
            .catalog
            .reachable(name)
            .into_iter()
            .filter(|def| def.name != root.name)
            .collect();
        nested.sort_by_key(|def| def.name);

        let mut defs = Map::new();
        for def in nested {
            defs.insert(def.name.to_string(), Value::Object(self.model_schema(def, root.name)?));
        }

        let mut schema = self.model_schema(root, root.name)?;
        if !defs.is_empty() {
            schema.insert("$defs".to_string(), Value::Object(defs));
        }
        Ok(Value::Object(sort_keys(schema)))
    }

    fn model_schema(&self, def: &ModelDef, root: &str) -> Result<Map<String, Value>> {
        debug!(definition = def.name, fields = def.fields.len(), "Projecting definition");

        let mut properties = Map::new();
        let mut required = Vec::new();
        let mut owners: HashMap<&str, &str> = HashMap::new();
        for field in &def.fields {
            if let Some(first) = owners.insert(field.wire_name(), field.name) {
                return Err(DefinitionError::ConflictingAlias {
                    definition: def.name.to_string(),
                    wire_name: field.wire_name().to_string(),
                    first: first.to_string(),
                    second: field.name.to_string(),
                }
                .into());
            }
            let schema = self
                .field_schema(field, root)
                .map_err(|e| with_context(e, def.name, field))?;
            properties.insert(field.wire_name().to_string(), Value::Object(schema));
            if field.required {
                required.push(json!(field.wire_name()));
            }
        }

        let mut schema = Map::new();
        match def.extra {
            ExtraPolicy::Forbid => {
                schema.insert("additionalProperties".to_string(), Value::Bool(false));
            }
            ExtraPolicy::Allow => {
                schema.insert("additionalProperties".to_string(), Value::Bool(true));
            }
            ExtraPolicy::Ignore => {}
        }
        schema.insert("description".to_string(), json!(def.description));
        schema.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), Value::Array(required));
        }
        schema.insert("title".to_string(), json!(def.name));
        schema.insert("type".to_string(), json!("object"));
        Ok(schema)
    }

    fn field_schema(&self, field: &FieldDef, root: &str) -> Result<Map<String, Value>> {
        let mut base = self.type_schema(&field.ty, root)?;
        apply_constraints(&mut base, &field.constraints);
        let base = sort_keys(base);

        let mut schema = if field.nullable {
            let mut wrapped = Map::new();
            wrapped.insert(
                "anyOf".to_string(),
                json!([Value::Object(base), {"type": "null"}]),
            );
            wrapped
        } else {
            base
        };

        if let Some(default) = &field.default {
            schema.insert("default".to_string(), default.clone());
        }
        if let Some(description) = field.description {
            schema.insert("description".to_string(), json!(description));
        }
        if !field.examples.is_empty() {
            schema.insert("examples".to_string(), Value::Array(field.examples.clone()));
        }
        schema.insert("title".to_string(), json!(field.title()));
        Ok(sort_keys(schema))
    }

    fn type_schema(&self, ty: &TypeDesc, root: &str) -> Result<Map<String, Value>> {
        let schema = match ty {
            TypeDesc::String => object([("type", json!("string"))]),
            TypeDesc::Number => object([("type", json!("number"))]),
            TypeDesc::Integer => object([("type", json!("integer"))]),
            TypeDesc::Boolean => object([("type", json!("boolean"))]),
            TypeDesc::Any => Map::new(),
            TypeDesc::Url => object([
                ("format", json!("uri")),
                ("maxLength", json!(MAX_URL_LENGTH)),
                ("minLength", json!(1)),
                ("pattern", json!(URL_SCHEME_PATTERN)),
                ("type", json!("string")),
            ]),
            TypeDesc::Literal([single]) => {
                object([("const", json!(single)), ("type", json!("string"))])
            }
            TypeDesc::Literal(values) => {
                object([("enum", json!(values)), ("type", json!("string"))])
            }
            TypeDesc::Ref(name) => object([("$ref", json!(self.reference(name, root)?))]),
            TypeDesc::List(inner) => object([
                ("items", Value::Object(self.type_schema(inner, root)?)),
                ("type", json!("array")),
            ]),
            TypeDesc::Map(inner) if **inner == TypeDesc::Any => object([("type", json!("object"))]),
            TypeDesc::Map(inner) => object([
                ("additionalProperties", Value::Object(self.type_schema(inner, root)?)),
                ("type", json!("object")),
            ]),
            TypeDesc::Union(options) => {
                let variants = options
                    .iter()
                    .map(|option| self.type_schema(option, root).map(Value::Object))
                    .collect::<Result<Vec<_>>>()?;
                object([("oneOf", Value::Array(variants))])
            }
            TypeDesc::Tagged { discriminator, variants } => {
                let mut mapping = Map::new();
                let mut refs = Vec::new();
                for variant in variants {
                    let reference = self.reference(variant, root)?;
                    let tag = self.variant_tag(variant, discriminator)?;
                    mapping.insert(tag.to_string(), json!(reference));
                    refs.push(json!({ "$ref": reference }));
                }
                object([
                    (
                        "discriminator",
                        json!({ "mapping": mapping, "propertyName": discriminator }),
                    ),
                    ("oneOf", Value::Array(refs)),
                ])
            }
        };
        Ok(schema)
    }

    fn reference(&self, name: &str, root: &str) -> Result<String> {
        if !self.catalog.contains(name) {
            return Err(RapError::schema_generation(
                name,
                format!("'{}' is not declared in the catalog", name),
            ));
        }
        Ok(if name == root {
            "#".to_string()
        } else {
            format!("#/$defs/{}", name)
        })
    }

    fn variant_tag(&self, variant: &str, discriminator: &str) -> Result<&'static str> {
        self.catalog
            .get(variant)
            .and_then(|def| def.wire_field(discriminator))
            .and_then(FieldDef::literal_values)
            .and_then(|values| values.first().copied())
            .ok_or_else(|| {
                RapError::schema_generation(
                    variant,
                    format!("variant has no literal '{}' field", discriminator),
                )
            })
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn object<const N: usize>(entries: [(&str, Value); N]) -> Map<String, Value> {
    entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Rebuild a map with its keys in sorted order
fn sort_keys(map: Map<String, Value>) -> Map<String, Value> {
    let mut entries: Vec<(String, Value)> = map.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries.into_iter().collect()
}

fn apply_constraints(schema: &mut Map<String, Value>, constraints: &Constraints) {
    if let Some(ge) = constraints.ge {
        schema.insert("minimum".to_string(), number(ge));
    }
    if let Some(le) = constraints.le {
        schema.insert("maximum".to_string(), number(le));
    }
    if let Some(gt) = constraints.gt {
        schema.insert("exclusiveMinimum".to_string(), number(gt));
    }
    if let Some(pattern) = constraints.pattern {
        schema.insert("pattern".to_string(), json!(pattern));
    }
    if let Some(min) = constraints.min_items {
        schema.insert("minItems".to_string(), json!(min));
    }
    if let Some(max) = constraints.max_items {
        schema.insert("maxItems".to_string(), json!(max));
    }
}

/// Whole bounds are emitted as integers (`0`, not `0.0`)
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        json!(value as i64)
    } else {
        json!(value)
    }
}

/// Name the definition and field a nested reference failure came from
fn with_context(err: RapError, definition: &str, field: &FieldDef) -> RapError {
    match err {
        RapError::SchemaGeneration { definition: target, reason }
            if reason.contains("not declared") =>
        {
            RapError::schema_generation(
                definition,
                DefinitionError::UndeclaredReference {
                    definition: definition.to_string(),
                    field: field.wire_name().to_string(),
                    target,
                }
                .to_string(),
            )
        }
        other => other,
    }
}

/// Write the whole document at once: temp file in the same directory, then rename
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| RapError::io(parent, e))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, content).map_err(|e| RapError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        RapError::io(path, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ModelCatalog {
        ModelCatalog::standard().unwrap()
    }

    #[test]
    fn test_header_and_id() {
        let catalog = catalog();
        let policy = PolicyConfig::default();
        let projector = SchemaProjector::new(&catalog, &policy);

        let schema = projector.project(SchemaKind::Participant).unwrap();
        assert_eq!(schema["$schema"], JSON_SCHEMA_DIALECT);
        assert_eq!(schema["$id"], "https://rap-spec.evidencepub.io/v1/schemas/participant.json");
        assert_eq!(schema["title"], "Participant");
        assert!(schema.get("additionalProperties").is_none());
    }

    #[test]
    fn test_only_closed_entities_get_additional_properties() {
        let catalog = catalog();
        let policy = PolicyConfig::default();
        let projector = SchemaProjector::new(&catalog, &policy);

        for kind in SchemaKind::all() {
            let schema = projector.project(*kind).unwrap();
            let closed = schema.get("additionalProperties") == Some(&Value::Bool(false));
            assert_eq!(closed, *kind == SchemaKind::ResearchProduct, "{}", kind);
        }
    }

    #[test]
    fn test_policy_can_close_more_entities() {
        let catalog = catalog();
        let policy = PolicyConfig {
            closed_entities: vec!["Participant".to_string()],
        };
        let projector = SchemaProjector::new(&catalog, &policy);
        let participant = projector.project(SchemaKind::Participant).unwrap();
        let product = projector.project(SchemaKind::ResearchProduct).unwrap();
        assert_eq!(participant["additionalProperties"], false);
        assert!(product.get("additionalProperties").is_none());
    }

    #[test]
    fn test_post_process_strips_projection_artifacts() {
        let catalog = catalog();
        let policy = PolicyConfig::open();
        let projector = SchemaProjector::new(&catalog, &policy);
        let raw = json!({
            "$id": "stale",
            "additionalProperties": true,
            "properties": {},
            "title": "Anything",
        });
        let out = projector.post_process(raw, "https://example.org/x.json");
        assert_eq!(out["$id"], "https://example.org/x.json");
        assert!(out.get("additionalProperties").is_none());
        let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["properties", "title", "$schema", "$id"]);
    }

    #[test]
    fn test_field_projection() {
        let catalog = catalog();
        let policy = PolicyConfig::default();
        let projector = SchemaProjector::new(&catalog, &policy);
        let schema = projector.project(SchemaKind::RelaxometryMri).unwrap();
        let props = &schema["properties"];

        assert_eq!(
            props["measurementType"],
            json!({
                "const": "relaxometry_mri",
                "default": "relaxometry_mri",
                "description": "Type of measurement",
                "title": "Measurementtype",
                "type": "string"
            })
        );
        assert_eq!(props["vectorLength"]["anyOf"][0], json!({"minimum": 1, "type": "integer"}));
        assert_eq!(props["vectorLength"]["anyOf"][1], json!({"type": "null"}));
        assert_eq!(props["regionType"]["anyOf"][0]["enum"].as_array().unwrap().len(), 4);
        assert_eq!(schema["required"], json!(["specificMeasure"]));

        let acq = &schema["$defs"]["AcquisitionParameters"]["properties"]["flipAngle"]["anyOf"][0];
        assert_eq!(acq, &json!({"maximum": 180, "minimum": 0, "type": "number"}));
    }

    #[test]
    fn test_tagged_union_projection() {
        let catalog = catalog();
        let policy = PolicyConfig::default();
        let projector = SchemaProjector::new(&catalog, &policy);
        let schema = projector.project(SchemaKind::ResearchProduct).unwrap();
        let measurement = &schema["properties"]["measurement"];

        assert_eq!(measurement["discriminator"]["propertyName"], "measurementType");
        assert_eq!(
            measurement["discriminator"]["mapping"]["timeseries"],
            "#/$defs/TimeseriesMeasurement"
        );
        assert_eq!(measurement["oneOf"].as_array().unwrap().len(), 2);
        assert!(schema["$defs"].get("RelaxometryMRIMeasurement").is_some());
        assert!(schema["$defs"].get("ResearchProduct").is_none());
    }

    #[test]
    fn test_url_and_list_projection() {
        let catalog = catalog();
        let policy = PolicyConfig::default();
        let projector = SchemaProjector::new(&catalog, &policy);
        let schema = projector.project(SchemaKind::VectorData).unwrap();

        assert_eq!(
            schema["properties"]["values"],
            json!({
                "description": "Array of numeric values",
                "items": {"type": "number"},
                "minItems": 1,
                "title": "Values",
                "type": "array"
            })
        );
        let unit = &schema["properties"]["unit"]["oneOf"];
        assert_eq!(unit[0], json!({"$ref": "#/$defs/Unit"}));
        assert_eq!(unit[1]["format"], "uri");
        assert_eq!(unit[1]["maxLength"], 2083);
        assert_eq!(unit[1]["pattern"], URL_SCHEME_PATTERN);
    }

    #[test]
    fn test_render_is_stable() {
        let catalog = catalog();
        let policy = PolicyConfig::default();
        let projector = SchemaProjector::new(&catalog, &policy);
        let first = projector.generate(SchemaKind::Aggregate).unwrap();
        let second = projector.generate(SchemaKind::Aggregate).unwrap();
        assert_eq!(first.text, second.text);
        assert_eq!(first.checksum, second.checksum);
        assert!(first.text.ends_with("}\n"));
        assert!(first.text.starts_with("{\n  \"$defs\""));
    }

    #[test]
    fn test_undeclared_reference_is_generation_error() {
        let catalog = ModelCatalog::from_definitions(vec![
            ModelDef::new("Holder", "h")
                .field(FieldDef::required("item", TypeDesc::Ref("Missing"))),
        ])
        .unwrap();
        let policy = PolicyConfig::default();
        let projector = SchemaProjector::new(&catalog, &policy);
        let err = projector.project_with_id("Holder", "https://example.org/h.json").unwrap_err();
        match err {
            RapError::SchemaGeneration { definition, reason } => {
                assert_eq!(definition, "Holder");
                assert!(reason.contains("Missing"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_conflicting_wire_names_fail_projection() {
        let catalog = ModelCatalog::from_definitions(vec![ModelDef::new("Clash", "c")
            .field(FieldDef::required("type_", TypeDesc::String).alias("kind"))
            .field(FieldDef::required("kind", TypeDesc::Integer))])
        .unwrap();
        let policy = PolicyConfig::default();
        let projector = SchemaProjector::new(&catalog, &policy);
        let err = projector.project_with_id("Clash", "https://example.org/c.json").unwrap_err();
        match err {
            RapError::Definition(DefinitionError::ConflictingAlias {
                wire_name,
                first,
                second,
                ..
            }) => {
                assert_eq!(wire_name, "kind");
                assert_eq!(first, "type_");
                assert_eq!(second, "kind");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_conflict_in_nested_definition_fails_its_root_only() {
        let catalog = ModelCatalog::from_definitions(vec![
            ModelDef::new("Holder", "h").field(FieldDef::required("item", TypeDesc::Ref("Clash"))),
            ModelDef::new("Clash", "c")
                .field(FieldDef::required("type_", TypeDesc::String).alias("kind"))
                .field(FieldDef::required("kind", TypeDesc::Integer)),
            ModelDef::new("Standalone", "s").field(FieldDef::required("name", TypeDesc::String)),
        ])
        .unwrap();
        let policy = PolicyConfig::default();
        let projector = SchemaProjector::new(&catalog, &policy);
        assert!(matches!(
            projector.project_with_id("Holder", "https://example.org/h.json"),
            Err(RapError::Definition(DefinitionError::ConflictingAlias { .. }))
        ));
        assert!(projector.project_with_id("Standalone", "https://example.org/s.json").is_ok());
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog();
        let policy = PolicyConfig::default();
        let projector = SchemaProjector::new(&catalog, &policy);

        let (generated, path) = projector.write(SchemaKind::Timeseries, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("measurements/timeseries.json"));
        assert_eq!(fs::read_to_string(&path).unwrap(), generated.text);
        // Overwriting an existing file is fine
        projector.write(SchemaKind::Timeseries, dir.path()).unwrap();
        assert!(!dir.path().join("measurements/timeseries.json.tmp").exists());
    }
}
