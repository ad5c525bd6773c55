//! Instance Validator
//!
//! Walks a parsed JSON-LD document against a catalog definition, depth-first
//! in field declaration order, and stops at the first failure. A document
//! that passes comes back as a [`ValidatedEntity`]: the same document with
//! defaults filled in and keys normalized to wire names, plus the union
//! variant chosen at each polymorphic field.
//!
//! Values are never coerced. A number given as a string is a type error.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{PolicyConfig, RapConfig};
use crate::error::{DefinitionError, FieldPath, RapError, Result, ValidationError, ViolationKind};
use crate::model::{
    format_literals, Constraints, ExtraPolicy, FieldDef, ModelCatalog, ModelDef, TypeDesc,
};
use crate::projector::MAX_URL_LENGTH;
use crate::schema::SchemaKind;

/// Absolute http(s) URL with a non-empty host
const URL_PATTERN: &str = r"^(?i)https?://[^\s/?#@]+(?::\d+)?(?:[/?#]\S*)?$";

type Checked<T> = std::result::Result<T, ValidationError>;

// =============================================================================
// Validated entities
// =============================================================================

/// Union variant chosen while validating
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVariant {
    pub path: FieldPath,
    pub definition: &'static str,
}

/// A document that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEntity {
    pub kind: SchemaKind,
    document: Value,
    variants: Vec<ResolvedVariant>,
}

impl ValidatedEntity {
    /// The document with defaults applied and wire-name keys
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Top-level field by wire name
    pub fn get(&self, wire_name: &str) -> Option<&Value> {
        self.document.get(wire_name)
    }

    pub fn variants(&self) -> &[ResolvedVariant] {
        &self.variants
    }

    /// Definition chosen at `path` (dot/bracket notation), if that path held a union
    pub fn variant_at(&self, path: &str) -> Option<&'static str> {
        self.variants
            .iter()
            .find(|v| v.path.to_string() == path)
            .map(|v| v.definition)
    }
}

// =============================================================================
// Validator
// =============================================================================

/// Validates instance documents against catalog definitions
pub struct InstanceValidator<'a> {
    catalog: &'a ModelCatalog,
    policy: &'a PolicyConfig,
    populate_by_name: bool,
    patterns: HashMap<&'static str, Regex>,
    url: Regex,
}

/// Per-call state threaded through the walk
struct Walk {
    target: &'static str,
    variants: Vec<ResolvedVariant>,
}

impl Walk {
    fn fail(
        &self,
        path: &FieldPath,
        kind: ViolationKind,
        reason: impl Into<String>,
    ) -> ValidationError {
        ValidationError::new(self.target, path.clone(), kind, reason)
    }

    /// A scratch walk for trying one union option
    fn fork(&self) -> Walk {
        Walk {
            target: self.target,
            variants: Vec::new(),
        }
    }
}

impl<'a> InstanceValidator<'a> {
    /// Build a validator, compiling every pattern the catalog declares
    pub fn new(catalog: &'a ModelCatalog, policy: &'a PolicyConfig) -> Result<Self> {
        for kind in SchemaKind::all() {
            if !catalog.contains(kind.root_definition()) {
                return Err(DefinitionError::UndeclaredReference {
                    definition: "schema table".to_string(),
                    field: kind.name().to_string(),
                    target: kind.root_definition().to_string(),
                }
                .into());
            }
        }

        let mut patterns = HashMap::new();
        for def in catalog.iter() {
            for field in &def.fields {
                if let Some(pattern) = field.constraints.pattern {
                    let regex = Regex::new(pattern).map_err(|e| {
                        RapError::schema_generation(
                            def.name,
                            format!("invalid pattern on {}: {}", field.wire_name(), e),
                        )
                    })?;
                    patterns.insert(pattern, regex);
                }
            }
        }

        let url = Regex::new(URL_PATTERN)
            .map_err(|e| RapError::schema_generation("URL", e.to_string()))?;

        Ok(Self {
            catalog,
            policy,
            populate_by_name: false,
            patterns,
            url,
        })
    }

    /// Build a validator with the validation and policy settings of `config`
    pub fn from_config(catalog: &'a ModelCatalog, config: &'a RapConfig) -> Result<Self> {
        Ok(Self::new(catalog, &config.policy)?.populate_by_name(config.validation.populate_by_name))
    }

    /// Also accept internal field names on input
    pub fn populate_by_name(mut self, enabled: bool) -> Self {
        self.populate_by_name = enabled;
        self
    }

    /// Validate a parsed document as `kind`
    pub fn validate(&self, document: &Value, kind: SchemaKind) -> Checked<ValidatedEntity> {
        let target = kind.root_definition();
        let mut walk = Walk {
            target,
            variants: Vec::new(),
        };
        let root = match self.catalog.get(target) {
            Some(def) => def,
            None => {
                return Err(walk.fail(
                    &FieldPath::root(),
                    ViolationKind::NotAllowed,
                    format!("'{}' is not declared in the catalog", target),
                ))
            }
        };

        let normalized = self.check_model(root, document, &FieldPath::root(), true, &mut walk)?;
        Ok(ValidatedEntity {
            kind,
            document: normalized,
            variants: walk.variants,
        })
    }

    /// Parse and validate JSON text
    pub fn validate_str(&self, text: &str, kind: SchemaKind) -> Result<ValidatedEntity> {
        let document: Value = serde_json::from_str(text)?;
        Ok(self.validate(&document, kind)?)
    }

    /// Read, parse and validate one instance file
    pub fn validate_file(&self, path: &Path, kind: SchemaKind) -> Result<ValidatedEntity> {
        let text = fs::read_to_string(path).map_err(|e| RapError::io(path, e))?;
        self.validate_str(&text, kind)
    }

    // =========================================================================
    // Records
    // =========================================================================

    fn check_model(
        &self,
        def: &ModelDef,
        value: &Value,
        path: &FieldPath,
        top_level: bool,
        walk: &mut Walk,
    ) -> Checked<Value> {
        let Value::Object(input) = value else {
            return Err(walk.fail(
                path,
                ViolationKind::WrongType,
                format!("Input should be a valid object ({}), got {}", def.name, json_kind(value)),
            ));
        };

        let closed =
            def.extra == ExtraPolicy::Forbid || (top_level && self.policy.is_closed(def.name));
        let mut output = Map::new();

        for field in &def.fields {
            let wire = field.wire_name();
            let found = input.get(wire).or_else(|| {
                if self.populate_by_name && field.alias.is_some() {
                    input.get(field.name)
                } else {
                    None
                }
            });
            let field_path = path.field(wire);

            match found {
                Some(Value::Null) if field.nullable => {
                    output.insert(wire.to_string(), Value::Null);
                }
                Some(Value::Null) => {
                    return Err(walk.fail(
                        &field_path,
                        ViolationKind::WrongType,
                        format!("Input should be {}, got null", article(&field.ty)),
                    ));
                }
                Some(found) => {
                    let checked = self.check_field(field, found, &field_path, walk)?;
                    output.insert(wire.to_string(), checked);
                }
                None if field.required => {
                    return Err(walk.fail(&field_path, ViolationKind::Missing, "Field required"));
                }
                None => {
                    if let Some(default) = &field.default {
                        output.insert(wire.to_string(), default.clone());
                    }
                }
            }
        }

        for (key, extra) in input {
            if self.is_declared(def, key) {
                continue;
            }
            if closed {
                return Err(walk.fail(
                    &path.field(key),
                    ViolationKind::UnknownField,
                    "Extra inputs are not permitted",
                ));
            }
            if def.extra == ExtraPolicy::Allow {
                output.insert(key.clone(), extra.clone());
            }
        }

        Ok(Value::Object(output))
    }

    fn is_declared(&self, def: &ModelDef, key: &str) -> bool {
        def.fields
            .iter()
            .any(|f| f.wire_name() == key || (self.populate_by_name && f.name == key))
    }

    fn check_field(
        &self,
        field: &FieldDef,
        value: &Value,
        path: &FieldPath,
        walk: &mut Walk,
    ) -> Checked<Value> {
        let checked = self.check_type(&field.ty, value, path, walk)?;
        self.check_constraints(&field.constraints, value, path, walk)?;
        Ok(checked)
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn check_type(
        &self,
        ty: &TypeDesc,
        value: &Value,
        path: &FieldPath,
        walk: &mut Walk,
    ) -> Checked<Value> {
        match ty {
            TypeDesc::String if value.is_string() => Ok(value.clone()),
            TypeDesc::Number if value.is_number() => Ok(value.clone()),
            TypeDesc::Integer if is_integer(value) => Ok(value.clone()),
            TypeDesc::Boolean if value.is_boolean() => Ok(value.clone()),
            TypeDesc::Any => Ok(value.clone()),
            TypeDesc::String | TypeDesc::Number | TypeDesc::Integer | TypeDesc::Boolean => {
                Err(walk.fail(
                    path,
                    ViolationKind::WrongType,
                    format!("Input should be {}, got {}", article(ty), json_kind(value)),
                ))
            }
            TypeDesc::Url => self.check_url(value, path, walk),
            TypeDesc::Literal(allowed) => match value.as_str() {
                Some(s) if allowed.iter().any(|a| *a == s) => Ok(value.clone()),
                _ => Err(walk.fail(
                    path,
                    ViolationKind::NotAllowed,
                    format!("Input should be {}, got {}", format_literals(allowed), value),
                )),
            },
            TypeDesc::Ref(name) => {
                let def = self.definition(name, path, walk)?;
                self.check_model(def, value, path, false, walk)
            }
            TypeDesc::List(inner) => {
                let Value::Array(items) = value else {
                    return Err(walk.fail(
                        path,
                        ViolationKind::WrongType,
                        format!("Input should be a valid list, got {}", json_kind(value)),
                    ));
                };
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.check_type(inner, item, &path.index(i), walk))
                    .collect::<Checked<Vec<_>>>()
                    .map(Value::Array)
            }
            TypeDesc::Map(inner) => {
                let Value::Object(entries) = value else {
                    return Err(walk.fail(
                        path,
                        ViolationKind::WrongType,
                        format!("Input should be a valid dictionary, got {}", json_kind(value)),
                    ));
                };
                let mut output = Map::new();
                for (key, entry) in entries {
                    let checked = self.check_type(inner, entry, &path.field(key), walk)?;
                    output.insert(key.clone(), checked);
                }
                Ok(Value::Object(output))
            }
            TypeDesc::Union(options) => self.check_union(ty, options, value, path, walk),
            TypeDesc::Tagged { discriminator, variants } => {
                self.check_tagged(discriminator, variants, value, path, walk)
            }
        }
    }

    fn check_url(&self, value: &Value, path: &FieldPath, walk: &mut Walk) -> Checked<Value> {
        let Some(url) = value.as_str() else {
            return Err(walk.fail(
                path,
                ViolationKind::WrongType,
                format!("URL input should be a string, got {}", json_kind(value)),
            ));
        };
        if url.len() as u64 > MAX_URL_LENGTH {
            return Err(walk.fail(
                path,
                ViolationKind::InvalidUrl,
                format!("URL should have at most {} characters", MAX_URL_LENGTH),
            ));
        }
        if !self.url.is_match(url) {
            return Err(walk.fail(
                path,
                ViolationKind::InvalidUrl,
                format!("Input should be a valid http(s) URL, got '{}'", url),
            ));
        }
        Ok(value.clone())
    }

    /// Exactly one option must accept the value
    fn check_union(
        &self,
        ty: &TypeDesc,
        options: &[TypeDesc],
        value: &Value,
        path: &FieldPath,
        walk: &mut Walk,
    ) -> Checked<Value> {
        let mut accepted = Vec::new();
        let mut failures = Vec::new();

        for option in options {
            let mut attempt = walk.fork();
            match self.check_type(option, value, path, &mut attempt) {
                Ok(checked) => accepted.push((option, checked, attempt.variants)),
                Err(err) => failures.push((option, err)),
            }
        }

        match accepted.len() {
            1 => {
                let (option, checked, variants) = accepted.remove(0);
                walk.variants.extend(variants);
                if let TypeDesc::Ref(name) = option {
                    walk.variants.push(ResolvedVariant {
                        path: path.clone(),
                        definition: *name,
                    });
                }
                Ok(checked)
            }
            0 => {
                // When only one option has the right JSON shape, its error is the useful one
                let shaped: Vec<_> = failures
                    .into_iter()
                    .filter(|(option, _)| shape_accepts(option, value))
                    .collect();
                if let [(_, err)] = shaped.as_slice() {
                    return Err(err.clone());
                }
                let detail = shaped
                    .iter()
                    .map(|(option, err)| format!("{}: {}", option.describe(), err.reason))
                    .collect::<Vec<_>>()
                    .join("; ");
                let mut reason = format!("Input should match one of {}", ty.describe());
                if !detail.is_empty() {
                    reason = format!("{} ({})", reason, detail);
                }
                Err(walk.fail(path, ViolationKind::NoMatchingVariant, reason))
            }
            _ => {
                let matched: Vec<_> = accepted
                    .iter()
                    .map(|(option, _, _)| option.describe())
                    .collect();
                Err(walk.fail(
                    path,
                    ViolationKind::AmbiguousVariant,
                    format!(
                        "Input matches more than one of {}: {}",
                        ty.describe(),
                        matched.join(", "),
                    ),
                ))
            }
        }
    }

    /// The discriminator value alone picks the variant
    fn check_tagged(
        &self,
        discriminator: &str,
        variants: &[&'static str],
        value: &Value,
        path: &FieldPath,
        walk: &mut Walk,
    ) -> Checked<Value> {
        let Value::Object(input) = value else {
            return Err(walk.fail(
                path,
                ViolationKind::WrongType,
                format!("Input should be a valid object, got {}", json_kind(value)),
            ));
        };

        let tag_path = path.field(discriminator);
        let tag = input.get(discriminator).or_else(|| {
            if !self.populate_by_name {
                return None;
            }
            variants
                .iter()
                .filter_map(|variant| self.catalog.get(variant))
                .filter_map(|def| def.wire_field(discriminator))
                .find_map(|field| input.get(field.name))
        });
        let Some(tag) = tag else {
            return Err(walk.fail(
                &tag_path,
                ViolationKind::Missing,
                format!("Unable to extract tag using discriminator '{}'", discriminator),
            ));
        };

        let mut tags = Vec::with_capacity(variants.len());
        for variant in variants {
            let def = self.definition(variant, path, walk)?;
            let literal = def
                .wire_field(discriminator)
                .and_then(FieldDef::literal_values)
                .and_then(|values| values.first().copied());
            let Some(literal) = literal else { continue };

            if tag.as_str() == Some(literal) {
                debug!(path = %path, variant = def.name, "Resolved tagged union");
                let checked = self.check_model(def, value, path, false, walk)?;
                walk.variants.push(ResolvedVariant {
                    path: path.clone(),
                    definition: def.name,
                });
                return Ok(checked);
            }
            tags.push(literal);
        }

        Err(walk.fail(
            &tag_path,
            ViolationKind::DiscriminatorMismatch,
            format!(
                "Input tag {} found using '{}' does not match any of the expected tags: {}",
                tag,
                discriminator,
                format_literals(&tags)
            ),
        ))
    }

    fn definition(&self, name: &str, path: &FieldPath, walk: &Walk) -> Checked<&'a ModelDef> {
        self.catalog.get(name).ok_or_else(|| {
            walk.fail(
                path,
                ViolationKind::NotAllowed,
                format!("'{}' is not declared in the catalog", name),
            )
        })
    }

    // =========================================================================
    // Constraints
    // =========================================================================

    fn check_constraints(
        &self,
        constraints: &Constraints,
        value: &Value,
        path: &FieldPath,
        walk: &Walk,
    ) -> Checked<()> {
        if constraints.is_empty() {
            return Ok(());
        }

        if let Some(n) = value.as_f64() {
            if let Some(ge) = constraints.ge {
                if n < ge {
                    return Err(walk.fail(
                        path,
                        ViolationKind::OutOfRange,
                        format!("Input should be greater than or equal to {}, got {}", ge, value),
                    ));
                }
            }
            if let Some(le) = constraints.le {
                if n > le {
                    return Err(walk.fail(
                        path,
                        ViolationKind::OutOfRange,
                        format!("Input should be less than or equal to {}, got {}", le, value),
                    ));
                }
            }
            if let Some(gt) = constraints.gt {
                if n <= gt {
                    return Err(walk.fail(
                        path,
                        ViolationKind::OutOfRange,
                        format!("Input should be greater than {}, got {}", gt, value),
                    ));
                }
            }
        }

        if let (Some(pattern), Some(s)) = (constraints.pattern, value.as_str()) {
            let matches = self.patterns.get(pattern).is_some_and(|re| re.is_match(s));
            if !matches {
                return Err(walk.fail(
                    path,
                    ViolationKind::PatternMismatch,
                    format!("String should match pattern '{}'", pattern),
                ));
            }
        }

        if let Some(items) = value.as_array() {
            if let Some(min) = constraints.min_items {
                if items.len() < min {
                    return Err(walk.fail(
                        path,
                        ViolationKind::TooShort,
                        format!("List should have at least {} item(s), got {}", min, items.len()),
                    ));
                }
            }
            if let Some(max) = constraints.max_items {
                if items.len() > max {
                    return Err(walk.fail(
                        path,
                        ViolationKind::TooLong,
                        format!("List should have at most {} item(s), got {}", max, items.len()),
                    ));
                }
            }
        }

        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Integral JSON numbers, including `3.0`, as JSON Schema counts them
fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
        }
        _ => false,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

fn article(ty: &TypeDesc) -> String {
    match ty {
        TypeDesc::String => "a valid string".to_string(),
        TypeDesc::Number => "a valid number".to_string(),
        TypeDesc::Integer => "a valid integer".to_string(),
        TypeDesc::Boolean => "a valid boolean".to_string(),
        other => other.describe(),
    }
}

/// Whether the JSON shape of `value` could possibly fit `ty`
fn shape_accepts(ty: &TypeDesc, value: &Value) -> bool {
    match ty {
        TypeDesc::String | TypeDesc::Url | TypeDesc::Literal(_) => value.is_string(),
        TypeDesc::Number | TypeDesc::Integer => value.is_number(),
        TypeDesc::Boolean => value.is_boolean(),
        TypeDesc::Any => true,
        TypeDesc::Ref(_) | TypeDesc::Map(_) | TypeDesc::Tagged { .. } => value.is_object(),
        TypeDesc::List(_) => value.is_array(),
        TypeDesc::Union(options) => options.iter().any(|o| shape_accepts(o, value)),
    }
}
