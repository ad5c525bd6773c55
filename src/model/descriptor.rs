//! Field and Definition Descriptors
//!
//! The vocabulary every RAP definition is written in. A [`ModelDef`] is a
//! static, introspectable record: for each field it exposes the internal
//! name, the wire alias, whether it is required, its default, its type
//! descriptor and its constraints. The projector and the validator both
//! read these; neither keeps its own copy of the model.

use serde_json::Value;

// =============================================================================
// Type Descriptors
// =============================================================================

/// Semantic type of a field
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDesc {
    String,
    Number,
    Integer,
    Boolean,
    /// Any JSON value
    Any,
    /// Absolute http(s) URL carried as a string
    Url,
    /// One of a closed set of string literals (a single value is a const)
    Literal(&'static [&'static str]),
    /// Reference to another definition in the catalog
    Ref(&'static str),
    List(Box<TypeDesc>),
    /// Object with string keys and values of the inner type
    Map(Box<TypeDesc>),
    /// Exactly one of several shapes, chosen by shape
    Union(Vec<TypeDesc>),
    /// Exactly one of several definitions, chosen by a discriminator field
    Tagged {
        discriminator: &'static str,
        variants: Vec<&'static str>,
    },
}

impl TypeDesc {
    pub fn list(inner: TypeDesc) -> Self {
        TypeDesc::List(Box::new(inner))
    }

    pub fn map(inner: TypeDesc) -> Self {
        TypeDesc::Map(Box::new(inner))
    }

    /// `Dict[str, Any]`
    pub fn object() -> Self {
        TypeDesc::Map(Box::new(TypeDesc::Any))
    }

    /// Every definition name this descriptor refers to, depth-first
    pub fn references(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references(&self, out: &mut Vec<&'static str>) {
        match self {
            TypeDesc::Ref(name) => out.push(name),
            TypeDesc::List(inner) | TypeDesc::Map(inner) => inner.collect_references(out),
            TypeDesc::Union(options) => {
                for option in options {
                    option.collect_references(out);
                }
            }
            TypeDesc::Tagged { variants, .. } => out.extend(variants.iter().copied()),
            _ => {}
        }
    }

    /// Short name used in error messages
    pub fn describe(&self) -> String {
        match self {
            TypeDesc::String => "string".to_string(),
            TypeDesc::Number => "number".to_string(),
            TypeDesc::Integer => "integer".to_string(),
            TypeDesc::Boolean => "boolean".to_string(),
            TypeDesc::Any => "any".to_string(),
            TypeDesc::Url => "URL".to_string(),
            TypeDesc::Literal(values) => format_literals(values),
            TypeDesc::Ref(name) => name.to_string(),
            TypeDesc::List(inner) => format!("list of {}", inner.describe()),
            TypeDesc::Map(inner) => format!("map of {}", inner.describe()),
            TypeDesc::Union(options) => options
                .iter()
                .map(TypeDesc::describe)
                .collect::<Vec<_>>()
                .join(" | "),
            TypeDesc::Tagged { variants, .. } => variants.join(" | "),
        }
    }
}

/// `'a', 'b' or 'c'`
pub fn format_literals(values: &[&str]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("'{}'", v)).collect();
    match quoted.len() {
        0 => String::new(),
        1 => quoted[0].clone(),
        n => format!("{} or {}", quoted[..n - 1].join(", "), quoted[n - 1]),
    }
}

// =============================================================================
// Constraints
// =============================================================================

/// Value constraints attached to a field. Bounds are inclusive unless noted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub ge: Option<f64>,
    pub le: Option<f64>,
    /// Exclusive lower bound
    pub gt: Option<f64>,
    /// Regex the whole string must match
    pub pattern: Option<&'static str>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        *self == Constraints::default()
    }
}

// =============================================================================
// Fields
// =============================================================================

/// One field of a definition
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Internal snake_case name
    pub name: &'static str,
    /// Wire name, when it differs from the internal name
    pub alias: Option<&'static str>,
    pub ty: TypeDesc,
    pub required: bool,
    /// Accepts an explicit JSON `null`
    pub nullable: bool,
    pub default: Option<Value>,
    pub constraints: Constraints,
    pub description: Option<&'static str>,
    pub examples: Vec<Value>,
}

impl FieldDef {
    /// A field that must be present and non-null
    pub fn required(name: &'static str, ty: TypeDesc) -> Self {
        Self {
            name,
            alias: None,
            ty,
            required: true,
            nullable: false,
            default: None,
            constraints: Constraints::default(),
            description: None,
            examples: Vec::new(),
        }
    }

    /// An optional field: may be absent or `null`, defaults to `null`
    pub fn optional(name: &'static str, ty: TypeDesc) -> Self {
        Self {
            required: false,
            nullable: true,
            default: Some(Value::Null),
            ..Self::required(name, ty)
        }
    }

    /// A non-null field that falls back to a default when absent
    pub fn defaulted(name: &'static str, ty: TypeDesc, default: Value) -> Self {
        Self {
            required: false,
            default: Some(default),
            ..Self::required(name, ty)
        }
    }

    /// The `@type` tag every RAP record carries, fixed to one literal
    pub fn type_tag(tag: &'static [&'static str]) -> Self {
        let default = tag.first().map(|t| Value::String(t.to_string()));
        Self {
            required: false,
            default,
            ..Self::required("type_", TypeDesc::Literal(tag))
        }
        .alias("@type")
    }

    pub fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn examples(mut self, examples: Vec<Value>) -> Self {
        self.examples = examples;
        self
    }

    /// Make an optional field keep a non-null default
    pub fn default_value(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn ge(mut self, bound: f64) -> Self {
        self.constraints.ge = Some(bound);
        self
    }

    pub fn le(mut self, bound: f64) -> Self {
        self.constraints.le = Some(bound);
        self
    }

    pub fn gt(mut self, bound: f64) -> Self {
        self.constraints.gt = Some(bound);
        self
    }

    pub fn pattern(mut self, pattern: &'static str) -> Self {
        self.constraints.pattern = Some(pattern);
        self
    }

    pub fn min_items(mut self, n: usize) -> Self {
        self.constraints.min_items = Some(n);
        self
    }

    pub fn max_items(mut self, n: usize) -> Self {
        self.constraints.max_items = Some(n);
        self
    }

    /// Name used on the wire (serialization and validation)
    pub fn wire_name(&self) -> &'static str {
        self.alias.unwrap_or(self.name)
    }

    /// Human-readable title, derived from the wire name as pydantic-style
    /// generators do (`specificMeasure` -> `Specificmeasure`)
    pub fn title(&self) -> String {
        let cleaned: String = self
            .wire_name()
            .trim_start_matches('@')
            .split('_')
            .filter(|part| !part.is_empty())
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ");
        if cleaned.is_empty() {
            capitalize(self.name.trim_end_matches('_'))
        } else {
            cleaned
        }
    }

    /// The literal values this field is fixed to, if it is a literal field
    pub fn literal_values(&self) -> Option<&'static [&'static str]> {
        match self.ty {
            TypeDesc::Literal(values) => Some(values),
            _ => None,
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

// =============================================================================
// Definitions
// =============================================================================

/// How a definition treats fields it does not declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraPolicy {
    /// Unknown fields are accepted and dropped
    #[default]
    Ignore,
    /// Unknown fields are accepted and kept
    Allow,
    /// Unknown fields are rejected
    Forbid,
}

/// A record definition: an entity or a nested value type
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDef {
    /// Catalog-unique name, also the schema title
    pub name: &'static str,
    pub description: &'static str,
    pub fields: Vec<FieldDef>,
    pub extra: ExtraPolicy,
}

impl ModelDef {
    pub fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            fields: Vec::new(),
            extra: ExtraPolicy::Ignore,
        }
    }

    /// Start a new definition from an existing one's field set.
    ///
    /// Fields keep the base order; [`ModelDef::field`] replaces a field in
    /// place when the name already exists.
    pub fn extend(base: &ModelDef, name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            fields: base.fields.clone(),
            extra: base.extra,
        }
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    pub fn extra(mut self, extra: ExtraPolicy) -> Self {
        self.extra = extra;
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look a field up by its wire name
    pub fn wire_field(&self, wire_name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.wire_name() == wire_name)
    }

    /// The literal `@type` this definition is tagged with, if any
    pub fn type_tag(&self) -> Option<&'static str> {
        self.wire_field("@type")
            .and_then(|f| f.literal_values())
            .and_then(|values| values.first().copied())
    }
}
