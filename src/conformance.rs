//! Schema conformance engine
//!
//! Validates instances against the projected JSON Schema documents with the
//! `jsonschema` crate rather than by walking the catalog. The two engines
//! read the same catalog and policy, so on well-formed input they agree.

use std::collections::HashMap;
use std::fmt;

use jsonschema::Validator;
use serde_json::Value;
use tracing::debug;

use crate::error::{RapError, Result};
use crate::projector::SchemaProjector;
use crate::schema::SchemaKind;

/// One failure reported by the JSON Schema engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformanceViolation {
    /// JSON pointer into the instance (`""` for the root)
    pub instance_path: String,
    pub message: String,
}

impl fmt::Display for ConformanceViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.instance_path.is_empty() { "(root)" } else { &self.instance_path };
        write!(f, "{}: {}", path, self.message)
    }
}

/// Compiled validators for every published schema
pub struct SchemaConformance {
    validators: HashMap<SchemaKind, Validator>,
}

impl SchemaConformance {
    /// Project and compile every published kind
    pub fn new(projector: &SchemaProjector<'_>) -> Result<Self> {
        let mut validators = HashMap::new();
        for kind in SchemaKind::all() {
            let schema = projector.project(*kind)?;
            validators.insert(*kind, compile(*kind, &schema)?);
        }
        Ok(Self { validators })
    }

    /// Every violation of `kind`'s schema, in engine order
    pub fn violations(
        &self,
        document: &Value,
        kind: SchemaKind,
    ) -> Result<Vec<ConformanceViolation>> {
        let validator = self
            .validators
            .get(&kind)
            .ok_or_else(|| RapError::UnknownKind(kind.to_string()))?;

        let violations: Vec<ConformanceViolation> = validator
            .iter_errors(document)
            .map(|err| ConformanceViolation {
                instance_path: err.instance_path.to_string(),
                message: err.to_string(),
            })
            .collect();
        debug!(kind = %kind, violations = violations.len(), "Checked schema conformance");
        Ok(violations)
    }

    pub fn is_valid(&self, document: &Value, kind: SchemaKind) -> Result<bool> {
        Ok(self.violations(document, kind)?.is_empty())
    }
}

/// Compile one schema document for draft 2020-12, with format assertions on
pub fn compile(kind: SchemaKind, schema: &Value) -> Result<Validator> {
    jsonschema::options()
        .with_draft(jsonschema::Draft::Draft202012)
        .should_validate_formats(true)
        .build(schema)
        .map_err(|e| {
            RapError::schema_generation(
                kind.root_definition(),
                format!("schema does not compile: {}", e),
            )
        })
}
