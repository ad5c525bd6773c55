//! Error types for the RAP model, projector and validator

use std::fmt;

use thiserror::Error;

/// Result type for RAP operations
pub type Result<T> = std::result::Result<T, RapError>;

/// Top-level error for library operations.
///
/// Every variant describes exactly one failure. Drivers catch these per
/// schema or per instance file and keep going.
#[derive(Error, Debug)]
pub enum RapError {
    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),

    #[error("Schema generation failed for {definition}: {reason}")]
    SchemaGeneration { definition: String, reason: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("Unknown schema kind: {0}")]
    UnknownKind(String),
}

impl RapError {
    /// Wrap an IO error with the path it happened at
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub fn schema_generation(definition: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaGeneration {
            definition: definition.into(),
            reason: reason.into(),
        }
    }
}

/// The model definitions themselves are inconsistent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("{definition}.{field} references undeclared definition '{target}'")]
    UndeclaredReference {
        definition: String,
        field: String,
        target: String,
    },

    #[error("{definition}: wire name '{wire_name}' is used by both '{first}' and '{second}'")]
    ConflictingAlias {
        definition: String,
        wire_name: String,
        first: String,
        second: String,
    },

    #[error("definition '{0}' is declared twice")]
    DuplicateDefinition(String),

    #[error("{definition}.{field}: tagged union variant '{variant}' has no literal '{discriminator}' field")]
    MissingDiscriminator {
        definition: String,
        field: String,
        variant: String,
        discriminator: String,
    },
}

// =============================================================================
// Validation errors
// =============================================================================

/// One step in a path from the document root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// Location of a value inside an instance document.
///
/// Rendered in dot/bracket notation, e.g. `member[0].participant.identifier`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn field(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Field(name.to_string()));
        Self(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The last field name on the path, if any
    pub fn leaf(&self) -> Option<&str> {
        self.0.iter().rev().find_map(|s| match s {
            PathSegment::Field(name) => Some(name.as_str()),
            PathSegment::Index(_) => None,
        })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, "(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Field(name) => write!(f, ".{}", name)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Machine-matchable category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// A required field is absent
    Missing,
    /// The JSON type does not match the declared type
    WrongType,
    /// A numeric bound was violated
    OutOfRange,
    /// A string did not match its declared pattern
    PatternMismatch,
    /// A value is outside a closed literal set
    NotAllowed,
    /// A list is shorter than its declared minimum
    TooShort,
    /// A list is longer than its declared maximum
    TooLong,
    /// An unrecognised field on a closed object
    UnknownField,
    /// A string is not an absolute http(s) URL
    InvalidUrl,
    /// The union discriminator is absent or matches no variant
    DiscriminatorMismatch,
    /// No untagged union variant accepted the value
    NoMatchingVariant,
    /// More than one untagged union variant accepted the value
    AmbiguousVariant,
}

/// An instance document does not conform to its definition
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{target}: {path}: {reason}")]
pub struct ValidationError {
    /// Name of the definition the document was validated against
    pub target: String,
    /// Where the first failure was found
    pub path: FieldPath,
    pub kind: ViolationKind,
    /// Human-readable reason
    pub reason: String,
}

impl ValidationError {
    pub fn new(
        target: &str,
        path: FieldPath,
        kind: ViolationKind,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            target: target.to_string(),
            path,
            kind,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_path_display() {
        let path = FieldPath::root()
            .field("member")
            .index(0)
            .field("participant")
            .field("identifier");
        assert_eq!(path.to_string(), "member[0].participant.identifier");
        assert_eq!(path.leaf(), Some("identifier"));
    }

    #[test]
    fn test_root_path_display() {
        assert_eq!(FieldPath::root().to_string(), "(root)");
        assert!(FieldPath::root().leaf().is_none());
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new(
            "ResearchProduct",
            FieldPath::root().field("participant"),
            ViolationKind::Missing,
            "field required",
        );
        assert_eq!(err.to_string(), "ResearchProduct: participant: field required");
    }
}
