//! Published schema table
//!
//! The fixed set of schema documents RAP publishes: for each kind, its
//! canonical `$id`, its path under the output directory and the catalog
//! definition it is projected from. The table is a plain enum, so the set
//! of `$id`s cannot change at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::checksum::Checksum;
use crate::error::RapError;
use crate::model::{
    aggregate, api_descriptor, collection, measurements, participant, research_product, vector_data,
};

/// JSON Schema dialect every published document declares
pub const JSON_SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Namespace all `$id`s live under
pub const SCHEMA_BASE_URI: &str = "https://rap-spec.evidencepub.io/v1/schemas/";

/// How generated schemas are grouped in operator output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaGroup {
    Measurement,
    DataType,
    Entity,
}

impl SchemaGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            SchemaGroup::Measurement => "Measurement schemas",
            SchemaGroup::DataType => "Data type schemas",
            SchemaGroup::Entity => "Entity schemas",
        }
    }
}

/// A published schema document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaKind {
    BaseMeasurement,
    RelaxometryMri,
    Timeseries,
    VectorData,
    ResearchProduct,
    Participant,
    Collection,
    Aggregate,
    ApiDescriptor,
}

impl SchemaKind {
    /// Every published kind, in generation order
    pub const ALL: [SchemaKind; 9] = [
        SchemaKind::BaseMeasurement,
        SchemaKind::RelaxometryMri,
        SchemaKind::Timeseries,
        SchemaKind::VectorData,
        SchemaKind::ResearchProduct,
        SchemaKind::Participant,
        SchemaKind::Collection,
        SchemaKind::Aggregate,
        SchemaKind::ApiDescriptor,
    ];

    pub fn all() -> &'static [SchemaKind] {
        &Self::ALL
    }

    /// Kebab-case name used on the command line and in configuration
    pub fn name(&self) -> &'static str {
        match self {
            SchemaKind::BaseMeasurement => "base-measurement",
            SchemaKind::RelaxometryMri => "relaxometry-mri",
            SchemaKind::Timeseries => "timeseries",
            SchemaKind::VectorData => "vector-data",
            SchemaKind::ResearchProduct => "research-product",
            SchemaKind::Participant => "participant",
            SchemaKind::Collection => "collection",
            SchemaKind::Aggregate => "aggregate",
            SchemaKind::ApiDescriptor => "api-descriptor",
        }
    }

    /// Path of the schema file relative to the output directory
    pub fn relative_path(&self) -> &'static str {
        match self {
            SchemaKind::BaseMeasurement => "measurements/base-measurement.json",
            SchemaKind::RelaxometryMri => "measurements/relaxometry-mri.json",
            SchemaKind::Timeseries => "measurements/timeseries.json",
            SchemaKind::VectorData => "data-types/vector-data.json",
            SchemaKind::ResearchProduct => "research-product.json",
            SchemaKind::Participant => "participant.json",
            SchemaKind::Collection => "collection.json",
            SchemaKind::Aggregate => "aggregate.json",
            SchemaKind::ApiDescriptor => "api-descriptor.json",
        }
    }

    /// Canonical `$id`
    pub fn id(&self) -> String {
        format!("{}{}", SCHEMA_BASE_URI, self.relative_path())
    }

    /// Catalog definition the schema is projected from
    pub fn root_definition(&self) -> &'static str {
        match self {
            SchemaKind::BaseMeasurement => measurements::BASE_MEASUREMENT,
            SchemaKind::RelaxometryMri => measurements::RELAXOMETRY_MRI,
            SchemaKind::Timeseries => measurements::TIMESERIES,
            SchemaKind::VectorData => vector_data::VECTOR_DATA,
            SchemaKind::ResearchProduct => research_product::RESEARCH_PRODUCT,
            SchemaKind::Participant => participant::PARTICIPANT,
            SchemaKind::Collection => collection::COLLECTION,
            SchemaKind::Aggregate => aggregate::AGGREGATE,
            SchemaKind::ApiDescriptor => api_descriptor::API_DESCRIPTOR,
        }
    }

    pub fn group(&self) -> SchemaGroup {
        match self {
            SchemaKind::BaseMeasurement | SchemaKind::RelaxometryMri | SchemaKind::Timeseries => {
                SchemaGroup::Measurement
            }
            SchemaKind::VectorData => SchemaGroup::DataType,
            _ => SchemaGroup::Entity,
        }
    }

    /// Top-level JSON-LD entities (carry `@context`)
    pub fn is_entity(&self) -> bool {
        self.group() == SchemaGroup::Entity
    }

    /// Look a kind up by its root definition name
    pub fn for_definition(name: &str) -> Option<SchemaKind> {
        Self::ALL.iter().copied().find(|k| k.root_definition() == name)
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchemaKind {
    type Err = RapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| RapError::UnknownKind(s.to_string()))
    }
}

/// A projected schema, rendered and fingerprinted
#[derive(Debug, Clone)]
pub struct GeneratedSchema {
    pub kind: SchemaKind,
    pub content: Value,
    /// Exact text written to disk
    pub text: String,
    pub checksum: Checksum,
}

impl GeneratedSchema {
    pub fn new(kind: SchemaKind, content: Value, text: String) -> Self {
        let checksum = Checksum::of_text(&text);
        Self { kind, content, text, checksum }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique_and_namespaced() {
        let ids: HashSet<String> = SchemaKind::ALL.iter().map(|k| k.id()).collect();
        assert_eq!(ids.len(), SchemaKind::ALL.len());
        assert!(ids.iter().all(|id| id.starts_with(SCHEMA_BASE_URI)));
        assert_eq!(
            SchemaKind::ResearchProduct.id(),
            "https://rap-spec.evidencepub.io/v1/schemas/research-product.json"
        );
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("research-product".parse::<SchemaKind>().unwrap(), SchemaKind::ResearchProduct);
        assert_eq!("vector_data".parse::<SchemaKind>().unwrap(), SchemaKind::VectorData);
        assert!(matches!("sample".parse::<SchemaKind>(), Err(RapError::UnknownKind(_))));
    }

    #[test]
    fn test_groups() {
        assert_eq!(SchemaKind::Timeseries.group(), SchemaGroup::Measurement);
        assert_eq!(SchemaKind::VectorData.group(), SchemaGroup::DataType);
        assert!(SchemaKind::Participant.is_entity());
        assert!(!SchemaKind::BaseMeasurement.is_entity());
    }

    #[test]
    fn test_for_definition() {
        assert_eq!(
            SchemaKind::for_definition("ResearchProductCollection"),
            Some(SchemaKind::Collection),
        );
        assert_eq!(SchemaKind::for_definition("Unit"), None);
    }
}
