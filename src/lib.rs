//! RAP Specification Tooling
//!
//! Typed model, JSON Schema projector and instance validator for the
//! Research API Protocol (RAP), a JSON-LD vocabulary for processed research
//! data products, participants, collections, aggregate statistics and API
//! discovery.
//!
//! ## Features
//!
//! - **Single Model**: every entity is declared once as an introspectable definition
//! - **Schema Projection**: JSON Schema 2020-12 documents with fixed `$id`s
//! - **Instance Validation**: fail-fast checks with dot/bracket error paths
//! - **Drift Detection**: SHA-256 fingerprints and diffs against published files
//! - **Schema Conformance**: the same instances checked by a JSON Schema engine
//!
//! ## Layout
//!
//! ```text
//! schemas/v1/
//! ├── measurements/
//! │   ├── base-measurement.json
//! │   ├── relaxometry-mri.json
//! │   └── timeseries.json
//! ├── data-types/
//! │   └── vector-data.json
//! ├── research-product.json
//! ├── participant.json
//! ├── collection.json
//! ├── aggregate.json
//! └── api-descriptor.json
//! ```

pub mod checksum;
pub mod config;
pub mod conformance;
pub mod drift;
pub mod error;
pub mod model;
pub mod projector;
pub mod schema;
pub mod validator;

pub use checksum::Checksum;
pub use config::{OutputFormat, PolicyConfig, RapConfig};
pub use conformance::{ConformanceViolation, SchemaConformance};
pub use drift::{DriftReport, DriftStatus};
pub use error::{DefinitionError, FieldPath, RapError, Result, ValidationError, ViolationKind};
pub use model::{ModelCatalog, ModelDef, TypeDesc};
pub use projector::SchemaProjector;
pub use schema::{GeneratedSchema, SchemaGroup, SchemaKind};
pub use validator::{InstanceValidator, ValidatedEntity};
