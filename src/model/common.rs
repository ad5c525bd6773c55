//! Common value types shared across RAP records
//!
//! Units, provenance, software, licensing and distribution descriptors.

use super::descriptor::{FieldDef, ModelDef, TypeDesc};

pub const UNIT: &str = "Unit";
pub const QUANTITY_VALUE: &str = "QuantityValue";
pub const SOFTWARE_APPLICATION: &str = "SoftwareApplication";
pub const PROCESSING_STEP: &str = "ProcessingStep";
pub const PROCESSING_PROVENANCE: &str = "ProcessingProvenance";
pub const COMPUTE_ENVIRONMENT: &str = "ComputeEnvironment";
pub const CREATIVE_WORK: &str = "CreativeWork";
pub const DATA_DOWNLOAD: &str = "DataDownload";
pub const PROPERTY_VALUE: &str = "PropertyValue";
pub const SCHOLARLY_ARTICLE: &str = "ScholarlyArticle";

/// The fixed JSON-LD context every top-level RAP document may point at
pub const RAP_CONTEXT: &str = "https://rap-spec.evidencepub.io/v1/context";

/// `@context`: the fixed context URI or an inline context map
pub fn context_field() -> FieldDef {
    FieldDef::required(
        "context",
        TypeDesc::Union(vec![TypeDesc::Literal(&[RAP_CONTEXT]), TypeDesc::object()]),
    )
    .alias("@context")
}

/// `Union[Unit, HttpUrl]`
pub fn unit_or_url() -> TypeDesc {
    TypeDesc::Union(vec![TypeDesc::Ref(UNIT), TypeDesc::Url])
}

pub fn definitions() -> Vec<ModelDef> {
    vec![
        ModelDef::new(UNIT, "Unit of measurement (QUDT-compatible structure).")
            .field(FieldDef::type_tag(&["Unit"]))
            .field(
                FieldDef::required("symbol", TypeDesc::String)
                    .describe("Unit symbol (e.g., ms, Hz)"),
            )
            .field(
                FieldDef::optional("label", TypeDesc::String)
                    .describe("Human-readable unit label"),
            )
            .field(FieldDef::optional("uri", TypeDesc::Url).describe("QUDT unit URI")),
        ModelDef::new(QUANTITY_VALUE, "A quantity with a value and unit.")
            .field(FieldDef::type_tag(&["QuantityValue"]))
            .field(FieldDef::required("value", TypeDesc::Number).ge(0.0).describe("Numeric value"))
            .field(FieldDef::required("unit", TypeDesc::String).describe("Unit of measurement")),
        ModelDef::new(SOFTWARE_APPLICATION, "Software application metadata.")
            .field(FieldDef::type_tag(&["SoftwareApplication"]))
            .field(FieldDef::required("name", TypeDesc::String).describe("Software name"))
            .field(FieldDef::optional("version", TypeDesc::String).describe("Software version"))
            .field(FieldDef::optional("url", TypeDesc::Url).describe("Software URL")),
        ModelDef::new(PROCESSING_STEP, "A single step in the data processing pipeline.")
            .field(FieldDef::type_tag(&["ProcessingStep"]))
            .field(
                FieldDef::required("step_order", TypeDesc::Integer)
                    .alias("stepOrder")
                    .ge(1.0)
                    .describe("Step order in pipeline"),
            )
            .field(FieldDef::required("name", TypeDesc::String).describe("Step name"))
            .field(
                FieldDef::optional("software_agent", TypeDesc::Ref(SOFTWARE_APPLICATION))
                    .alias("softwareAgent")
                    .describe("Software used for this step"),
            )
            .field(
                FieldDef::optional("parameters", TypeDesc::object())
                    .describe("Processing parameters"),
            ),
        ModelDef::new(PROCESSING_PROVENANCE, "Provenance tracking for data processing pipeline.")
            .field(FieldDef::type_tag(&["ProcessingProvenance"]))
            .field(
                FieldDef::required("was_derived_from", TypeDesc::object())
                    .alias("wasDerivedFrom")
                    .describe("Source data this was derived from"),
            )
            .field(
                FieldDef::required(
                    "processing_steps",
                    TypeDesc::list(TypeDesc::Ref(PROCESSING_STEP)),
                )
                    .alias("processingSteps")
                    .describe("Processing pipeline steps"),
            ),
        ModelDef::new(COMPUTE_ENVIRONMENT, "Computational environment information.")
            .field(FieldDef::type_tag(&["ComputeEnvironment"]))
            .field(
                FieldDef::optional("container_image", TypeDesc::object())
                    .alias("containerImage")
                    .describe("Container image information"),
            ),
        ModelDef::new(CREATIVE_WORK, "Creative work (for licenses).")
            .field(FieldDef::type_tag(&["CreativeWork"]))
            .field(FieldDef::required("id_", TypeDesc::Url).alias("@id").describe("License URI"))
            .field(FieldDef::optional("name", TypeDesc::String).describe("License name")),
        ModelDef::new(DATA_DOWNLOAD, "Distribution/download information.")
            .field(FieldDef::type_tag(&["DataDownload"]))
            .field(
                FieldDef::required("content_url", TypeDesc::Url)
                    .alias("contentUrl")
                    .describe("Download URL"),
            )
            .field(
                FieldDef::optional("encoding_format", TypeDesc::String)
                    .alias("encodingFormat")
                    .describe("File format (MIME type)"),
            )
            .field(
                FieldDef::optional("content_size", TypeDesc::String)
                    .alias("contentSize")
                    .describe("File size"),
            ),
        ModelDef::new(PROPERTY_VALUE, "Property value (used for identifiers like DOI).")
            .field(FieldDef::type_tag(&["PropertyValue"]))
            .field(
                FieldDef::required("property_id", TypeDesc::String)
                    .alias("propertyID")
                    .describe("Property identifier"),
            )
            .field(FieldDef::required("value", TypeDesc::String).describe("Property value")),
        ModelDef::new(SCHOLARLY_ARTICLE, "Scholarly article citation.")
            .field(FieldDef::type_tag(&["ScholarlyArticle"]))
            .field(
                FieldDef::optional("identifier", TypeDesc::object())
                    .describe("Article identifier (e.g., DOI)"),
            )
            .field(FieldDef::optional("name", TypeDesc::String).describe("Article title")),
    ]
}
