//! Research product: a single analysis-ready data artifact

use super::common::{
    context_field, COMPUTE_ENVIRONMENT, CREATIVE_WORK, DATA_DOWNLOAD, PROCESSING_PROVENANCE,
    PROPERTY_VALUE, SCHOLARLY_ARTICLE,
};
use super::descriptor::{FieldDef, ModelDef, TypeDesc};
use super::measurements::measurement_union;
use super::vector_data::VECTOR_DATA;

pub const RESEARCH_PRODUCT: &str = "ResearchProduct";
pub const PARTICIPANT_REFERENCE: &str = "ParticipantReference";
pub const REFERENCE_DEMOGRAPHICS: &str = "ReferenceDemographics";

pub const PRODUCT_TYPES: &[&str] = &[
    "processed_timeseries",
    "processed_scalar",
    "processed_image",
    "processed_spatial",
    "processed_categorical",
    "processed_vector",
];

pub const PROCESSING_LEVELS: &[&str] = &["raw", "preprocessed", "analysis_ready", "aggregated"];

pub const SEX_VALUES: &[&str] = &["M", "F", "other", "unknown"];

pub fn definitions() -> Vec<ModelDef> {
    vec![
        ModelDef::new(
            RESEARCH_PRODUCT,
            "A processed, analysis-ready research data product.\n\nMain entity representing a research data product with measurement metadata,\nactual data, provenance chain, and distribution information.",
        )
        .field(context_field())
        .field(FieldDef::type_tag(&["ResearchProduct"]))
        .field(
            FieldDef::required("id_", TypeDesc::Url)
                .alias("@id")
                .describe("Unique URI identifying this research product"),
        )
        .field(
            FieldDef::optional("identifier", TypeDesc::Ref(PROPERTY_VALUE))
                .describe("DOI or other persistent identifier"),
        )
        .field(
            FieldDef::required("product_type", TypeDesc::Literal(PRODUCT_TYPES))
                .alias("productType")
                .describe("Type of data product"),
        )
        .field(
            FieldDef::required("processing_level", TypeDesc::Literal(PROCESSING_LEVELS))
                .alias("processingLevel")
                .describe("Level of processing applied"),
        )
        .field(
            FieldDef::optional("data", TypeDesc::Ref(VECTOR_DATA))
                .describe("The actual data for this research product"),
        )
        .field(
            FieldDef::required("participant", TypeDesc::Ref(PARTICIPANT_REFERENCE))
                .describe("Reference to the research participant"),
        )
        .field(
            FieldDef::required("measurement", measurement_union())
                .describe("Measurement details"),
        )
        .field(
            FieldDef::optional("provenance", TypeDesc::Ref(PROCESSING_PROVENANCE))
                .describe("Provenance tracking for data processing"),
        )
        .field(
            FieldDef::optional("compute_environment", TypeDesc::Ref(COMPUTE_ENVIRONMENT))
                .alias("computeEnvironment")
                .describe("Computational environment information"),
        )
        .field(
            FieldDef::optional("license", TypeDesc::Ref(CREATIVE_WORK))
                .describe("License for this data product"),
        )
        .field(
            FieldDef::optional("distribution", TypeDesc::Ref(DATA_DOWNLOAD))
                .describe("Distribution/download information"),
        )
        .field(
            FieldDef::optional("citation", TypeDesc::Ref(SCHOLARLY_ARTICLE))
                .describe("Citation to related publication"),
        )
        .field(
            FieldDef::optional("quality_metrics", TypeDesc::object())
                .alias("qualityMetrics")
                .describe("Quality assessment metrics"),
        ),
        ModelDef::new(PARTICIPANT_REFERENCE, "Reference to a research participant.")
            .field(FieldDef::type_tag(&["Participant"]))
            .field(
                FieldDef::required("id_", TypeDesc::Url)
                    .alias("@id")
                    .describe("Participant URI"),
            )
            .field(FieldDef::required("identifier", TypeDesc::String).describe("Participant ID"))
            .field(
                FieldDef::optional("demographic_data", TypeDesc::Ref(REFERENCE_DEMOGRAPHICS))
                    .alias("demographicData")
                    .describe("Demographic information"),
            ),
        ModelDef::new(
            REFERENCE_DEMOGRAPHICS,
            "Demographic information for a participant (embedded reference).",
        )
        .field(FieldDef::optional("age", TypeDesc::object()).describe("Age information"))
        .field(FieldDef::optional("sex", TypeDesc::Literal(SEX_VALUES)).describe("Biological sex"))
        .field(
            FieldDef::optional("group", TypeDesc::String)
                .describe("Experimental group assignment"),
        ),
    ]
}
