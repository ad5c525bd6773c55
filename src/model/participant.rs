//! Participant: a study subject with demographics, clinical data and consent

use serde_json::json;

use super::common::context_field;
use super::descriptor::{FieldDef, ModelDef, TypeDesc};
use super::research_product::SEX_VALUES;

pub const PARTICIPANT: &str = "Participant";
pub const AGE: &str = "Age";
pub const DEMOGRAPHIC_DATA: &str = "DemographicData";
pub const MEDICATION: &str = "Medication";
pub const ASSESSMENT: &str = "Assessment";
pub const CLINICAL_DATA: &str = "ClinicalData";
pub const PRODUCTS_AVAILABLE: &str = "ProductsAvailable";
pub const SESSION_DURATION: &str = "SessionDuration";
pub const ENVIRONMENT: &str = "Environment";
pub const SESSION_METADATA: &str = "SessionMetadata";
pub const PARTICIPANT_LINKS: &str = "ParticipantLinks";
pub const CONSENT: &str = "Consent";

pub const IDENTIFIER_PATTERN: &str = r"^[A-Za-z0-9_-]+$";
pub const STATUS_VALUES: &[&str] = &["active", "completed", "withdrawn", "excluded"];
pub const PRIVACY_LEVELS: &[&str] = &["anonymous", "pseudonymous", "identifiable"];

fn participant() -> ModelDef {
    ModelDef::new(
        PARTICIPANT,
        "A research participant with associated demographic data and available products.\n\nContains demographic information, clinical data, consent information,\nand summaries of available data products.",
    )
    .field(context_field())
    .field(FieldDef::type_tag(&["Participant"]))
    .field(
        FieldDef::required("id_", TypeDesc::Url)
            .alias("@id")
            .describe("Unique URI for this participant"),
    )
    .field(
        FieldDef::required("identifier", TypeDesc::String)
            .pattern(IDENTIFIER_PATTERN)
            .describe("Participant ID (e.g., sub-01, P001)"),
    )
    .field(
        FieldDef::optional("demographic_data", TypeDesc::Ref(DEMOGRAPHIC_DATA))
            .alias("demographicData")
            .describe("Demographic and experimental group information"),
    )
    .field(
        FieldDef::optional("enrollment_date", TypeDesc::String)
            .alias("enrollmentDate")
            .describe("Date participant was enrolled in study"),
    )
    .field(
        FieldDef::optional("status", TypeDesc::Literal(STATUS_VALUES))
            .describe("Current participation status"),
    )
    .field(
        FieldDef::optional("exclusion_reason", TypeDesc::String)
            .alias("exclusionReason")
            .describe("Reason for exclusion if status is 'excluded'"),
    )
    .field(
        FieldDef::optional("clinical_data", TypeDesc::Ref(CLINICAL_DATA))
            .alias("clinicalData")
            .describe("Clinical or health-related information"),
    )
    .field(
        FieldDef::optional("products_available", TypeDesc::Ref(PRODUCTS_AVAILABLE))
            .alias("productsAvailable")
            .describe("Summary of available data products for this participant"),
    )
    .field(
        FieldDef::optional("session_metadata", TypeDesc::list(TypeDesc::Ref(SESSION_METADATA)))
            .alias("sessionMetadata")
            .describe("Metadata about each experimental session"),
    )
    .field(
        FieldDef::optional("links", TypeDesc::Ref(PARTICIPANT_LINKS))
            .describe("Links to related resources"),
    )
    .field(
        FieldDef::optional("consent", TypeDesc::Ref(CONSENT))
            .describe("Information about consent and data sharing"),
    )
    .field(
        FieldDef::optional("privacy_level", TypeDesc::Literal(PRIVACY_LEVELS))
            .alias("privacyLevel")
            .default_value(json!("pseudonymous"))
            .describe("Level of privacy protection"),
    )
}

fn demographic_data() -> ModelDef {
    ModelDef::new(DEMOGRAPHIC_DATA, "Demographic and experimental group information.")
        .field(FieldDef::optional("age", TypeDesc::Ref(AGE)).describe("Participant age"))
        .field(FieldDef::optional("sex", TypeDesc::Literal(SEX_VALUES)).describe("Biological sex"))
        .field(FieldDef::optional("gender", TypeDesc::String).describe("Gender identity"))
        .field(
            FieldDef::optional("group", TypeDesc::String)
                .describe("Experimental group assignment")
                .examples(vec![
                    json!("experimental"),
                    json!("control"),
                    json!("treatment_a"),
                    json!("treatment_b"),
                ]),
        )
        .field(
            FieldDef::optional("ethnicity", TypeDesc::String)
                .describe("Self-reported ethnicity"),
        )
        .field(
            FieldDef::optional(
                "handedness",
                TypeDesc::Literal(&["left", "right", "ambidextrous", "unknown"]),
            )
                .describe("Handedness"),
        )
        .field(
            FieldDef::optional("species", TypeDesc::String)
                .default_value(json!("human"))
                .describe("Species (for animal studies)")
                .examples(vec![json!("human"), json!("mouse"), json!("rat"), json!("monkey")]),
        )
        .field(
            FieldDef::optional("strain", TypeDesc::String)
                .describe("Genetic strain (for animal studies)")
                .examples(vec![json!("C57BL/6J"), json!("Sprague-Dawley")]),
        )
        .field(
            FieldDef::optional("genetic_modification", TypeDesc::String)
                .alias("geneticModification")
                .describe("Genetic modifications (for animal studies)"),
        )
}

pub fn definitions() -> Vec<ModelDef> {
    vec![
        participant(),
        ModelDef::new(AGE, "Age information.")
            .field(FieldDef::type_tag(&["QuantityValue"]))
            .field(FieldDef::required("value", TypeDesc::Number).ge(0.0).describe("Age value"))
            .field(
                FieldDef::defaulted("unit", TypeDesc::String, json!("YR"))
                    .describe("Unit of age (typically YR for years)"),
            ),
        demographic_data(),
        ModelDef::new(MEDICATION, "Medication history entry.")
            .field(FieldDef::optional("name", TypeDesc::String).describe("Medication name"))
            .field(FieldDef::optional("dosage", TypeDesc::String).describe("Dosage"))
            .field(FieldDef::optional("duration", TypeDesc::String).describe("Duration of use")),
        ModelDef::new(ASSESSMENT, "Clinical assessment entry.")
            .field(FieldDef::optional("name", TypeDesc::String).describe("Assessment name"))
            .field(FieldDef::optional("score", TypeDesc::Number).describe("Assessment score"))
            .field(FieldDef::optional("date", TypeDesc::String).describe("Assessment date")),
        ModelDef::new(CLINICAL_DATA, "Clinical or health-related information.")
            .field(
                FieldDef::optional("diagnosis", TypeDesc::list(TypeDesc::String))
                    .describe("Clinical diagnoses"),
            )
            .field(
                FieldDef::optional("medication_history", TypeDesc::list(TypeDesc::Ref(MEDICATION)))
                    .alias("medicationHistory")
                    .describe("Medication history"),
            )
            .field(
                FieldDef::optional("assessments", TypeDesc::list(TypeDesc::Ref(ASSESSMENT)))
                    .describe("Clinical assessment scores"),
            ),
        ModelDef::new(
            PRODUCTS_AVAILABLE,
            "Summary of available data products for this participant.",
        )
            .field(
                FieldDef::optional("count", TypeDesc::Integer)
                    .ge(0.0)
                    .describe("Total number of products"),
            )
            .field(
                FieldDef::optional("measures", TypeDesc::list(TypeDesc::String))
                    .describe("Types of measurements available"),
            )
            .field(
                FieldDef::optional("sessions", TypeDesc::list(TypeDesc::String))
                    .describe("Sessions with data"),
            )
            .field(
                FieldDef::optional("by_measure", TypeDesc::map(TypeDesc::Integer))
                    .alias("byMeasure")
                    .describe("Product counts by measurement type"),
            )
            .field(
                FieldDef::optional("by_session", TypeDesc::map(TypeDesc::Integer))
                    .alias("bySession")
                    .describe("Product counts by session"),
            ),
        ModelDef::new(SESSION_DURATION, "Session duration.")
            .field(FieldDef::optional("value", TypeDesc::Number).describe("Duration value"))
            .field(
                FieldDef::defaulted("unit", TypeDesc::String, json!("MIN"))
                    .describe("Duration unit"),
            ),
        ModelDef::new(ENVIRONMENT, "Environmental conditions.")
            .field(FieldDef::optional("temperature", TypeDesc::Number).describe("Temperature"))
            .field(FieldDef::optional("lighting", TypeDesc::String).describe("Lighting conditions"))
            .field(
                FieldDef::optional("noise_level", TypeDesc::String)
                    .alias("noiseLevel")
                    .describe("Noise level"),
            ),
        ModelDef::new(SESSION_METADATA, "Metadata about an experimental session.")
            .field(FieldDef::optional("session", TypeDesc::String).describe("Session identifier"))
            .field(FieldDef::optional("date", TypeDesc::String).describe("Session date"))
            .field(
                FieldDef::optional("duration", TypeDesc::Ref(SESSION_DURATION))
                    .describe("Session duration"),
            )
            .field(FieldDef::optional("notes", TypeDesc::String).describe("Session notes"))
            .field(
                FieldDef::optional("experimenter", TypeDesc::String)
                    .describe("Experimenter name"),
            )
            .field(
                FieldDef::optional("environment", TypeDesc::Ref(ENVIRONMENT))
                    .describe("Environmental conditions"),
            ),
        ModelDef::new(PARTICIPANT_LINKS, "Links to related resources.")
            .field(
                FieldDef::optional("products", TypeDesc::Url)
                    .describe("Link to all products for this participant"),
            )
            .field(
                FieldDef::optional("measures", TypeDesc::Url)
                    .describe("Link to available measures"),
            )
            .field(
                FieldDef::optional("sessions", TypeDesc::Url)
                    .describe("Link to session metadata"),
            ),
        ModelDef::new(CONSENT, "Information about consent and data sharing.")
            .field(
                FieldDef::optional("consent_date", TypeDesc::String)
                    .alias("consentDate")
                    .describe("Consent date"),
            )
            .field(
                FieldDef::optional("consent_version", TypeDesc::String)
                    .alias("consentVersion")
                    .describe("Version of consent form used"),
            )
            .field(
                FieldDef::optional(
                    "data_sharing",
                    TypeDesc::Literal(&["public", "restricted", "private"]),
                )
                    .alias("dataSharing")
                    .describe("Level of data sharing permitted"),
            )
            .field(
                FieldDef::optional("restrictions", TypeDesc::list(TypeDesc::String))
                    .describe("Specific restrictions on data use"),
            ),
    ]
}
