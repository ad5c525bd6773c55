//! Discovery metadata for a RAP-compliant API

use super::common::RAP_CONTEXT;
use super::descriptor::{FieldDef, ModelDef, TypeDesc};

pub const API_DESCRIPTOR: &str = "ResearchAPIDescriptor";
pub const PAPER: &str = "Paper";
pub const API: &str = "API";
pub const ENDPOINT: &str = "Endpoint";

pub const DOI_PATTERN: &str = r"^10\.\d{4,}/[\S]+$";
pub const SEMVER_PATTERN: &str = r"^\d+\.\d+\.\d+$";
pub const SPEC_VERSION_PATTERN: &str = r"^\d+\.\d+$";

pub fn definitions() -> Vec<ModelDef> {
    vec![
        ModelDef::new(
            API_DESCRIPTOR,
            "Discovery metadata for a RAP-compliant API.\n\nProvides metadata about the research paper, API configuration, and available endpoints.",
        )
        // Unlike the other entities, the descriptor only accepts the fixed context URI
        .field(FieldDef::required("context", TypeDesc::Literal(&[RAP_CONTEXT])).alias("@context"))
        .field(FieldDef::type_tag(&["ResearchAPIDescriptor"]))
        .field(FieldDef::required("paper", TypeDesc::Ref(PAPER)).describe("Paper metadata"))
        .field(FieldDef::required("api", TypeDesc::Ref(API)).describe("API configuration"))
        .field(
            FieldDef::required("endpoints", TypeDesc::list(TypeDesc::Ref(ENDPOINT)))
                .describe("Available API endpoints"),
        )
        .field(FieldDef::optional("license", TypeDesc::String).describe("Data license"))
        .field(
            FieldDef::optional(
                "access_policy",
                TypeDesc::Literal(&["open", "authenticated", "embargoed"]),
            )
                .alias("accessPolicy")
                .describe("Access policy"),
        ),
        ModelDef::new(PAPER, "Paper metadata.")
            .field(
                FieldDef::required("doi", TypeDesc::String)
                    .pattern(DOI_PATTERN)
                    .describe("DOI of the paper"),
            )
            .field(FieldDef::required("title", TypeDesc::String).describe("Paper title"))
            .field(
                FieldDef::optional("authors", TypeDesc::list(TypeDesc::String))
                    .describe("List of authors"),
            )
            .field(
                FieldDef::optional("publication_date", TypeDesc::String)
                    .alias("publicationDate")
                    .describe("Publication date"),
            ),
        ModelDef::new(API, "API version and configuration.")
            .field(
                FieldDef::required("version", TypeDesc::String)
                    .pattern(SEMVER_PATTERN)
                    .describe("API version (semver)"),
            )
            .field(
                FieldDef::required("rap_spec_version", TypeDesc::String)
                    .alias("rapSpecVersion")
                    .pattern(SPEC_VERSION_PATTERN)
                    .describe("RAP specification version"),
            )
            .field(
                FieldDef::required("base_url", TypeDesc::Url)
                    .alias("baseUrl")
                    .describe("API base URL"),
            )
            .field(
                FieldDef::optional("documentation", TypeDesc::Url)
                    .describe("API documentation URL"),
            ),
        ModelDef::new(ENDPOINT, "API endpoint definition.")
            .field(FieldDef::required("path", TypeDesc::String).describe("Endpoint path"))
            .field(
                FieldDef::required(
                    "methods",
                    TypeDesc::list(TypeDesc::Literal(&["GET", "POST", "PUT", "DELETE"])),
                )
                    .describe("Supported HTTP methods"),
            )
            .field(
                FieldDef::optional("description", TypeDesc::String)
                    .describe("Endpoint description"),
            ),
    ]
}
