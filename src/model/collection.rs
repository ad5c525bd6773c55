//! Research product collections: filtering, pagination and sorting

use super::common::context_field;
use super::descriptor::{FieldDef, ModelDef, TypeDesc};
use super::research_product::{PROCESSING_LEVELS, RESEARCH_PRODUCT};

pub const COLLECTION: &str = "ResearchProductCollection";
pub const APPLIED_FILTERS: &str = "AppliedFilters";
pub const AVAILABLE_FILTERS: &str = "AvailableFilters";
pub const FILTER: &str = "Filter";
pub const PRODUCT_SUMMARY: &str = "ProductSummary";
pub const PAGINATION_LINKS: &str = "PaginationLinks";
pub const PAGINATION: &str = "Pagination";
pub const SORTED_BY: &str = "SortedBy";

/// `Union[str, List[str]]`
pub fn string_or_strings() -> TypeDesc {
    TypeDesc::Union(vec![TypeDesc::String, TypeDesc::list(TypeDesc::String)])
}

fn collection() -> ModelDef {
    ModelDef::new(
        COLLECTION,
        "A collection of research products with filtering capabilities.\n\nSupports filtering, pagination, and sorting of research products.",
    )
    .field(context_field())
    .field(FieldDef::type_tag(&["ResearchProductCollection"]))
    .field(FieldDef::required("id_", TypeDesc::Url).alias("@id").describe("URI of this collection"))
    .field(
        FieldDef::required("total_items", TypeDesc::Integer)
            .alias("totalItems")
            .ge(0.0)
            .describe("Total number of products in the collection"),
    )
    .field(
        FieldDef::optional("filter", TypeDesc::Ref(FILTER))
            .describe("Information about applied and available filters"),
    )
    .field(
        FieldDef::required(
            "member",
            TypeDesc::list(TypeDesc::Union(vec![
                TypeDesc::Ref(RESEARCH_PRODUCT),
                TypeDesc::Ref(PRODUCT_SUMMARY),
            ])),
        )
        .describe("Array of research products in this collection"),
    )
    .field(
        FieldDef::optional("pagination", TypeDesc::Ref(PAGINATION))
            .describe("Pagination information for large collections"),
    )
    .field(
        FieldDef::optional("sorted_by", TypeDesc::Ref(SORTED_BY))
            .alias("sortedBy")
            .describe("Current sort order"),
    )
}

fn optional_page_count(
    name: &'static str,
    alias: Option<&'static str>,
    doc: &'static str,
) -> FieldDef {
    let field = FieldDef::optional(name, TypeDesc::Integer).ge(1.0).describe(doc);
    match alias {
        Some(alias) => field.alias(alias),
        None => field,
    }
}

pub fn definitions() -> Vec<ModelDef> {
    vec![
        collection(),
        ModelDef::new(APPLIED_FILTERS, "Currently applied filters.")
            .field(
                FieldDef::optional("participant", string_or_strings())
                    .describe("Participant ID filter(s)"),
            )
            .field(
                FieldDef::optional("measure", string_or_strings())
                    .describe("Measurement type filter(s)"),
            )
            .field(FieldDef::optional("session", string_or_strings()).describe("Session filter(s)"))
            .field(FieldDef::optional("group", TypeDesc::String).describe("Group filter"))
            .field(
                FieldDef::optional("processing_level", TypeDesc::Literal(PROCESSING_LEVELS))
                    .alias("processingLevel")
                    .describe("Processing level filter"),
            ),
        ModelDef::new(AVAILABLE_FILTERS, "All available filter values.")
            .field(
                FieldDef::optional("participant", TypeDesc::list(TypeDesc::String))
                    .describe("List of all participant IDs"),
            )
            .field(
                FieldDef::optional("measure", TypeDesc::list(TypeDesc::String))
                    .describe("List of all measurement types"),
            )
            .field(
                FieldDef::optional("session", TypeDesc::list(TypeDesc::String))
                    .describe("List of all session types"),
            )
            .field(
                FieldDef::optional("group", TypeDesc::list(TypeDesc::String))
                    .describe("List of all experimental groups"),
            )
            .field(
                FieldDef::optional("processing_level", TypeDesc::list(TypeDesc::String))
                    .alias("processingLevel")
                    .describe("List of all processing levels"),
            ),
        ModelDef::new(FILTER, "Information about applied and available filters.")
            .field(
                FieldDef::optional("applied", TypeDesc::Ref(APPLIED_FILTERS))
                    .describe("Currently applied filters"),
            )
            .field(
                FieldDef::optional("available", TypeDesc::Ref(AVAILABLE_FILTERS))
                    .describe("All available filter values"),
            ),
        ModelDef::new(PRODUCT_SUMMARY, "Brief summary of a research product.")
            .field(FieldDef::type_tag(&["ResearchProduct"]))
            .field(FieldDef::required("id_", TypeDesc::Url).alias("@id").describe("Product URI"))
            .field(
                FieldDef::required("identifier", TypeDesc::String)
                    .describe("Product identifier"),
            )
            .field(
                FieldDef::optional("participant", TypeDesc::object())
                    .describe("Participant reference"),
            )
            .field(
                FieldDef::optional("measurement", TypeDesc::object())
                    .describe("Measurement metadata"),
            )
            .field(
                FieldDef::optional("summary", TypeDesc::object())
                    .describe("Brief summary of the product"),
            )
            .field(
                FieldDef::optional("distribution", TypeDesc::object())
                    .describe("Distribution information"),
            ),
        ModelDef::new(PAGINATION_LINKS, "Pagination links.")
            .field(FieldDef::optional("first", TypeDesc::Url).describe("First page link"))
            .field(FieldDef::optional("prev", TypeDesc::Url).describe("Previous page link"))
            .field(FieldDef::optional("next", TypeDesc::Url).describe("Next page link"))
            .field(FieldDef::optional("last", TypeDesc::Url).describe("Last page link")),
        ModelDef::new(PAGINATION, "Pagination information for large collections.")
            .field(optional_page_count("page", None, "Current page number"))
            .field(optional_page_count("page_size", Some("pageSize"), "Number of items per page"))
            .field(optional_page_count("total_pages", Some("totalPages"), "Total number of pages"))
            .field(
                FieldDef::optional("links", TypeDesc::Ref(PAGINATION_LINKS))
                    .describe("Pagination links"),
            ),
        ModelDef::new(SORTED_BY, "Current sort order.")
            .field(
                FieldDef::optional("field", TypeDesc::String)
                    .describe("Field name being sorted by"),
            )
            .field(
                FieldDef::optional("order", TypeDesc::Literal(&["asc", "desc"]))
                    .describe("Sort order"),
            ),
    ]
}
