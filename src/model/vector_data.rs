//! Vector data: a 1-D numeric array with its unit and summary statistics

use super::common::unit_or_url;
use super::descriptor::{FieldDef, ModelDef, TypeDesc};

pub const VECTOR_DATA: &str = "VectorData";
pub const VECTOR_STATISTICS: &str = "VectorStatistics";

pub fn definitions() -> Vec<ModelDef> {
    vec![
        ModelDef::new(
            VECTOR_DATA,
            "Schema for vector data (1D array of values).\n\nRepresents a 1D numeric array with associated unit, statistics, and optional metadata.",
        )
        .field(FieldDef::type_tag(&["VectorData"]))
        .field(
            FieldDef::required("values", TypeDesc::list(TypeDesc::Number))
                .min_items(1)
                .describe("Array of numeric values"),
        )
        .field(
            FieldDef::required("unit", unit_or_url())
                .describe("Unit of measurement for all values"),
        )
        .field(
            FieldDef::optional("length", TypeDesc::Integer)
                .ge(1.0)
                .describe("Number of elements in the vector"),
        )
        .field(
            FieldDef::optional("labels", TypeDesc::list(TypeDesc::String))
                .describe("Optional labels for each value"),
        )
        .field(
            FieldDef::optional("statistics", TypeDesc::Ref(VECTOR_STATISTICS))
                .describe("Summary statistics for the vector"),
        )
        .field(
            FieldDef::optional("metadata", TypeDesc::object())
                .describe("Additional metadata about the vector"),
        ),
        ModelDef::new(VECTOR_STATISTICS, "Summary statistics for the vector.")
            .field(FieldDef::optional("mean", TypeDesc::Number).describe("Mean value"))
            .field(FieldDef::optional("median", TypeDesc::Number).describe("Median value"))
            .field(FieldDef::optional("std", TypeDesc::Number).describe("Standard deviation"))
            .field(FieldDef::optional("min", TypeDesc::Number).describe("Minimum value"))
            .field(FieldDef::optional("max", TypeDesc::Number).describe("Maximum value"))
            .field(FieldDef::optional("count", TypeDesc::Integer).describe("Number of values")),
    ]
}
