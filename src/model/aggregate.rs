//! Aggregate statistics computed over groups of research products

use serde_json::json;

use super::collection::string_or_strings;
use super::common::context_field;
use super::descriptor::{FieldDef, ModelDef, TypeDesc};

pub const AGGREGATE: &str = "AggregateStatistics";
pub const AGGREGATE_FILTERS: &str = "AggregateFilters";
pub const MEAN_VALUE: &str = "MeanValue";
pub const QUANTILE_VALUES: &str = "QuantileValues";
pub const CONFIDENCE_INTERVAL: &str = "ConfidenceInterval";
pub const GROUP_STATISTICS: &str = "GroupStatistics";
pub const HISTOGRAM: &str = "Histogram";
pub const KDE: &str = "KDE";
pub const DISTRIBUTION: &str = "Distribution";
pub const AGGREGATE_LINKS: &str = "AggregateLinks";
pub const AGGREGATE_GROUP: &str = "AggregateGroup";
pub const COMPARISON_GROUP: &str = "ComparisonGroup";
pub const EFFECT_SIZE: &str = "EffectSize";
pub const STATISTICAL_TEST: &str = "StatisticalTest";
pub const POST_HOC_COMPARISON: &str = "PostHocComparison";
pub const COMPARISON: &str = "Comparison";
pub const AGGREGATE_METADATA: &str = "AggregateMetadata";

fn aggregate_statistics() -> ModelDef {
    ModelDef::new(
        AGGREGATE,
        "Aggregated statistics across multiple research products.\n\nProvides group-level statistics, distributions, and statistical comparisons.",
    )
    .field(context_field())
    .field(FieldDef::type_tag(&["AggregateStatistics"]))
    .field(
        FieldDef::required("id_", TypeDesc::Url)
            .alias("@id")
            .describe("URI of this aggregate query"),
    )
    .field(
        FieldDef::required("measure", TypeDesc::String)
            .describe("The measurement type being aggregated"),
    )
    .field(
        FieldDef::optional("grouping", TypeDesc::String)
            .describe("The dimension(s) used for grouping")
            .examples(vec![
                json!("session"),
                json!("participant"),
                json!("group"),
                json!("participant,session"),
            ]),
    )
    .field(
        FieldDef::optional("filters", TypeDesc::Ref(AGGREGATE_FILTERS))
            .describe("Filters applied before aggregation"),
    )
    .field(
        FieldDef::required("aggregates", TypeDesc::list(TypeDesc::Ref(AGGREGATE_GROUP)))
            .min_items(1)
            .describe("Array of aggregate results for each group"),
    )
    .field(
        FieldDef::optional("comparison", TypeDesc::Ref(COMPARISON))
            .describe("Statistical comparison between groups"),
    )
    .field(
        FieldDef::optional("metadata", TypeDesc::Ref(AGGREGATE_METADATA))
            .describe("Additional metadata about the aggregation"),
    )
}

fn group_statistics() -> ModelDef {
    let number = |name: &'static str, doc: &'static str| FieldDef::optional(name, TypeDesc::Number)
        .describe(doc);

    ModelDef::new(GROUP_STATISTICS, "Statistical measures.")
        .field(
            FieldDef::optional(
                "mean",
                TypeDesc::Union(vec![TypeDesc::Number, TypeDesc::Ref(MEAN_VALUE)]),
            )
                .describe("Mean value"),
        )
        .field(number("median", "Median value"))
        .field(number("std", "Standard deviation"))
        .field(number("sem", "Standard error of the mean"))
        .field(number("variance", "Variance"))
        .field(number("min", "Minimum value"))
        .field(number("max", "Maximum value"))
        .field(
            FieldDef::optional("range", TypeDesc::list(TypeDesc::Number))
                .min_items(2)
                .max_items(2)
                .describe("Range [min, max]"),
        )
        .field(
            FieldDef::optional("quantiles", TypeDesc::Ref(QUANTILE_VALUES))
                .describe("Quantile values"),
        )
        .field(
            FieldDef::optional("confidence_interval", TypeDesc::Ref(CONFIDENCE_INTERVAL))
                .alias("confidenceInterval")
                .describe("Confidence interval"),
        )
}

fn aggregate_group() -> ModelDef {
    ModelDef::new(AGGREGATE_GROUP, "Aggregate results for a single group.")
        .field(FieldDef::optional("participant", TypeDesc::String).describe("Participant ID"))
        .field(FieldDef::optional("session", TypeDesc::String).describe("Session ID"))
        .field(FieldDef::optional("group", TypeDesc::String).describe("Group name"))
        .field(
            FieldDef::optional("participant_count", TypeDesc::Integer)
                .alias("participantCount")
                .ge(0.0)
                .describe("Number of participants in this group"),
        )
        .field(
            FieldDef::optional("product_count", TypeDesc::Integer)
                .alias("productCount")
                .ge(0.0)
                .describe("Number of products in this group"),
        )
        .field(
            FieldDef::required("statistics", TypeDesc::Ref(GROUP_STATISTICS))
                .describe("Statistical measures"),
        )
        .field(
            FieldDef::optional("distribution", TypeDesc::Ref(DISTRIBUTION))
                .describe("Distribution information"),
        )
        .field(
            FieldDef::optional("links", TypeDesc::Ref(AGGREGATE_LINKS))
                .describe("Links to related resources"),
        )
}

fn statistical_test() -> ModelDef {
    ModelDef::new(STATISTICAL_TEST, "Statistical test results.")
        .field(
            FieldDef::required(
                "method",
                TypeDesc::Literal(&[
                    "t-test", "anova", "mann-whitney", "kruskal-wallis", "chi-square",
                ]),
            )
            .describe("Statistical test used"),
        )
        .field(FieldDef::required("statistic", TypeDesc::Number).describe("Test statistic value"))
        .field(
            FieldDef::required("p_value", TypeDesc::Number)
                .alias("pValue")
                .ge(0.0)
                .le(1.0)
                .describe("P-value"),
        )
        .field(
            FieldDef::optional("significant", TypeDesc::Boolean)
                .describe("Whether result is significant at chosen alpha"),
        )
        .field(
            FieldDef::optional("alpha", TypeDesc::Number)
                .default_value(json!(0.05))
                .describe("Significance threshold"),
        )
        .field(
            FieldDef::optional("effect_size", TypeDesc::Ref(EFFECT_SIZE))
                .alias("effectSize")
                .describe("Effect size"),
        )
        .field(
            FieldDef::optional(
                "degrees_of_freedom",
                TypeDesc::Union(vec![TypeDesc::Number, TypeDesc::list(TypeDesc::Number)]),
            )
            .alias("degreesOfFreedom")
            .describe("Degrees of freedom"),
        )
}

pub fn definitions() -> Vec<ModelDef> {
    vec![
        aggregate_statistics(),
        ModelDef::new(AGGREGATE_FILTERS, "Filters applied before aggregation.")
            .field(
                FieldDef::optional("participant", string_or_strings())
                    .describe("Participant filter(s)"),
            )
            .field(FieldDef::optional("session", string_or_strings()).describe("Session filter(s)"))
            .field(FieldDef::optional("group", TypeDesc::String).describe("Group filter"))
            .field(
                FieldDef::optional("age_range", TypeDesc::map(TypeDesc::Number))
                    .alias("ageRange")
                    .describe("Age range filter"),
            ),
        ModelDef::new(MEAN_VALUE, "Mean value with optional units.")
            .field(FieldDef::required("value", TypeDesc::Number).describe("Mean value"))
            .field(FieldDef::optional("units", TypeDesc::String).describe("Units")),
        ModelDef::new(QUANTILE_VALUES, "Quantile values.")
            .field(FieldDef::optional("q25", TypeDesc::Number).describe("25th percentile"))
            .field(FieldDef::optional("q50", TypeDesc::Number).describe("50th percentile (median)"))
            .field(FieldDef::optional("q75", TypeDesc::Number).describe("75th percentile")),
        ModelDef::new(CONFIDENCE_INTERVAL, "Confidence interval.")
            .field(
                FieldDef::required("level", TypeDesc::Number)
                    .ge(0.0)
                    .le(1.0)
                    .describe("Confidence level (e.g., 0.95 for 95%)"),
            )
            .field(FieldDef::required("lower", TypeDesc::Number).describe("Lower bound"))
            .field(FieldDef::required("upper", TypeDesc::Number).describe("Upper bound")),
        group_statistics(),
        ModelDef::new(HISTOGRAM, "Histogram distribution.")
            .field(
                FieldDef::optional("bins", TypeDesc::list(TypeDesc::Number))
                    .describe("Histogram bin edges"),
            )
            .field(
                FieldDef::optional("counts", TypeDesc::list(TypeDesc::Integer))
                    .describe("Counts per bin"),
            ),
        ModelDef::new(KDE, "Kernel density estimate.")
            .field(FieldDef::optional("x", TypeDesc::list(TypeDesc::Number)).describe("X values"))
            .field(
                FieldDef::optional("y", TypeDesc::list(TypeDesc::Number))
                    .describe("Y values (density)"),
            ),
        ModelDef::new(DISTRIBUTION, "Distribution information.")
            .field(
                FieldDef::optional("histogram", TypeDesc::Ref(HISTOGRAM))
                    .describe("Histogram distribution"),
            )
            .field(
                FieldDef::optional("kde", TypeDesc::Ref(KDE))
                    .describe("Kernel density estimate"),
            ),
        ModelDef::new(AGGREGATE_LINKS, "Links to related resources.")
            .field(
                FieldDef::optional("products", TypeDesc::Url)
                    .describe("Link to products in this group"),
            )
            .field(
                FieldDef::optional("raw_data", TypeDesc::Url)
                    .alias("rawData")
                    .describe("Link to download raw aggregate data"),
            ),
        aggregate_group(),
        ModelDef::new(COMPARISON_GROUP, "Group being compared.")
            .field(FieldDef::optional("name", TypeDesc::String).describe("Group name"))
            .field(
                FieldDef::optional("participant_count", TypeDesc::Integer)
                    .alias("participantCount")
                    .describe("Number of participants"),
            )
            .field(
                FieldDef::optional("statistics", TypeDesc::map(TypeDesc::Number))
                    .describe("Group statistics (mean, std)"),
            ),
        ModelDef::new(EFFECT_SIZE, "Effect size measure.")
            .field(
                FieldDef::required(
                    "measure",
                    TypeDesc::Literal(&[
                        "cohensD", "hedgesG", "glassD", "eta-squared", "omega-squared",
                    ]),
                )
                .describe("Effect size measure type"),
            )
            .field(FieldDef::required("value", TypeDesc::Number).describe("Effect size value")),
        statistical_test(),
        ModelDef::new(POST_HOC_COMPARISON, "Post-hoc pairwise comparison.")
            .field(FieldDef::optional("group1", TypeDesc::String).describe("First group"))
            .field(FieldDef::optional("group2", TypeDesc::String).describe("Second group"))
            .field(
                FieldDef::optional("p_value", TypeDesc::Number)
                    .alias("pValue")
                    .describe("P-value"),
            )
            .field(
                FieldDef::optional("adjusted", TypeDesc::Boolean)
                    .describe("Whether p-value is adjusted for multiple comparisons"),
            )
            .field(
                FieldDef::optional(
                    "adjustment_method",
                    TypeDesc::Literal(&["bonferroni", "holm", "fdr_bh", "fdr_by"]),
                )
                    .alias("adjustmentMethod")
                    .describe("Adjustment method used"),
            ),
        ModelDef::new(COMPARISON, "Statistical comparison between groups.")
            .field(
                FieldDef::optional("groups", TypeDesc::list(TypeDesc::Ref(COMPARISON_GROUP)))
                    .describe("Groups being compared"),
            )
            .field(
                FieldDef::required("test", TypeDesc::Ref(STATISTICAL_TEST))
                    .describe("Statistical test results"),
            )
            .field(
                FieldDef::optional("post_hoc", TypeDesc::list(TypeDesc::Ref(POST_HOC_COMPARISON)))
                    .alias("postHoc")
                    .describe("Post-hoc pairwise comparisons"),
            ),
        ModelDef::new(AGGREGATE_METADATA, "Additional metadata about the aggregation.")
            .field(
                FieldDef::optional("computed_at", TypeDesc::String)
                    .alias("computedAt")
                    .describe("When these statistics were computed"),
            )
            .field(
                FieldDef::optional("software_used", TypeDesc::map(TypeDesc::String))
                    .alias("softwareUsed")
                    .describe("Software used for computation"),
            )
            .field(
                FieldDef::optional(
                    "excluded_products",
                    TypeDesc::list(TypeDesc::map(TypeDesc::String)),
                )
                    .alias("excludedProducts")
                    .describe("Products excluded from aggregation and why"),
            ),
    ]
}
