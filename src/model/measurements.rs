//! Measurement definitions
//!
//! `BaseMeasurement` carries the shared field set. The two concrete
//! variants reuse it and narrow `measurementType` to a literal tag, which is
//! what the research product's tagged union dispatches on.

use serde_json::json;

use super::common::{unit_or_url, UNIT};
use super::descriptor::{FieldDef, ModelDef, TypeDesc};

pub const BASE_MEASUREMENT: &str = "BaseMeasurement";
pub const RELAXOMETRY_MRI: &str = "RelaxometryMRIMeasurement";
pub const TIMESERIES: &str = "TimeseriesMeasurement";

pub const SPATIAL_RESOLUTION: &str = "SpatialResolution";
pub const FIELD_STRENGTH: &str = "FieldStrength";
pub const ACQUISITION_PARAMETERS: &str = "AcquisitionParameters";
pub const TIME_DIMENSION: &str = "TimeDimension";
pub const DIMENSIONS: &str = "Dimensions";
pub const SAMPLING_RATE: &str = "SamplingRate";
pub const DURATION: &str = "Duration";
pub const CHANNELS: &str = "Channels";

/// Wire name of the field the measurement union dispatches on
pub const MEASUREMENT_DISCRIMINATOR: &str = "measurementType";

/// `Union[RelaxometryMRIMeasurement, TimeseriesMeasurement]`, tagged by `measurementType`
pub fn measurement_union() -> TypeDesc {
    TypeDesc::Tagged {
        discriminator: MEASUREMENT_DISCRIMINATOR,
        variants: vec![RELAXOMETRY_MRI, TIMESERIES],
    }
}

/// `Union[float, List[float]]`
fn number_or_numbers() -> TypeDesc {
    TypeDesc::Union(vec![TypeDesc::Number, TypeDesc::list(TypeDesc::Number)])
}

fn base_measurement() -> ModelDef {
    ModelDef::new(
        BASE_MEASUREMENT,
        "Base schema for all measurement types.\n\nDomain-specific measurement types should extend this class.",
    )
    .field(FieldDef::type_tag(&["Measurement"]).describe("Type identifier for measurements"))
    .field(
        FieldDef::required("measurement_type", TypeDesc::String)
            .alias(MEASUREMENT_DISCRIMINATOR)
            .describe("Type of measurement (e.g., relaxometry_mri, timeseries)"),
    )
    .field(
        FieldDef::required("specific_measure", TypeDesc::String)
            .alias("specificMeasure")
            .describe("Specific measure within the measurement type"),
    )
    .field(
        FieldDef::optional("session", TypeDesc::String)
            .describe("Session identifier for longitudinal studies"),
    )
    .field(FieldDef::optional("unit", unit_or_url()).describe("Unit of measurement"))
    .field(
        FieldDef::optional("quantity_kind", TypeDesc::Url)
            .alias("quantityKind")
            .describe("QUDT quantity kind URI (e.g., http://qudt.org/vocab/quantitykind/Time)"),
    )
}

fn relaxometry_mri(base: &ModelDef) -> ModelDef {
    ModelDef::extend(
        base,
        RELAXOMETRY_MRI,
        "Measurement schema for MRI relaxometry data.\n\nExtends BaseMeasurement with MRI-specific fields.",
    )
    .field(
        FieldDef::defaulted(
            "measurement_type",
            TypeDesc::Literal(&["relaxometry_mri"]),
            json!("relaxometry_mri"),
        )
            .alias(MEASUREMENT_DISCRIMINATOR)
            .describe("Type of measurement"),
    )
    .field(
        FieldDef::required("specific_measure", TypeDesc::String)
            .alias("specificMeasure")
            .describe("Specific relaxometry measure")
            .examples(vec![
                json!("t1_relaxation_time"),
                json!("t2_relaxation_time"),
                json!("t2star_relaxation_time"),
            ]),
    )
    .field(
        FieldDef::optional("anatomical_region", TypeDesc::String)
            .alias("anatomicalRegion")
            .describe("Anatomical region measured")
            .examples(vec![
                json!("gray_matter"),
                json!("white_matter"),
                json!("hippocampus"),
                json!("cortex"),
            ]),
    )
    .field(
        FieldDef::optional(
            "region_type",
            TypeDesc::Literal(&["tissue_class", "anatomical_roi", "functional_roi", "voxel_wise"]),
        )
        .alias("regionType")
        .describe("Type of region definition"),
    )
    .field(
        FieldDef::optional("vector_length", TypeDesc::Integer)
            .alias("vectorLength")
            .ge(1.0)
            .describe("Number of values in the measurement vector"),
    )
    .field(
        FieldDef::optional("spatial_resolution", TypeDesc::Ref(SPATIAL_RESOLUTION))
            .alias("spatialResolution")
            .describe("Spatial resolution of the measurement"),
    )
    .field(
        FieldDef::optional("coordinate_system", TypeDesc::String)
            .alias("coordinateSystem")
            .describe("Coordinate system used")
            .examples(vec![json!("MNI152"), json!("Talairach"), json!("native")]),
    )
    .field(
        FieldDef::optional("acquisition_parameters", TypeDesc::Ref(ACQUISITION_PARAMETERS))
            .alias("acquisitionParameters")
            .describe("MRI acquisition parameters"),
    )
}

fn timeseries(base: &ModelDef) -> ModelDef {
    ModelDef::extend(
        base,
        TIMESERIES,
        "Measurement schema for timeseries data.\n\nExtends BaseMeasurement with timeseries-specific fields.",
    )
    .field(
        FieldDef::defaulted(
            "measurement_type",
            TypeDesc::Literal(&["timeseries"]),
            json!("timeseries"),
        )
            .alias(MEASUREMENT_DISCRIMINATOR)
            .describe("Type of measurement"),
    )
    .field(
        FieldDef::required("specific_measure", TypeDesc::String)
            .alias("specificMeasure")
            .describe("Specific timeseries measure")
            .examples(vec![
                json!("calcium_imaging"),
                json!("eeg"),
                json!("ecg"),
                json!("behavioral_response"),
                json!("neural_activity"),
            ]),
    )
    .field(
        FieldDef::optional("dimensions", TypeDesc::Ref(DIMENSIONS))
            .describe("Dimensions of the timeseries data"),
    )
    .field(
        FieldDef::optional("sampling_rate", TypeDesc::Ref(SAMPLING_RATE))
            .alias("samplingRate")
            .describe("Sampling rate of the timeseries"),
    )
    .field(
        FieldDef::optional("duration", TypeDesc::Ref(DURATION))
            .describe("Total duration of the timeseries"),
    )
    .field(
        FieldDef::optional("channels", TypeDesc::Ref(CHANNELS))
            .describe("Channel information for multi-channel timeseries"),
    )
}

/// A `{value, unit}` pair with a lower bound on the value
fn valued_unit(
    name: &'static str,
    description: &'static str,
    value_doc: &'static str,
    unit_doc: &'static str,
) -> ModelDef {
    ModelDef::new(name, description)
        .field(FieldDef::required("value", TypeDesc::Number).ge(0.0).describe(value_doc))
        .field(FieldDef::required("unit", TypeDesc::Ref(UNIT)).describe(unit_doc))
}

pub fn definitions() -> Vec<ModelDef> {
    let base = base_measurement();
    let mri = relaxometry_mri(&base);
    let series = timeseries(&base);

    vec![
        base,
        mri,
        series,
        valued_unit(
            SPATIAL_RESOLUTION,
            "Spatial resolution of the measurement.",
            "Resolution value",
            "Unit of spatial resolution",
        ),
        valued_unit(
            FIELD_STRENGTH,
            "Magnetic field strength.",
            "Field strength value",
            "Field strength unit",
        ),
        ModelDef::new(ACQUISITION_PARAMETERS, "MRI acquisition parameters.")
            .field(
                FieldDef::optional("field_strength", TypeDesc::Ref(FIELD_STRENGTH))
                    .alias("fieldStrength")
                    .describe("Magnetic field strength"),
            )
            .field(
                FieldDef::optional("scanner", TypeDesc::String)
                    .describe("Scanner manufacturer and model"),
            )
            .field(
                FieldDef::optional("sequence", TypeDesc::String)
                    .describe("MRI pulse sequence used"),
            )
            .field(
                FieldDef::optional("TR", TypeDesc::Number)
                    .ge(0.0)
                    .describe("Repetition time in ms"),
            )
            .field(FieldDef::optional("TE", number_or_numbers()).describe("Echo time(s) in ms"))
            .field(
                FieldDef::optional("TI", number_or_numbers())
                    .describe("Inversion time(s) in ms"),
            )
            .field(
                FieldDef::optional("flip_angle", TypeDesc::Number)
                    .alias("flipAngle")
                    .ge(0.0)
                    .le(180.0)
                    .describe("Flip angle in degrees"),
            ),
        ModelDef::new(TIME_DIMENSION, "Time dimension information.")
            .field(
                FieldDef::required("length", TypeDesc::Integer)
                    .ge(1.0)
                    .describe("Number of time points"),
            )
            .field(FieldDef::optional("start", TypeDesc::Number).describe("Start time"))
            .field(FieldDef::optional("end", TypeDesc::Number).describe("End time")),
        ModelDef::new(DIMENSIONS, "Dimensions of the timeseries data.")
            .field(
                FieldDef::optional("time", TypeDesc::Ref(TIME_DIMENSION))
                    .describe("Time dimension information"),
            ),
        ModelDef::new(SAMPLING_RATE, "Sampling rate of the timeseries.")
            .field(
                FieldDef::required("value", TypeDesc::Number)
                    .gt(0.0)
                    .describe("Sampling rate value"),
            )
            .field(FieldDef::required("unit", TypeDesc::Ref(UNIT)).describe("Sampling rate unit")),
        valued_unit(
            DURATION,
            "Total duration of the timeseries.",
            "Duration value",
            "Duration unit",
        ),
        ModelDef::new(CHANNELS, "Channel information for multi-channel timeseries.")
            .field(
                FieldDef::required("count", TypeDesc::Integer)
                    .ge(1.0)
                    .describe("Number of channels"),
            )
            .field(
                FieldDef::optional("type_", TypeDesc::String)
                    .alias("type")
                    .describe("Type of channels"),
            )
            .field(
                FieldDef::optional("labels", TypeDesc::list(TypeDesc::String))
                    .describe("Labels for each channel"),
            ),
    ]
}
