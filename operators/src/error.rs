use rastermosaic_datatypes::raster::{RasterDataType, RasterId};
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[snafu(context(suffix(false)))] // disables default `Snafu` suffix
pub enum Error {
    #[snafu(display("DataTypeError: {}", source))]
    DataTypes {
        source: rastermosaic_datatypes::error::Error,
    },

    #[snafu(display("Cannot select a level from an empty pyramid"))]
    EmptyPyramid,

    #[snafu(display(
        "The requested resolution must be positive and finite, but is ({}, {})",
        x,
        y
    ))]
    InvalidRequestResolution {
        x: f64,
        y: f64,
    },

    #[snafu(display(
        "Raster index {} is out of bounds for a catalog with {} rasters",
        raster_index,
        len
    ))]
    RasterIndexOutOfBounds {
        raster_index: usize,
        len: usize,
    },

    #[snafu(display(
        "Level index {} is out of bounds for raster `{}` with {} levels",
        level_index,
        raster_id,
        len
    ))]
    LevelIndexOutOfBounds {
        raster_id: RasterId,
        level_index: usize,
        len: usize,
    },

    #[snafu(display("Cannot place a mosaic without matched rasters"))]
    NoMatches,

    #[snafu(display("Raster `{}` has to be fitted before it can be placed", raster_id))]
    RecordNotFitted {
        raster_id: RasterId,
    },

    #[snafu(display("Cannot promote {} any further", data_type))]
    PromotionExhausted {
        data_type: RasterDataType,
    },

    #[snafu(display(
        "The no-data value of floating point type {} must be NaN, but is {}",
        data_type,
        no_data_value
    ))]
    InvalidFloatNoData {
        data_type: RasterDataType,
        no_data_value: f64,
    },

    #[snafu(display("Config error: {}", source))]
    Config {
        source: config::ConfigError,
    },

    #[snafu(display("Unable to retrieve the current working directory: {}", source))]
    MissingWorkingDirectory {
        source: std::io::Error,
    },

    MissingSettingsDirectory,

    ConfigLockFailed,

    #[snafu(display("Invalid log spec `{}`: {}", log_spec, source))]
    InvalidLogSpec {
        log_spec: String,
        source: tracing_subscriber::filter::ParseError,
    },

    #[snafu(display("Unable to install the global tracing subscriber: {}", source))]
    TracingInit {
        source: tracing_subscriber::util::TryInitError,
    },
}

impl From<rastermosaic_datatypes::error::Error> for Error {
    fn from(datatype_error: rastermosaic_datatypes::error::Error) -> Self {
        Self::DataTypes {
            source: datatype_error,
        }
    }
}
