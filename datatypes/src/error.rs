use snafu::Snafu;

use crate::primitives::{Coordinate2D, PrimitivesError};
use crate::raster::{PixelSize, RasterDataType, RasterId};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[snafu(context(suffix(false)))] // disables default `Snafu` suffix
pub enum Error {
    #[snafu(display(
        "The conditions ll.x <= ur.x && ll.y <= ur.y are not met by ll:{} ur:{}",
        lower_left_coordinate,
        upper_right_coordinate
    ))]
    InvalidBoundingBox {
        lower_left_coordinate: Coordinate2D,
        upper_right_coordinate: Coordinate2D,
    },

    Primitives {
        source: PrimitivesError,
    },

    #[snafu(display("InvalidSpatialReferenceString: {}", spatial_reference_string))]
    InvalidSpatialReferenceString {
        spatial_reference_string: String,
    },

    #[snafu(display("ParseU32: {}", source))]
    ParseU32 {
        source: <u32 as std::str::FromStr>::Err,
    },

    #[snafu(display("Tile size must be positive, but is {}x{}", tile_size.width, tile_size.height))]
    InvalidTileSize {
        tile_size: PixelSize,
    },

    #[snafu(display("Invalid pyramid level {}: {}", level_index, reason))]
    InvalidPyramidLevel {
        level_index: usize,
        reason: &'static str,
    },

    #[snafu(display("Raster `{}` has no pyramid levels", raster_id))]
    EmptyPyramid {
        raster_id: RasterId,
    },

    #[snafu(display(
        "Pyramid level {} of raster `{}` is not coarser than its predecessor ({} <= {})",
        level_index,
        raster_id,
        resolution,
        previous_resolution
    ))]
    LevelsNotOrdered {
        raster_id: RasterId,
        level_index: usize,
        resolution: f64,
        previous_resolution: f64,
    },

    #[snafu(display("Raster `{}` has no bands", raster_id))]
    NoBands {
        raster_id: RasterId,
    },

    #[snafu(display(
        "Band {} of raster `{}` has data type {} but the raster uses {}; only color-mapped bands may differ",
        band_index,
        raster_id,
        found,
        expected
    ))]
    MixedBandDataTypes {
        raster_id: RasterId,
        band_index: usize,
        expected: RasterDataType,
        found: RasterDataType,
    },

    #[snafu(display("Raster `{}` is contained more than once in the catalog", raster_id))]
    DuplicateRasterId {
        raster_id: RasterId,
    },
}

impl From<PrimitivesError> for Error {
    fn from(error: PrimitivesError) -> Self {
        Error::Primitives { source: error }
    }
}
