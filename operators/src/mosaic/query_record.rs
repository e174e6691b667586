use rastermosaic_datatypes::primitives::{BoundingBox2D, SpatialResolution};
use rastermosaic_datatypes::raster::{GridRectangle, RasterId};
use serde::{Deserialize, Serialize};

/// The pixel window and tiles of one pyramid level that cover a requested envelope.
///
/// All pixel windows are expressed in the tiled pixel grid of the level.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileFit {
    /// The delivered envelope, aligned to the pixel grid of the level
    pub result_envelope: BoundingBox2D,
    /// The valid pixels covered by `result_envelope`
    pub result_pixel_window: GridRectangle,
    /// Tile indices whose union covers `result_pixel_window`
    pub matching_tile_range: GridRectangle,
    /// All tile indices of the level
    pub level_tile_range: GridRectangle,
    /// `matching_tile_range` in pixel units, as returned by a tile store
    pub tiled_pixel_window: GridRectangle,
    /// `result_pixel_window` relative to the upper left corner of `tiled_pixel_window`
    pub window_in_tiled_pixels: GridRectangle,
}

impl TileFit {
    /// The request does not overlap any valid pixel of the level
    pub fn is_empty(&self) -> bool {
        self.result_pixel_window.is_empty()
    }
}

/// The state of one matched raster during one query.
///
/// A record is created by the catalog matcher, completed by the tile fitter and the mosaic placer,
/// and handed from stage to stage by value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RasterQueryRecord {
    pub raster_id: RasterId,
    pub raster_index: usize,
    pub level_index: usize,
    pub level_resolution: SpatialResolution,
    pub requested_envelope: BoundingBox2D,
    pub requested_resolution: SpatialResolution,
    pub tile_fit: Option<TileFit>,
    pub mosaic_placement: Option<GridRectangle>,
}

impl RasterQueryRecord {
    pub fn new(
        raster_id: RasterId,
        raster_index: usize,
        level_index: usize,
        level_resolution: SpatialResolution,
        requested_envelope: BoundingBox2D,
        requested_resolution: SpatialResolution,
    ) -> Self {
        Self {
            raster_id,
            raster_index,
            level_index,
            level_resolution,
            requested_envelope,
            requested_resolution,
            tile_fit: None,
            mosaic_placement: None,
        }
    }

    pub fn result_envelope(&self) -> Option<BoundingBox2D> {
        self.tile_fit.map(|fit| fit.result_envelope)
    }

    /// Whether the record was fitted and covers at least one pixel
    pub fn has_pixels(&self) -> bool {
        self.tile_fit.is_some_and(|fit| !fit.is_empty())
    }
}
