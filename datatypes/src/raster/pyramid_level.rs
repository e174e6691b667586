use super::{GeoTransform, GridRectangle, PixelOffset, PixelSize};
use crate::error;
use crate::primitives::{BoundingBox2D, Coordinate2D, SpatialResolution};
use crate::util::Result;
use serde::{Deserialize, Serialize};
use snafu::ensure;

/// One level of a raster pyramid as it is supplied when the catalog is loaded.
///
/// `image_envelope` and `image_size` describe the valid image region, `pixel_offset` is the position
/// of that region inside the level's tiled pixel grid.
/// `tiles` may be omitted, then the level is covered by the minimal number of tiles.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PyramidLevelDefinition {
    pub image_envelope: BoundingBox2D,
    pub image_size: PixelSize,
    #[serde(default)]
    pub pixel_offset: PixelOffset,
    #[serde(default)]
    pub tiles: Option<(usize, usize)>,
}

impl PyramidLevelDefinition {
    pub fn new(image_envelope: BoundingBox2D, image_size: PixelSize) -> Self {
        Self {
            image_envelope,
            image_size,
            pixel_offset: PixelOffset::default(),
            tiles: None,
        }
    }

    #[must_use]
    pub fn with_pixel_offset(mut self, pixel_offset: PixelOffset) -> Self {
        self.pixel_offset = pixel_offset;
        self
    }

    #[must_use]
    pub fn with_tiles(mut self, tiles_wide: usize, tiles_high: usize) -> Self {
        self.tiles = Some((tiles_wide, tiles_high));
        self
    }
}

/// An immutable resolution level of a raster pyramid.
///
/// The tiled pixel grid of a level starts at the upper left corner of `envelope`.
/// The valid image data starts `pixel_offset` pixels inside of it, which corresponds to `envelope_offset` in world units.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PyramidLevel {
    level_index: usize,
    resolution: SpatialResolution,
    pixel_offset: PixelOffset,
    envelope_offset: Coordinate2D,
    tiles_wide: usize,
    tiles_high: usize,
    tile_size: PixelSize,
    image_size: PixelSize,
    envelope: BoundingBox2D,
}

impl PyramidLevel {
    /// Validates a level definition and derives resolution, tile counts and the tiled envelope
    ///
    /// # Errors
    ///
    /// Fails if the tile size, image size or resolution are not positive,
    /// if the pixel offset is negative, or if the given tile counts cannot hold the image.
    ///
    #[allow(clippy::cast_precision_loss)]
    pub fn from_definition(
        level_index: usize,
        definition: &PyramidLevelDefinition,
        tile_size: PixelSize,
    ) -> Result<Self> {
        ensure!(tile_size.is_positive(), error::InvalidTileSize { tile_size });
        ensure!(
            definition.image_size.is_positive(),
            error::InvalidPyramidLevel {
                level_index,
                reason: "the image size must be positive",
            }
        );
        ensure!(
            definition.pixel_offset.x >= 0 && definition.pixel_offset.y >= 0,
            error::InvalidPyramidLevel {
                level_index,
                reason: "the pixel offset must not be negative",
            }
        );

        let resolution = SpatialResolution::new(
            definition.image_envelope.size_x() / definition.image_size.width as f64,
            definition.image_envelope.size_y() / definition.image_size.height as f64,
        )
        .map_err(|_| error::Error::InvalidPyramidLevel {
            level_index,
            reason: "the resolution must be positive",
        })?;

        let required_width = definition.pixel_offset.x as usize + definition.image_size.width;
        let required_height = definition.pixel_offset.y as usize + definition.image_size.height;
        let min_tiles_wide = required_width.div_ceil(tile_size.width);
        let min_tiles_high = required_height.div_ceil(tile_size.height);

        let (tiles_wide, tiles_high) = definition.tiles.unwrap_or((min_tiles_wide, min_tiles_high));

        ensure!(
            tiles_wide > 0 && tiles_high > 0,
            error::InvalidPyramidLevel {
                level_index,
                reason: "the tile counts must be positive",
            }
        );
        ensure!(
            tiles_wide >= min_tiles_wide && tiles_high >= min_tiles_high,
            error::InvalidPyramidLevel {
                level_index,
                reason: "the tiled grid is too small for the pixel offset and image size",
            }
        );

        let envelope_offset = Coordinate2D::new(
            -(definition.pixel_offset.x as f64) * resolution.x,
            definition.pixel_offset.y as f64 * resolution.y,
        );

        let upper_left = definition.image_envelope.upper_left() + envelope_offset;
        let lower_right = Coordinate2D::new(
            upper_left.x + (tiles_wide * tile_size.width) as f64 * resolution.x,
            upper_left.y - (tiles_high * tile_size.height) as f64 * resolution.y,
        );

        Ok(Self {
            level_index,
            resolution,
            pixel_offset: definition.pixel_offset,
            envelope_offset,
            tiles_wide,
            tiles_high,
            tile_size,
            image_size: definition.image_size,
            envelope: BoundingBox2D::new_upper_left_lower_right_unchecked(upper_left, lower_right),
        })
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn resolution(&self) -> SpatialResolution {
        self.resolution
    }

    pub fn pixel_offset(&self) -> PixelOffset {
        self.pixel_offset
    }

    pub fn envelope_offset(&self) -> Coordinate2D {
        self.envelope_offset
    }

    pub fn tiles_wide(&self) -> usize {
        self.tiles_wide
    }

    pub fn tiles_high(&self) -> usize {
        self.tiles_high
    }

    pub fn tile_size(&self) -> PixelSize {
        self.tile_size
    }

    pub fn image_size(&self) -> PixelSize {
        self.image_size
    }

    /// The tiled extent of the level, including padding pixels
    pub fn envelope(&self) -> BoundingBox2D {
        self.envelope
    }

    /// The extent covered by valid image pixels: the tiled envelope moved by `-envelope_offset`
    /// and clipped to the image size.
    #[allow(clippy::cast_precision_loss)]
    pub fn image_envelope(&self) -> BoundingBox2D {
        let upper_left = self.envelope.upper_left() - self.envelope_offset;

        BoundingBox2D::new_upper_left_lower_right_unchecked(
            upper_left,
            Coordinate2D::new(
                upper_left.x + self.image_size.width as f64 * self.resolution.x,
                upper_left.y - self.image_size.height as f64 * self.resolution.y,
            ),
        )
    }

    /// The window of valid pixels inside the tiled pixel grid
    pub fn valid_pixel_window(&self) -> GridRectangle {
        GridRectangle::with_size(self.pixel_offset, self.image_size)
    }

    /// All tile indices of the level
    #[allow(clippy::cast_possible_wrap)]
    pub fn tile_range(&self) -> GridRectangle {
        GridRectangle::new(0, 0, self.tiles_wide as isize, self.tiles_high as isize)
    }

    pub fn tiled_pixel_size(&self) -> PixelSize {
        PixelSize::new(
            self.tiles_wide * self.tile_size.width,
            self.tiles_high * self.tile_size.height,
        )
    }

    /// Maps the tiled pixel grid of this level to world coordinates
    pub fn geo_transform(&self) -> GeoTransform {
        GeoTransform::north_up(&self.envelope, self.resolution.x, self.resolution.y)
    }
}
