use super::{PixelSize, PyramidLevel, PyramidLevelDefinition, RasterBandDescriptor, RasterDataType};
use crate::error;
use crate::primitives::BoundingBox2D;
use crate::spatial_reference::SpatialReference;
use crate::util::Result;
use serde::{Deserialize, Serialize};
use snafu::ensure;
use std::collections::HashSet;
use std::fmt;

/// The stable identifier of a raster in a catalog
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RasterId(String);

impl RasterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RasterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RasterId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RasterId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A raster with its complete pyramid and band descriptions.
///
/// Entries are immutable and can only be created by a [`RasterCatalogEntryBuilder`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RasterCatalogEntry {
    raster_id: RasterId,
    tile_size: PixelSize,
    levels: Vec<PyramidLevel>,
    bands: Vec<RasterBandDescriptor>,
    spatial_reference: SpatialReference,
    original_envelope: BoundingBox2D,
}

impl RasterCatalogEntry {
    pub fn builder(
        raster_id: impl Into<RasterId>,
        tile_size: PixelSize,
        spatial_reference: SpatialReference,
    ) -> RasterCatalogEntryBuilder {
        RasterCatalogEntryBuilder::new(raster_id, tile_size, spatial_reference)
    }

    pub fn raster_id(&self) -> &RasterId {
        &self.raster_id
    }

    pub fn tile_size(&self) -> PixelSize {
        self.tile_size
    }

    /// The pyramid levels, finest first. Never empty.
    pub fn levels(&self) -> &[PyramidLevel] {
        &self.levels
    }

    pub fn level(&self, level_index: usize) -> Option<&PyramidLevel> {
        self.levels.get(level_index)
    }

    /// The bands of the raster. Never empty.
    pub fn bands(&self) -> &[RasterBandDescriptor] {
        &self.bands
    }

    pub fn spatial_reference(&self) -> SpatialReference {
        self.spatial_reference
    }

    pub fn original_envelope(&self) -> BoundingBox2D {
        self.original_envelope
    }

    /// The native cell type shared by all bands that are not color-mapped
    pub fn native_data_type(&self) -> RasterDataType {
        self.bands
            .iter()
            .find(|band| !band.is_color_mapped())
            .unwrap_or(&self.bands[0])
            .data_type
    }
}

/// Collects the metadata of a raster while it is loaded and validates it in [`build`](Self::build).
#[derive(Clone, Debug)]
pub struct RasterCatalogEntryBuilder {
    raster_id: RasterId,
    tile_size: PixelSize,
    spatial_reference: SpatialReference,
    levels: Vec<PyramidLevelDefinition>,
    bands: Vec<RasterBandDescriptor>,
    original_envelope: Option<BoundingBox2D>,
}

impl RasterCatalogEntryBuilder {
    pub fn new(
        raster_id: impl Into<RasterId>,
        tile_size: PixelSize,
        spatial_reference: SpatialReference,
    ) -> Self {
        Self {
            raster_id: raster_id.into(),
            tile_size,
            spatial_reference,
            levels: Vec::new(),
            bands: Vec::new(),
            original_envelope: None,
        }
    }

    /// Appends the next coarser pyramid level
    #[must_use]
    pub fn level(mut self, definition: PyramidLevelDefinition) -> Self {
        self.levels.push(definition);
        self
    }

    #[must_use]
    pub fn band(mut self, band: RasterBandDescriptor) -> Self {
        self.bands.push(band);
        self
    }

    #[must_use]
    pub fn original_envelope(mut self, original_envelope: BoundingBox2D) -> Self {
        self.original_envelope = Some(original_envelope);
        self
    }

    /// Validates the collected metadata and creates the immutable entry
    ///
    /// # Errors
    ///
    /// Fails if the tile size is not positive, if there are no levels or no bands,
    /// if a level is invalid or not coarser than its predecessor,
    /// or if non color-mapped bands have differing data types.
    ///
    pub fn build(self) -> Result<RasterCatalogEntry> {
        ensure!(
            self.tile_size.is_positive(),
            error::InvalidTileSize {
                tile_size: self.tile_size
            }
        );
        ensure!(
            !self.levels.is_empty(),
            error::EmptyPyramid {
                raster_id: self.raster_id.clone()
            }
        );
        ensure!(
            !self.bands.is_empty(),
            error::NoBands {
                raster_id: self.raster_id.clone()
            }
        );

        let levels = self
            .levels
            .iter()
            .enumerate()
            .map(|(level_index, definition)| {
                PyramidLevel::from_definition(level_index, definition, self.tile_size)
            })
            .collect::<Result<Vec<_>>>()?;

        for (previous, level) in levels.iter().zip(levels.iter().skip(1)) {
            ensure!(
                level.resolution().x > previous.resolution().x,
                error::LevelsNotOrdered {
                    raster_id: self.raster_id.clone(),
                    level_index: level.level_index(),
                    resolution: level.resolution().x,
                    previous_resolution: previous.resolution().x,
                }
            );
        }

        if let Some(reference) = self.bands.iter().find(|band| !band.is_color_mapped()) {
            for (band_index, band) in self.bands.iter().enumerate() {
                ensure!(
                    band.is_color_mapped() || band.data_type == reference.data_type,
                    error::MixedBandDataTypes {
                        raster_id: self.raster_id.clone(),
                        band_index,
                        expected: reference.data_type,
                        found: band.data_type,
                    }
                );
            }
        }

        let original_envelope = self
            .original_envelope
            .unwrap_or_else(|| levels[0].image_envelope());

        Ok(RasterCatalogEntry {
            raster_id: self.raster_id,
            tile_size: self.tile_size,
            levels,
            bands: self.bands,
            spatial_reference: self.spatial_reference,
            original_envelope,
        })
    }
}

/// An ordered, immutable collection of rasters that form one logical mosaic dataset
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RasterCatalog {
    entries: Vec<RasterCatalogEntry>,
}

impl RasterCatalog {
    /// Creates a catalog from entries in their catalog order
    ///
    /// # Errors
    ///
    /// Fails if a raster id occurs more than once.
    ///
    pub fn new(entries: Vec<RasterCatalogEntry>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());

        for entry in &entries {
            ensure!(
                seen.insert(entry.raster_id()),
                error::DuplicateRasterId {
                    raster_id: entry.raster_id().clone()
                }
            );
        }

        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = &RasterCatalogEntry> {
        self.entries.iter()
    }

    pub fn get(&self, raster_index: usize) -> Option<&RasterCatalogEntry> {
        self.entries.get(raster_index)
    }

    /// Looks up an entry and its catalog index by raster id
    pub fn entry(&self, raster_id: &RasterId) -> Option<(usize, &RasterCatalogEntry)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, entry)| entry.raster_id() == raster_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a RasterCatalog {
    type Item = &'a RasterCatalogEntry;
    type IntoIter = std::slice::Iter<'a, RasterCatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
