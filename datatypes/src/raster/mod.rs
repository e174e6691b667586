mod band;
mod catalog;
mod data_type;
mod geo_transform;
mod grid_rectangle;
mod pyramid_level;

pub use self::band::{BandStatistics, ColorMap, RasterBandDescriptor};
pub use self::catalog::{RasterCatalog, RasterCatalogEntry, RasterCatalogEntryBuilder, RasterId};
pub use self::data_type::RasterDataType;
pub use self::geo_transform::{GeoTransform, PixelTransform};
pub use self::grid_rectangle::{GridRectangle, PixelOffset, PixelSize};
pub use self::pyramid_level::{PyramidLevel, PyramidLevelDefinition};
