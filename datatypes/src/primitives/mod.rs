mod bounding_box;
mod coordinate;
mod error;
mod spatial_resolution;

pub use bounding_box::BoundingBox2D;
pub use coordinate::Coordinate2D;
pub use error::PrimitivesError;
pub use spatial_resolution::SpatialResolution;
