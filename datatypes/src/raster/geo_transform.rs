use crate::primitives::{BoundingBox2D, Coordinate2D};
use crate::util::helpers::{snapped_ceil, snapped_floor};
use serde::{Deserialize, Serialize};

use super::GridRectangle;

/// A mapping between world coordinates and continuous pixel coordinates.
///
/// Pixel coordinates address pixel corners: pixel `(i, j)` spans `[i, i + 1) x [j, j + 1)`.
pub trait PixelTransform {
    fn world_to_pixel(&self, coordinate: Coordinate2D) -> Coordinate2D;

    fn pixel_to_world(&self, pixel: Coordinate2D) -> Coordinate2D;

    /// The smallest pixel window covering `bounding_box`.
    ///
    /// Pixel coordinates within a small tolerance of an integer are snapped before rounding outwards.
    fn world_to_pixel_rectangle(&self, bounding_box: &BoundingBox2D) -> GridRectangle {
        let a = self.world_to_pixel(bounding_box.upper_left());
        let b = self.world_to_pixel(bounding_box.lower_right());

        let min = a.min_elements(b);
        let max = a.max_elements(b);

        GridRectangle::from_min_max(
            snapped_floor(min.x),
            snapped_floor(min.y),
            snapped_ceil(max.x),
            snapped_ceil(max.y),
        )
    }

    /// The world extent of a pixel window. Empty windows collapse to a degenerate box.
    fn pixel_rectangle_to_world(&self, rectangle: &GridRectangle) -> BoundingBox2D {
        let a = self.pixel_to_world(Coordinate2D::new(rectangle.x as f64, rectangle.y as f64));
        let b = self.pixel_to_world(Coordinate2D::new(
            (rectangle.x + rectangle.width.max(0)) as f64,
            (rectangle.y + rectangle.height.max(0)) as f64,
        ));

        BoundingBox2D::new_unchecked(a.min_elements(b), a.max_elements(b))
    }
}

/// An axis-aligned affine transformation, anchored at the upper left corner of pixel `(0, 0)`.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoTransform {
    pub origin_coordinate: Coordinate2D,
    pub x_pixel_size: f64,
    pub y_pixel_size: f64,
}

impl GeoTransform {
    /// Generates a new `GeoTransform`
    ///
    /// # Examples
    ///
    /// ```
    /// use rastermosaic_datatypes::raster::GeoTransform;
    ///
    /// let geo_transform = GeoTransform::new((0.0, 0.0).into(), 1.0, -1.0);
    /// ```
    ///
    pub fn new(origin_coordinate: Coordinate2D, x_pixel_size: f64, y_pixel_size: f64) -> Self {
        Self {
            origin_coordinate,
            x_pixel_size,
            y_pixel_size,
        }
    }

    /// A north-up transform whose pixel `(0, 0)` starts at the upper left corner of `bounding_box`
    pub fn north_up(bounding_box: &BoundingBox2D, x_pixel_size: f64, y_pixel_size: f64) -> Self {
        Self::new(bounding_box.upper_left(), x_pixel_size, -y_pixel_size.abs())
    }

    /// Transforms a pixel corner coordinate (column, row) into a world coordinate
    ///
    /// # Examples
    ///
    /// ```
    /// use rastermosaic_datatypes::raster::{GeoTransform, PixelTransform};
    ///
    /// let geo_transform = GeoTransform::new((5.0, 5.0).into(), 1.0, -1.0);
    /// assert_eq!(geo_transform.pixel_to_world((2.0, 2.0).into()), (7.0, 3.0).into());
    /// ```
    ///
    pub fn grid_to_coordinate(&self, column: f64, row: f64) -> Coordinate2D {
        Coordinate2D::new(
            self.origin_coordinate.x + column * self.x_pixel_size,
            self.origin_coordinate.y + row * self.y_pixel_size,
        )
    }

    pub fn coordinate_to_grid(&self, coordinate: Coordinate2D) -> (f64, f64) {
        (
            (coordinate.x - self.origin_coordinate.x) / self.x_pixel_size,
            (coordinate.y - self.origin_coordinate.y) / self.y_pixel_size,
        )
    }
}

impl PixelTransform for GeoTransform {
    fn world_to_pixel(&self, coordinate: Coordinate2D) -> Coordinate2D {
        self.coordinate_to_grid(coordinate).into()
    }

    fn pixel_to_world(&self, pixel: Coordinate2D) -> Coordinate2D {
        self.grid_to_coordinate(pixel.x, pixel.y)
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        GeoTransform::new(Coordinate2D::new(0.0, 0.0), 1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::float_cmp)]
    fn geo_transform_new() {
        let geo_transform = GeoTransform::new((0.0, 1.0).into(), 2.0, -3.0);
        assert_eq!(geo_transform.origin_coordinate.x, 0.0);
        assert_eq!(geo_transform.origin_coordinate.y, 1.0);
        assert_eq!(geo_transform.x_pixel_size, 2.0);
        assert_eq!(geo_transform.y_pixel_size, -3.0);
    }

    #[test]
    fn north_up() {
        let bbox = BoundingBox2D::new((10.0, 20.0).into(), (30.0, 40.0).into()).unwrap();
        let geo_transform = GeoTransform::north_up(&bbox, 2.0, 2.0);

        assert_eq!(geo_transform, GeoTransform::new((10.0, 40.0).into(), 2.0, -2.0));
    }

    #[test]
    fn pixel_to_world() {
        let geo_transform = GeoTransform::new((5.0, 5.0).into(), 1.0, -1.0);
        assert_eq!(
            geo_transform.pixel_to_world((0.0, 0.0).into()),
            (5.0, 5.0).into()
        );
        assert_eq!(
            geo_transform.pixel_to_world((1.0, 1.0).into()),
            (6.0, 4.0).into()
        );
    }

    #[test]
    fn world_to_pixel() {
        let geo_transform = GeoTransform::new((5.0, 5.0).into(), 1.0, -1.0);
        assert_eq!(
            geo_transform.world_to_pixel((5.0, 5.0).into()),
            (0.0, 0.0).into()
        );
        assert_eq!(
            geo_transform.world_to_pixel((7.5, 3.0).into()),
            (2.5, 2.0).into()
        );
    }

    #[test]
    fn world_to_pixel_rectangle_rounds_outwards() {
        let geo_transform = GeoTransform::new((0.0, 100.0).into(), 10.0, -10.0);
        let bbox = BoundingBox2D::new((15.0, 55.0).into(), (35.0, 80.0).into()).unwrap();

        assert_eq!(
            geo_transform.world_to_pixel_rectangle(&bbox),
            GridRectangle::from_min_max(1, 2, 4, 5)
        );
    }

    #[test]
    fn world_to_pixel_rectangle_snaps_noise() {
        let geo_transform = GeoTransform::new((0.0, 1.0).into(), 0.1, -0.1);
        // 0.3 / 0.1 is not exactly 3 in floating point arithmetic
        let bbox = BoundingBox2D::new((0.3, 0.4).into(), (0.7, 0.7).into()).unwrap();

        assert_eq!(
            geo_transform.world_to_pixel_rectangle(&bbox),
            GridRectangle::from_min_max(3, 3, 7, 6)
        );
    }

    #[test]
    fn pixel_rectangle_round_trip() {
        let geo_transform = GeoTransform::new((-180.0, 90.0).into(), 0.5, -0.5);
        let window = GridRectangle::new(12, 7, 30, 11);

        let bbox = geo_transform.pixel_rectangle_to_world(&window);
        assert_eq!(
            bbox,
            BoundingBox2D::new((-174.0, 81.0).into(), (-159.0, 86.5).into()).unwrap()
        );
        assert_eq!(geo_transform.world_to_pixel_rectangle(&bbox), window);
    }

    #[test]
    fn world_to_pixel_rectangle_of_huge_bounds() {
        use crate::util::helpers::MAX_PIXEL_COORDINATE;

        let geo_transform = GeoTransform::new((0.0, 1024.0).into(), 1.0, -1.0);
        let limit = MAX_PIXEL_COORDINATE as isize;

        for bbox in [
            BoundingBox2D::new((-1e20, -1e20).into(), (1e20, 1e20).into()).unwrap(),
            BoundingBox2D::new_unchecked(
                (f64::NEG_INFINITY, f64::NEG_INFINITY).into(),
                (f64::INFINITY, f64::INFINITY).into(),
            ),
        ] {
            assert_eq!(
                geo_transform.world_to_pixel_rectangle(&bbox),
                GridRectangle::from_min_max(-limit, -limit, limit, limit)
            );
        }
    }
}
