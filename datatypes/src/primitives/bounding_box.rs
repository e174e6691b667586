use super::Coordinate2D;
use crate::error;
use crate::util::Result;
use crate::util::ranges::value_in_range_inclusive;
use serde::{Deserialize, Serialize};
use snafu::ensure;

#[derive(Copy, Clone, Serialize, Deserialize, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
#[repr(C)]
/// An axis-aligned rectangle in world coordinates.
/// Note: may degenerate to a line or a point!
pub struct BoundingBox2D {
    lower_left_coordinate: Coordinate2D,
    upper_right_coordinate: Coordinate2D,
}

impl BoundingBox2D {
    /// Creates a new bounding box
    ///
    /// # Examples
    ///
    /// ```
    /// use rastermosaic_datatypes::primitives::{Coordinate2D, BoundingBox2D};
    ///
    /// let ll = Coordinate2D::new(1.0, 1.0);
    /// let ur = Coordinate2D::new(2.0, 2.0);
    /// let bbox = BoundingBox2D::new(ll, ur).unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// This constructor fails if the coordinate's values are not in order
    ///
    pub fn new(
        lower_left_coordinate: Coordinate2D,
        upper_right_coordinate: Coordinate2D,
    ) -> Result<Self> {
        ensure!(
            lower_left_coordinate.x <= upper_right_coordinate.x
                && lower_left_coordinate.y <= upper_right_coordinate.y,
            error::InvalidBoundingBox {
                lower_left_coordinate,
                upper_right_coordinate
            }
        );
        Ok(Self {
            lower_left_coordinate,
            upper_right_coordinate,
        })
    }

    pub fn new_unchecked(
        lower_left_coordinate: Coordinate2D,
        upper_right_coordinate: Coordinate2D,
    ) -> Self {
        Self {
            lower_left_coordinate,
            upper_right_coordinate,
        }
    }

    /// Creates a new bounding box with `upper_left` and `lower_right` coordinates
    /// This is usually used with raster data and matches the pixel space orientation
    ///
    /// # Examples
    ///
    /// ```
    /// use rastermosaic_datatypes::primitives::{Coordinate2D, BoundingBox2D};
    ///
    /// let ul = Coordinate2D::new(1.0, 2.0);
    /// let lr = Coordinate2D::new(2.0, 1.0);
    /// let bbox = BoundingBox2D::new_upper_left_lower_right(ul, lr).unwrap();
    ///
    /// assert_eq!(bbox.lower_left(), (1.0, 1.0).into());
    /// ```
    ///
    pub fn new_upper_left_lower_right(
        upper_left_coordinate: Coordinate2D,
        lower_right_coordinate: Coordinate2D,
    ) -> Result<Self> {
        let lower_left_coordinate = (upper_left_coordinate.x, lower_right_coordinate.y).into();
        let upper_right_coordinate = (lower_right_coordinate.x, upper_left_coordinate.y).into();
        BoundingBox2D::new(lower_left_coordinate, upper_right_coordinate)
    }

    pub fn new_upper_left_lower_right_unchecked(
        upper_left_coordinate: Coordinate2D,
        lower_right_coordinate: Coordinate2D,
    ) -> Self {
        let lower_left_coordinate = (upper_left_coordinate.x, lower_right_coordinate.y).into();
        let upper_right_coordinate = (lower_right_coordinate.x, upper_left_coordinate.y).into();
        BoundingBox2D::new_unchecked(lower_left_coordinate, upper_right_coordinate)
    }

    pub fn lower_left(&self) -> Coordinate2D {
        self.lower_left_coordinate
    }

    pub fn upper_right(&self) -> Coordinate2D {
        self.upper_right_coordinate
    }

    pub fn upper_left(&self) -> Coordinate2D {
        (self.lower_left_coordinate.x, self.upper_right_coordinate.y).into()
    }

    pub fn lower_right(&self) -> Coordinate2D {
        (self.upper_right_coordinate.x, self.lower_left_coordinate.y).into()
    }

    /// Returns the width of the bounding box
    pub fn size_x(&self) -> f64 {
        self.upper_right_coordinate.x - self.lower_left_coordinate.x
    }

    /// Returns the height of the bounding box
    pub fn size_y(&self) -> f64 {
        self.upper_right_coordinate.y - self.lower_left_coordinate.y
    }

    /// Checks if a coordinate is located inside the bounding box (edges included)
    pub fn contains_coordinate(&self, coordinate: &Coordinate2D) -> bool {
        value_in_range_inclusive(
            coordinate.x,
            self.lower_left_coordinate.x,
            self.upper_right_coordinate.x,
        ) && value_in_range_inclusive(
            coordinate.y,
            self.lower_left_coordinate.y,
            self.upper_right_coordinate.y,
        )
    }

    /// Checks if the bounding box contains another bounding box
    ///
    /// # Examples
    ///
    /// ```
    /// use rastermosaic_datatypes::primitives::{Coordinate2D, BoundingBox2D};
    ///
    /// let bbox = BoundingBox2D::new((1.0, 1.0).into(), (4.0, 4.0).into()).unwrap();
    /// let bbox_in = BoundingBox2D::new((2.0, 2.0).into(), (3.0, 3.0).into()).unwrap();
    ///
    /// assert!(bbox.contains_bbox(&bbox_in));
    /// assert!(!bbox_in.contains_bbox(&bbox));
    /// ```
    ///
    pub fn contains_bbox(&self, other_bbox: &Self) -> bool {
        self.contains_coordinate(&other_bbox.lower_left_coordinate)
            && self.contains_coordinate(&other_bbox.upper_right_coordinate)
    }

    fn overlap_x(&self, other_bbox: &Self) -> bool {
        value_in_range_inclusive(
            self.lower_left().x,
            other_bbox.lower_left().x,
            other_bbox.upper_right().x,
        ) || value_in_range_inclusive(
            other_bbox.lower_left().x,
            self.lower_left().x,
            self.upper_right().x,
        )
    }

    fn overlap_y(&self, other_bbox: &Self) -> bool {
        value_in_range_inclusive(
            self.lower_left().y,
            other_bbox.lower_left().y,
            other_bbox.upper_right().y,
        ) || value_in_range_inclusive(
            other_bbox.lower_left().y,
            self.lower_left().y,
            self.upper_right().y,
        )
    }

    /// Checks if two bounding boxes intersect. A shared edge or corner counts as an intersection.
    ///
    /// # Examples
    ///
    /// ```
    /// use rastermosaic_datatypes::primitives::{Coordinate2D, BoundingBox2D};
    ///
    /// let bbox = BoundingBox2D::new((1.0, 1.0).into(), (4.0, 4.0).into()).unwrap();
    /// let touching = BoundingBox2D::new((4.0, 2.0).into(), (5.0, 5.0).into()).unwrap();
    /// let disjoint = BoundingBox2D::new((4.5, 2.0).into(), (5.0, 5.0).into()).unwrap();
    ///
    /// assert!(bbox.intersects_bbox(&touching));
    /// assert!(!bbox.intersects_bbox(&disjoint));
    /// ```
    ///
    pub fn intersects_bbox(&self, other_bbox: &Self) -> bool {
        self == other_bbox || (self.overlap_x(other_bbox) && self.overlap_y(other_bbox))
    }

    /// Returns `Some(intersection)` with `other_bbox` or `None` if they do not intersect
    pub fn intersection(&self, other_bbox: &Self) -> Option<Self> {
        if !self.intersects_bbox(other_bbox) {
            return None;
        }

        Some(BoundingBox2D::new_unchecked(
            self.lower_left_coordinate
                .max_elements(other_bbox.lower_left_coordinate),
            self.upper_right_coordinate
                .min_elements(other_bbox.upper_right_coordinate),
        ))
    }

    /// Returns the smallest bounding box containing both boxes
    #[must_use]
    pub fn union(&self, other_bbox: &Self) -> Self {
        BoundingBox2D::new_unchecked(
            self.lower_left_coordinate
                .min_elements(other_bbox.lower_left_coordinate),
            self.upper_right_coordinate
                .max_elements(other_bbox.upper_right_coordinate),
        )
    }

    /// Moves the bounding box by `offset` without changing its size
    #[must_use]
    pub fn translate(&self, offset: Coordinate2D) -> Self {
        BoundingBox2D::new_unchecked(
            self.lower_left_coordinate + offset,
            self.upper_right_coordinate + offset,
        )
    }

    pub fn extend_with_coord(&mut self, coord: Coordinate2D) {
        self.lower_left_coordinate = self.lower_left_coordinate.min_elements(coord);
        self.upper_right_coordinate = self.upper_right_coordinate.max_elements(coord);
    }

    pub fn from_coord_iter<I: IntoIterator<Item = Coordinate2D>>(iter: I) -> Option<Self> {
        let mut iterator = iter.into_iter();

        let first = iterator.next().map(|c| BoundingBox2D::new_unchecked(c, c));

        first.map(|mut f| {
            for c in iterator {
                f.extend_with_coord(c);
            }
            f
        })
    }
}
