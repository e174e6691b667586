use serde::{Deserialize, Serialize};

/// An integer offset in pixel space
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelOffset {
    pub x: isize,
    pub y: isize,
}

impl PixelOffset {
    pub fn new(x: isize, y: isize) -> Self {
        Self { x, y }
    }
}

/// An extent in pixels
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: usize,
    pub height: usize,
}

impl PixelSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn is_positive(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// A rectangle on an integer grid, used for pixel windows as well as tile ranges.
///
/// `x`/`y` is the upper left cell, `max_x`/`max_y` are exclusive.
/// A rectangle with a non-positive `width` or `height` is empty, e.g. the intersection of two disjoint rectangles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridRectangle {
    pub x: isize,
    pub y: isize,
    pub width: isize,
    pub height: isize,
}

impl GridRectangle {
    pub fn new(x: isize, y: isize, width: isize, height: isize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from its upper left cell and its exclusive lower right bound
    ///
    /// # Examples
    ///
    /// ```
    /// use rastermosaic_datatypes::raster::GridRectangle;
    ///
    /// let rect = GridRectangle::from_min_max(2, 3, 5, 4);
    ///
    /// assert_eq!(rect, GridRectangle::new(2, 3, 3, 1));
    /// ```
    pub fn from_min_max(min_x: isize, min_y: isize, max_x: isize, max_y: isize) -> Self {
        Self::new(
            min_x,
            min_y,
            max_x.saturating_sub(min_x),
            max_y.saturating_sub(min_y),
        )
    }

    pub fn with_size(offset: PixelOffset, size: PixelSize) -> Self {
        Self::new(
            offset.x,
            offset.y,
            size.width as isize,
            size.height as isize,
        )
    }

    pub fn max_x(&self) -> isize {
        self.x + self.width
    }

    pub fn max_y(&self) -> isize {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Number of cells, zero for empty rectangles
    pub fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width as usize * self.height as usize
        }
    }

    /// The intersection of both rectangles.
    ///
    /// This never fails: for disjoint rectangles the result has a non-positive width or height.
    ///
    /// # Examples
    ///
    /// ```
    /// use rastermosaic_datatypes::raster::GridRectangle;
    ///
    /// let a = GridRectangle::new(0, 0, 4, 4);
    /// let b = GridRectangle::new(6, 0, 4, 4);
    ///
    /// assert!(a.intersection(&b).is_empty());
    /// assert_eq!(a.intersection(&b).width, -2);
    /// ```
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        Self::from_min_max(
            self.x.max(other.x),
            self.y.max(other.y),
            self.max_x().min(other.max_x()),
            self.max_y().min(other.max_y()),
        )
    }

    /// The smallest rectangle containing both, ignoring empty rectangles
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        match (self.is_empty(), other.is_empty()) {
            (true, _) => *other,
            (false, true) => *self,
            (false, false) => Self::from_min_max(
                self.x.min(other.x),
                self.y.min(other.y),
                self.max_x().max(other.max_x()),
                self.max_y().max(other.max_y()),
            ),
        }
    }

    /// Checks whether `other` lies completely inside `self`. Empty rectangles are contained by every rectangle.
    pub fn contains(&self, other: &Self) -> bool {
        other.is_empty()
            || (other.x >= self.x
                && other.y >= self.y
                && other.max_x() <= self.max_x()
                && other.max_y() <= self.max_y())
    }

    pub fn contains_cell(&self, x: isize, y: isize) -> bool {
        crate::util::ranges::value_in_range(x, self.x, self.max_x())
            && crate::util::ranges::value_in_range(y, self.y, self.max_y())
    }

    #[must_use]
    pub fn translate(&self, dx: isize, dy: isize) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Multiplies position and size, e.g. to convert a tile range into pixel units
    #[must_use]
    pub fn scale(&self, sx: isize, sy: isize) -> Self {
        Self::new(self.x * sx, self.y * sy, self.width * sx, self.height * sy)
    }

    pub fn offset(&self) -> PixelOffset {
        PixelOffset::new(self.x, self.y)
    }

    /// The size of the rectangle, negative extents are clamped to zero
    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width.max(0) as usize, self.height.max(0) as usize)
    }
}
