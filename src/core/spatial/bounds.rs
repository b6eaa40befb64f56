//=========================================================================
// Geometry Primitives
//=========================================================================
//
// Integer points and axis-aligned rectangles used for hit-testing.
//
// Containment is half-open: a rectangle at (0, 0) with size 10x10
// contains x in 0..10 and y in 0..10. Rectangles are small Copy values,
// so the owning element and every index node keep their own copy.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Point ===============================================================

/// Integer position in window space (pixels, top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

//=== BoundsError =========================================================

/// Rejected rectangle: a degenerate region indicates a layout bug upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoundsError {
    #[error("bounds width must be positive, got {0}")]
    NonPositiveWidth(i32),

    #[error("bounds height must be positive, got {0}")]
    NonPositiveHeight(i32),

    #[error("bounds edge overflows i32 (origin {origin}, extent {extent})")]
    EdgeOverflow { origin: i32, extent: i32 },
}

//=== Bounds ==============================================================

/// Immutable axis-aligned rectangle (origin + size).
///
/// Public construction goes through [`Bounds::new`], which guarantees a
/// positive area and representable right/bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl Bounds {
    /// Creates a rectangle, rejecting zero or negative sizes and edges
    /// past `i32::MAX`.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Result<Self, BoundsError> {
        if width <= 0 {
            return Err(BoundsError::NonPositiveWidth(width));
        }
        if height <= 0 {
            return Err(BoundsError::NonPositiveHeight(height));
        }
        if x.checked_add(width).is_none() {
            return Err(BoundsError::EdgeOverflow { origin: x, extent: width });
        }
        if y.checked_add(height).is_none() {
            return Err(BoundsError::EdgeOverflow { origin: y, extent: height });
        }
        Ok(Self { x, y, width, height })
    }

    /// Creates a rectangle without validation.
    ///
    /// Quadrant splitting of 1-pixel-wide nodes legitimately produces empty
    /// regions; those never intersect anything.
    pub(crate) const fn from_parts(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    //--- Accessors --------------------------------------------------------

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    //--- Queries ----------------------------------------------------------

    /// Half-open containment test.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Returns `true` if the two rectangles share a non-empty area.
    pub fn intersects(&self, other: &Bounds) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x.max(other.x) < self.right().min(other.right())
            && self.y.max(other.y) < self.bottom().min(other.bottom())
    }

    /// Splits into four non-overlapping quadrants covering `self`.
    ///
    /// Order: top-left, top-right, bottom-left, bottom-right. Odd sizes
    /// give the extra unit to the right column / bottom row.
    pub(crate) fn quadrants(&self) -> [Bounds; 4] {
        let left_w = self.width / 2;
        let right_w = self.width - left_w;
        let top_h = self.height / 2;
        let bottom_h = self.height - top_h;

        let mid_x = self.x + left_w;
        let mid_y = self.y + top_h;

        [
            Bounds::from_parts(self.x, self.y, left_w, top_h),
            Bounds::from_parts(mid_x, self.y, right_w, top_h),
            Bounds::from_parts(self.x, mid_y, left_w, bottom_h),
            Bounds::from_parts(mid_x, mid_y, right_w, bottom_h),
        ]
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
