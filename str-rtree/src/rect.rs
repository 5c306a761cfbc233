use serde::{Deserialize, Serialize};

use crate::rtree::rtree_types::{SpatialError, SpatialResult};

/// An axis-aligned rectangle given by its closed extent on each axis.
///
/// `Rect` stores coordinates in `(x_low, x_high, y_low, y_high)` order, which is
/// also the column order of the tab-separated input records. A rectangle built
/// through [`Rect::new`] always satisfies `x_low <= x_high` and `y_low <= y_high`;
/// degenerate rectangles (points and segments) are allowed.
///
/// # Examples
///
/// ```rust
/// use str_rtree::Rect;
///
/// let r = Rect::new(0.0, 2.0, 0.0, 1.0).unwrap();
/// assert_eq!(r.area(), 2.0);
/// assert!(Rect::new(3.0, 1.0, 0.0, 1.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Default, Debug, Serialize, Deserialize)]
pub struct Rect {
    /// Lower X bound
    pub x_low: f64,
    /// Upper X bound
    pub x_high: f64,
    /// Lower Y bound
    pub y_low: f64,
    /// Upper Y bound
    pub y_high: f64,
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:?}, {:?}, {:?}, {:?})",
            self.x_low, self.x_high, self.y_low, self.y_high
        )
    }
}

impl Rect {
    /// Creates a rectangle, rejecting inverted extents and NaN coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidRectangle`] if `x_low > x_high`,
    /// `y_low > y_high`, or any coordinate is NaN.
    pub fn new(x_low: f64, x_high: f64, y_low: f64, y_high: f64) -> SpatialResult<Rect> {
        Rect {
            x_low,
            x_high,
            y_low,
            y_high,
        }
        .validated()
    }

    /// Returns the rectangle unchanged if it satisfies [`Rect::is_valid`].
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidRectangle`] otherwise.
    pub fn validated(self) -> SpatialResult<Rect> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(SpatialError::InvalidRectangle {
                x_low: self.x_low,
                x_high: self.x_high,
                y_low: self.y_low,
                y_high: self.y_high,
            })
        }
    }

    /// The identity element for [`Rect::expand`]: inverted infinite bounds.
    pub(crate) fn empty() -> Rect {
        Rect {
            x_low: f64::INFINITY,
            x_high: f64::NEG_INFINITY,
            y_low: f64::INFINITY,
            y_high: f64::NEG_INFINITY,
        }
    }

    /// Grows this rectangle to cover `other`.
    pub fn expand(&mut self, other: &Rect) {
        self.x_low = self.x_low.min(other.x_low);
        self.x_high = self.x_high.max(other.x_high);
        self.y_low = self.y_low.min(other.y_low);
        self.y_high = self.y_high.max(other.y_high);
    }

    /// Returns the union of this rectangle with another.
    pub fn union(&self, other: &Rect) -> Rect {
        let mut merged = *self;
        merged.expand(other);
        merged
    }

    /// Component-wise min/max fold over a sequence of rectangles.
    ///
    /// Returns `None` for an empty sequence.
    pub fn bounding<'a, I>(rects: I) -> Option<Rect>
    where
        I: IntoIterator<Item = &'a Rect>,
    {
        let mut iter = rects.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(first, |acc, r| acc.union(r)))
    }

    /// Returns the width of the rectangle.
    pub fn width(&self) -> f64 {
        self.x_high - self.x_low
    }

    /// Returns the height of the rectangle.
    pub fn height(&self) -> f64 {
        self.y_high - self.y_low
    }

    /// Returns the area of the rectangle.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Checks the ordering invariant on both axes. NaN coordinates fail it.
    pub fn is_valid(&self) -> bool {
        self.x_low <= self.x_high && self.y_low <= self.y_high
    }

    /// Closed-interval overlap test. Touching boundaries intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        intersects(self, other)
    }
}

/// True unless `query` and `r` are disjoint on either axis.
pub fn intersects(query: &Rect, r: &Rect) -> bool {
    !(query.x_high < r.x_low
        || query.x_low > r.x_high
        || query.y_high < r.y_low
        || query.y_low > r.y_high)
}

/// True when `r` lies inside `query`.
///
/// Each axis is checked with the chain `query.low < r.low <= r.high < query.high`:
/// the bounds of `r` must stay strictly inside the open interval of `query`,
/// while `r` itself may be degenerate on that axis.
pub fn inside(query: &Rect, r: &Rect) -> bool {
    query.x_low < r.x_low
        && r.x_low <= r.x_high
        && r.x_high < query.x_high
        && query.y_low < r.y_low
        && r.y_low <= r.y_high
        && r.y_high < query.y_high
}

/// True when `query` lies inside `r`, i.e. `inside` with the operands swapped.
pub fn contains(query: &Rect, r: &Rect) -> bool {
    inside(r, query)
}
