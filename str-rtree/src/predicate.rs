//! Range query predicates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::rect::{self, Rect};
use crate::rtree::rtree_types::SpatialError;

/// The geometric test applied to leaf entries during a range search.
///
/// Every variant takes the query rectangle first. Internal nodes are always
/// pruned with [`Predicate::Intersects`] regardless of the variant chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Predicate {
    /// Closed-interval overlap.
    Intersects,
    /// The entry lies strictly inside the query.
    Inside,
    /// The query lies strictly inside the entry.
    Contains,
}

impl Predicate {
    /// All predicates, in reporting order.
    pub const ALL: [Predicate; 3] = [Predicate::Intersects, Predicate::Inside, Predicate::Contains];

    /// Evaluates the predicate for `query` against `r`.
    #[inline]
    pub fn evaluate(&self, query: &Rect, r: &Rect) -> bool {
        match self {
            Predicate::Intersects => rect::intersects(query, r),
            Predicate::Inside => rect::inside(query, r),
            Predicate::Contains => rect::contains(query, r),
        }
    }

    /// Lowercase name used in reports and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Predicate::Intersects => "intersects",
            Predicate::Inside => "inside",
            Predicate::Contains => "contains",
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad so `{:10}` lines up in reports
        f.pad(self.name())
    }
}

impl FromStr for Predicate {
    type Err = SpatialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "intersects" => Ok(Predicate::Intersects),
            "inside" => Ok(Predicate::Inside),
            "contains" => Ok(Predicate::Contains),
            _ => Err(SpatialError::UnknownPredicate(s.trim().to_string())),
        }
    }
}
