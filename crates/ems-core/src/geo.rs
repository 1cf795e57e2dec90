//! Planar location type.
//!
//! Locations are `(x, y)` in metres on a local projection of the service
//! region.  EMS regions are small enough (tens of km) that a flat plane is
//! accurate, and straight-line interpolation along a route leg is exact.

/// A point in the service region, metres east (`x`) and north (`y`) of an
/// arbitrary origin.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in metres.
    #[inline]
    pub fn distance_to(self, other: Location) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point a fraction `f` of the way from `self` to `other`.
    ///
    /// `f` is clamped to `[0, 1]`.
    #[inline]
    pub fn lerp(self, other: Location, f: f64) -> Location {
        let f = f.clamp(0.0, 1.0);
        Location {
            x: self.x + (other.x - self.x) * f,
            y: self.y + (other.y - self.y) * f,
        }
    }

    /// `[x, y]` form used by the R-tree spatial index.
    #[inline]
    pub fn as_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}
