use std::num::NonZero;

use ndarray::Ix;

/// Scalar grid coordinate.
pub type Coord = usize;
/// A board dimension, necessarily nonzero.
pub type Dimension = NonZero<Coord>;

/// A cell location `(x, y)` on a board, i.e. `(column, row)`.
/// The top left corner is `Location(0, 0)`.
///
/// The occupancy array is stored row-major; [`Location::as_index`] performs
/// the swap to `(row, col)` order so call sites never juggle axes by hand.
#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
pub struct Location(pub Coord, pub Coord);

impl Location {
    /// The `(row, col)` index of this location in a row-major cell array.
    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.1, self.0)
    }

    /// Offset by `(dx, dy)`, wrapping on underflow.
    ///
    /// A step off the top or left edge wraps to a huge coordinate, which no
    /// bounds check accepts; callers always gate the result on board
    /// containment.
    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }

    /// Whether `other` is exactly one 4-directional step away.
    pub(crate) fn adjacent_to(&self, other: Location) -> bool {
        self.0.abs_diff(other.0) + self.1.abs_diff(other.1) == 1
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.1, value.0)
    }
}
