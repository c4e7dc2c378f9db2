use strum::VariantArray;

use crate::location::Location;

/// The four unit step directions on a rectangular board.
///
/// An arrow's flight direction is always one of these; chain adjacency
/// guarantees a well-defined variant for every head/neck pair.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Attempt the step from `location` in the direction specified by `self`
    /// and return the resultant [`Location`].
    ///
    /// Steps off the grid wrap to out-of-bounds coordinates; see
    /// [`Location::offset_by`].
    pub fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::Up => location.offset_by((0, -1)),
            Self::Down => location.offset_by((0, 1)),
            Self::Left => location.offset_by((-1, 0)),
            Self::Right => location.offset_by((1, 0)),
        }
    }

    /// Invert the direction specified by `self`.
    pub fn invert(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Determine the direction from `a` to `b` by attempting every variant.
    ///
    /// Returns [`None`] unless the two locations are exactly one step apart.
    pub fn between(a: Location, b: Location) -> Option<Self> {
        Self::VARIANTS.iter().find(|dir| dir.attempt_from(a) == b).copied()
    }
}
