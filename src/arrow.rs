use itertools::Itertools;

use crate::direction::Direction;
use crate::location::Location;

/// Identifier of one arrow on a board. Valid ids start at 1.
pub type ArrowId = usize;

/// The occupancy value of a cell no arrow covers.
pub(crate) const EMPTY: ArrowId = 0;

/// Which end of a chain an operation applies to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum End {
    Head,
    Tail,
}

/// One puzzle piece: an ordered chain of grid cells, tail first, head last.
///
/// The head is the flight origin; the flight direction points from the cell
/// before the head toward the head. Consecutive cells are 4-adjacent and no
/// cell repeats, so the direction is always a unit axis step.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Arrow {
    pub(crate) id: ArrowId,
    pub(crate) cells: Vec<Location>,
}

impl Arrow {
    /// Build an arrow from a tail-to-head cell list, checking the chain
    /// invariants: nonzero id, at least one cell, consecutive cells
    /// 4-adjacent, no repeated cell.
    ///
    /// Returns [`None`] when any invariant fails; loaders use this to reject
    /// malformed input without panicking.
    pub fn new(id: ArrowId, cells: Vec<Location>) -> Option<Self> {
        if id == EMPTY || cells.is_empty() {
            return None;
        }
        if cells.iter().tuple_windows().any(|(a, b)| !a.adjacent_to(*b)) {
            return None;
        }
        if !cells.iter().all_unique() {
            return None;
        }

        Some(Self { id, cells })
    }

    /// This arrow's id.
    pub fn id(&self) -> ArrowId {
        self.id
    }

    /// The chain's cells, tail first, head last.
    pub fn cells(&self) -> &[Location] {
        &self.cells
    }

    /// Number of cells in the chain.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the chain has no cells. Never true for a constructed arrow.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The head: the last cell, where flight starts.
    pub fn head(&self) -> Location {
        self.cells[self.cells.len() - 1]
    }

    /// The tail: the first cell.
    pub fn tail(&self) -> Location {
        self.cells[0]
    }

    /// Flight direction, head minus neck.
    ///
    /// A single-cell chain has no neck; fall back to [`Direction::Right`]
    /// so the query stays total.
    pub fn direction(&self) -> Direction {
        if self.cells.len() < 2 {
            return Direction::Right;
        }

        let head = self.cells[self.cells.len() - 1];
        let neck = self.cells[self.cells.len() - 2];
        Direction::between(neck, head).unwrap_or(Direction::Right)
    }

    /// Whether every cell shares a row or every cell shares a column.
    pub fn is_straight(&self) -> bool {
        self.cells.iter().map(|c| c.0).all_equal() || self.cells.iter().map(|c| c.1).all_equal()
    }

    /// Swap tail and head roles, which also flips the flight direction.
    pub(crate) fn reverse(&mut self) {
        self.cells.reverse();
    }

    /// Grow the chain by one cell at the given end.
    pub(crate) fn extend(&mut self, end: End, cell: Location) {
        match end {
            End::Head => self.cells.push(cell),
            End::Tail => self.cells.insert(0, cell),
        }
    }

    /// Undo a single [`extend`](Self::extend) at the same end.
    pub(crate) fn retract(&mut self, end: End) {
        match end {
            End::Head => {
                self.cells.pop();
            }
            End::Tail => {
                self.cells.remove(0);
            }
        }
    }
}
