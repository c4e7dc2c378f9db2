use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use ndarray::Array2;

use crate::arrow::{Arrow, ArrowId, EMPTY};
use crate::cell::CellContent;
use crate::location::{Dimension, Location};
use crate::solver;

/// Outcome of the fly-away query for one arrow.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Flight {
    /// No arrow with the queried id is on the board.
    UnknownArrow,
    /// The head reaches the border unobstructed; the arrow may be removed.
    Clear,
    /// The flight path hits another arrow first, at this cell.
    BlockedAt(Location),
}

/// A puzzle level: the occupancy grid plus the chains it was stamped from.
///
/// The grid holds one [`ArrowId`] per cell, `0` meaning empty. Invariant:
/// every cell of every registered chain maps back to that chain's id, and
/// no two chains claim the same cell. All mutation goes through
/// [`add_arrow`](Board::add_arrow) and [`remove_arrow`](Board::remove_arrow),
/// which keep the two views in lockstep.
///
/// Queries are total: unknown ids and off-board coordinates come back as
/// benign values, because these arrive straight from input translation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    // width, height
    pub(crate) dims: (Dimension, Dimension),
    pub(crate) cells: Array2<ArrowId>,
    pub(crate) arrows: BTreeMap<ArrowId, Arrow>,
}

impl Board {
    /// An empty board with the specified dimensions, in `(width, height)` order.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            dims,
            cells: Array2::from_elem((dims.1.get(), dims.0.get()), EMPTY),
            arrows: BTreeMap::new(),
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.dims.0.get()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.dims.1.get()
    }

    /// Whether `location` lies on the board.
    pub fn contains(&self, location: Location) -> bool {
        location.0 < self.width() && location.1 < self.height()
    }

    /// Register an arrow and stamp its cells into the occupancy grid.
    ///
    /// Insertion is all-or-nothing and deliberately idempotent: if the id is
    /// already present, the id is the empty marker, or any chain cell is
    /// off-board or already occupied, nothing changes and `false` is
    /// returned. A duplicate insert therefore leaves the original arrow
    /// untouched.
    pub fn add_arrow(&mut self, arrow: Arrow) -> bool {
        if arrow.id == EMPTY || self.arrows.contains_key(&arrow.id) {
            return false;
        }
        if !arrow.cells.iter().all(|c| self.contains(*c) && self.cells[c.as_index()] == EMPTY) {
            return false;
        }

        for cell in &arrow.cells {
            self.cells[cell.as_index()] = arrow.id;
        }
        self.arrows.insert(arrow.id, arrow);
        true
    }

    /// Remove an arrow, clearing every one of its cells.
    ///
    /// A no-op returning `false` when the id is unknown. No other arrow is
    /// affected.
    pub fn remove_arrow(&mut self, id: ArrowId) -> bool {
        let Some(arrow) = self.arrows.remove(&id) else {
            return false;
        };

        for cell in &arrow.cells {
            self.cells[cell.as_index()] = EMPTY;
        }
        true
    }

    /// The fly-away query: can this arrow travel from its head, in its
    /// flight direction, off the board without hitting another arrow?
    ///
    /// A head already on the last row or column in its direction is
    /// immediately [`Clear`](Flight::Clear).
    pub fn flight(&self, id: ArrowId) -> Flight {
        match self.arrows.get(&id) {
            None => Flight::UnknownArrow,
            Some(arrow) => match solver::first_blocker(&self.cells, arrow) {
                None => Flight::Clear,
                Some(at) => Flight::BlockedAt(at),
            },
        }
    }

    /// Boolean shorthand for [`flight`](Board::flight); unknown ids are not
    /// flyable.
    pub fn can_fly_away(&self, id: ArrowId) -> bool {
        matches!(self.flight(id), Flight::Clear)
    }

    /// Probe one cell; total over arbitrary coordinates.
    pub fn cell_at(&self, location: Location) -> CellContent {
        if !self.contains(location) {
            return CellContent::OutOfBounds;
        }

        match self.cells[location.as_index()] {
            EMPTY => CellContent::Empty,
            id => CellContent::Arrow(id),
        }
    }

    /// The chain registered under `id`, if any.
    pub fn arrow(&self, id: ArrowId) -> Option<&Arrow> {
        self.arrows.get(&id)
    }

    /// All registered arrows, in id order.
    pub fn arrows(&self) -> impl Iterator<Item = &Arrow> {
        self.arrows.values()
    }

    /// Number of arrows still on the board.
    pub fn arrow_count(&self) -> usize {
        self.arrows.len()
    }

    /// Whether every arrow has been removed.
    pub fn is_cleared(&self) -> bool {
        self.arrows.is_empty()
    }
}

// ids 1..=9 print as digits, then letters, wrapping past 'z'
fn glyph(id: ArrowId) -> char {
    match id {
        EMPTY => '.',
        _ => char::from_digit(((id - 1) % 35 + 1) as u32, 36).unwrap(),
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut out = String::with_capacity(self.height() * (self.width() + 1));

        for row in self.cells.rows() {
            for id in row {
                out.push(glyph(*id));
            }
            out.push('\n');
        }

        write!(f, "{}", out)
    }
}
