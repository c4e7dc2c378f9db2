//! The on-wire level shape and its JSON codec.
//!
//! A level travels as `{width, height, arrows: [{id, cells}]}` where
//! `cells` flattens the chain into `(row, col)` pairs in tail-to-head
//! order. Level data in the wild has mixed both axis conventions, so the
//! pair order is pinned here and covered by an explicit round-trip test
//! rather than left to inference.
//!
//! File I/O itself stays with the caller; this module only defines the
//! data shape and the checked conversion to and from [`Board`].

use std::num::NonZero;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::arrow::Arrow;
use crate::board::Board;
use crate::location::Location;

/// Reasons a wire-format level is rejected while loading.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WireError {
    /// The width or height was zero.
    ZeroDimension,
    /// An arrow's flat cell list held an odd number of coordinates.
    OddCellList {
        /// The offending arrow's id.
        id: usize,
    },
    /// An arrow's cells were empty, non-adjacent, repeated, or its id was 0.
    BrokenChain {
        /// The offending arrow's id.
        id: usize,
    },
    /// An arrow cell lay outside the declared dimensions.
    CellOutOfBounds {
        /// The offending arrow's id.
        id: usize,
    },
    /// An arrow reused an id or overlapped an already-loaded arrow.
    Conflicting {
        /// The offending arrow's id.
        id: usize,
    },
}

/// One serialized arrow: its id and the flat `(row, col)` cell list.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ArrowRecord {
    /// The arrow's id.
    pub id: usize,
    /// Flat `[row0, col0, row1, col1, ...]`, tail first.
    pub cells: Vec<usize>,
}

/// The serialized form of a whole level.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LevelFile {
    /// Board width in columns.
    pub width: usize,
    /// Board height in rows.
    pub height: usize,
    /// Every arrow on the board.
    pub arrows: Vec<ArrowRecord>,
}

impl LevelFile {
    /// Capture a board in wire form.
    pub fn from_board(board: &Board) -> Self {
        Self {
            width: board.width(),
            height: board.height(),
            arrows: board
                .arrows()
                .map(|arrow| ArrowRecord {
                    id: arrow.id(),
                    cells: arrow.cells().iter().flat_map(|&Location(x, y)| [y, x]).collect(),
                })
                .collect(),
        }
    }

    /// Rebuild a [`Board`], validating everything a hand-edited or
    /// corrupted file could get wrong.
    pub fn into_board(self) -> Result<Board, WireError> {
        let (Some(width), Some(height)) = (NonZero::new(self.width), NonZero::new(self.height))
        else {
            return Err(WireError::ZeroDimension);
        };
        let mut board = Board::with_dims((width, height));

        for record in self.arrows {
            if record.cells.len() % 2 != 0 {
                return Err(WireError::OddCellList { id: record.id });
            }

            let cells = record
                .cells
                .chunks_exact(2)
                .map(|pair| Location(pair[1], pair[0]))
                .collect_vec();
            if cells.iter().any(|cell| !board.contains(*cell)) {
                return Err(WireError::CellOutOfBounds { id: record.id });
            }

            let arrow =
                Arrow::new(record.id, cells).ok_or(WireError::BrokenChain { id: record.id })?;
            if !board.add_arrow(arrow) {
                return Err(WireError::Conflicting { id: record.id });
            }
        }

        Ok(board)
    }

    /// Pretty-printed JSON, the format level files are stored in.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a level from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
