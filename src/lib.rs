#![warn(missing_docs)]

//! # `flyaway`
//!
//! The level model and procedural generator for arrow ("snake flies away") grid puzzles.
//! A rectangular board holds multi-cell arrows; tapping an arrow removes it only if,
//! traveling straight in the direction implied by its last two cells, it reaches the
//! border without hitting another arrow. A level is won when every arrow has flown.
//!
//! Query and mutate a level through [`Board`]; produce new, guaranteed-clearable
//! levels with [`Generator`] from a [`GeneratorConfig`](generator::GeneratorConfig);
//! check or replay clearability with [`solver`]; exchange levels with the outside
//! world through the [`wire`] module's JSON shape.
//! Rendering, animation, and input translation are the caller's business: everything
//! here is plain data plus total queries, safe to drive from untrusted taps.
//!
//! # Internals
//! Solvability ("some removal order clears the whole board") is decided by a bounded
//! fixed-point simulation on a disposable grid copy; see [`solver`]. The generator
//! leans on that check after every tentative mutation: it grows randomized walks over
//! the empty cells, extends arrows into leftover gaps, and falls back to reversing or
//! evicting arrows when a board gets stuck, so the result it hands back is solvable
//! whenever the (capped, best-effort) search manages it, and says so either way.
//! A single seeded ChaCha stream drives all of it, making generation reproducible.

pub use arrow::{Arrow, ArrowId};
pub use board::{Board, Flight};
pub use cell::CellContent;
pub use generator::{Generated, Generator, GeneratorConfig};
pub use location::{Coord, Dimension, Location};

pub(crate) mod arrow;
pub(crate) mod board;
pub(crate) mod cell;
pub mod direction;
pub mod generator;
pub(crate) mod location;
pub mod solver;
mod tests;
pub mod wire;
