//! Fill crossword-style grids from a word list by treating each slot as a variable in a binary
//! constraint satisfaction problem: arc consistency (AC-3) prunes the candidate words, and a
//! backtracking search with MRV/degree and least-constraining-value ordering picks the fill.

pub mod consistency;
pub mod domains;
pub mod error;
pub mod grid;
pub mod puzzle;
pub mod render;
pub mod search;
pub mod vocabulary;

#[cfg(test)]
mod test_support;

/// The expected maximum length for a single slot. Longer slots still work but spill their
/// per-slot buffers onto the heap.
pub const MAX_SLOT_LENGTH: usize = 21;

pub use consistency::{ac3, enforce_node_consistency, revise, DirectedArc};
pub use domains::{DomainStore, Snapshot};
pub use error::{Error, Result};
pub use grid::{load_structure, Grid, GridCoord};
pub use puzzle::{Crossing, Direction, Overlap, PuzzleDefinition, Slot, SlotId};
pub use render::{letter_grid, render_grid, render_image, BLOCK_GLYPH, CELL_BORDER, CELL_SIZE};
pub use search::{
    consistent, find_fill, solve, Assignment, FillFailure, FillSuccess, SearchConfig, Solver,
    Statistics,
};
pub use vocabulary::{load_vocabulary, Word, WordId};
