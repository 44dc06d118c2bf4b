use std::collections::{BTreeSet, HashMap};
use std::fmt::{Debug, Formatter};

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::grid::{Grid, GridCoord};
use crate::vocabulary::{Word, WordId};
use crate::MAX_SLOT_LENGTH;

/// An identifier for a given slot, based on its index in the definition's `slots` field, which
/// also corresponds to an index in the domain store.
pub type SlotId = usize;

/// The pair of cell indices at which two slots cross, ordered to match the pair of slots it was
/// looked up with.
pub type Overlap = (usize, usize);

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

/// One run of cells to be filled with a single word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Slot {
    pub fn new(row: usize, col: usize, direction: Direction, length: usize) -> Slot {
        Slot { row, col, direction, length }
    }

    /// Generate the coords for each cell of this slot.
    pub fn cell_coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (0..self.length).map(move |cell_idx| match self.direction {
            Direction::Across => (self.row, self.col + cell_idx),
            Direction::Down => (self.row + cell_idx, self.col),
        })
    }
}

/// A crossing between one slot and another, referencing the cell within this slot, the other
/// slot's id, and the location of the intersection within the other slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub cell: usize,
    pub other_slot_id: SlotId,
    pub other_slot_cell: usize,
}

/// The static description of a puzzle: its grid, its slots, how they cross, and the vocabulary.
/// Nothing here changes once the definition is built.
pub struct PuzzleDefinition {
    grid: Grid,
    slots: Vec<Slot>,
    crossings: Vec<SmallVec<[Crossing; MAX_SLOT_LENGTH]>>,

    /// One entry per crossing pair, keyed by `(lower id, higher id)` with indices in that order.
    overlaps: HashMap<(SlotId, SlotId), Overlap>,

    words: Vec<Word>,
    word_ids_by_length: HashMap<usize, Vec<WordId>>,
}

impl Debug for PuzzleDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PuzzleDefinition")
            .field("grid", &self.grid)
            .field("slots", &self.slots)
            .field("overlaps", &self.overlaps)
            .field("words", &(["(", &self.words.len().to_string(), " entries)"].join("")))
            .finish()
    }
}

impl PuzzleDefinition {
    /// Derive slots from the grid's fillable runs and build a definition around them. Maximal
    /// horizontal runs of two or more cells become across slots and maximal vertical runs become
    /// down slots. A fillable cell that ends up in no slot at all is rejected.
    pub fn build<I>(grid: &Grid, vocabulary: I) -> Result<PuzzleDefinition>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let run_length = |start: GridCoord, direction: Direction| {
            Slot::new(start.0, start.1, direction, grid.height().max(grid.width()))
                .cell_coords()
                .take_while(|&coord| grid.is_fillable(coord))
                .count()
        };

        let mut slots: Vec<Slot> = vec![];

        for row in 0..grid.height() {
            for col in 0..grid.width() {
                if !grid.is_fillable((row, col)) {
                    continue;
                }

                let starts_across = col == 0 || !grid.is_fillable((row, col - 1));
                let starts_down = row == 0 || !grid.is_fillable((row - 1, col));

                if starts_across {
                    let length = run_length((row, col), Direction::Across);
                    if length > 1 {
                        slots.push(Slot::new(row, col, Direction::Across, length));
                    }
                }
                if starts_down {
                    let length = run_length((row, col), Direction::Down);
                    if length > 1 {
                        slots.push(Slot::new(row, col, Direction::Down, length));
                    }
                }
            }
        }

        // Every fillable cell has to be reachable by some word.
        for row in 0..grid.height() {
            for col in 0..grid.width() {
                let is_orphan = grid.is_fillable((row, col))
                    && !(col > 0 && grid.is_fillable((row, col - 1)))
                    && !grid.is_fillable((row, col + 1))
                    && !(row > 0 && grid.is_fillable((row - 1, col)))
                    && !grid.is_fillable((row + 1, col));

                if is_orphan {
                    return Err(Error::MalformedStructure {
                        row,
                        col,
                        reason: "fillable cell is not part of any slot of length 2 or more"
                            .to_string(),
                    });
                }
            }
        }

        PuzzleDefinition::from_slots(grid.clone(), slots, vocabulary)
    }

    /// Build a definition from an explicit list of slots, computing crossings by comparing the
    /// cells each slot covers.
    pub fn from_slots<I>(grid: Grid, slots: Vec<Slot>, vocabulary: I) -> Result<PuzzleDefinition>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        // Build a map from cell location to the slots involved, which we can then use to
        // calculate crossings.
        let mut slots_by_loc: HashMap<GridCoord, SmallVec<[(SlotId, usize); 2]>> = HashMap::new();

        for (slot_id, slot) in slots.iter().enumerate() {
            if slot.length < 2 {
                return Err(Error::MalformedStructure {
                    row: slot.row,
                    col: slot.col,
                    reason: format!("slot length {} is too short", slot.length),
                });
            }

            for (cell_idx, loc) in slot.cell_coords().enumerate() {
                if !grid.is_fillable(loc) {
                    return Err(Error::MalformedStructure {
                        row: loc.0,
                        col: loc.1,
                        reason: "slot covers a block or leaves the grid".to_string(),
                    });
                }

                let entries = slots_by_loc.entry(loc).or_default();
                if entries.len() == 2 {
                    return Err(Error::MalformedStructure {
                        row: loc.0,
                        col: loc.1,
                        reason: "more than two slots share a cell".to_string(),
                    });
                }
                entries.push((slot_id, cell_idx));
            }
        }

        let mut crossings: Vec<SmallVec<[Crossing; MAX_SLOT_LENGTH]>> =
            slots.iter().map(|_| SmallVec::new()).collect();
        let mut overlaps: HashMap<(SlotId, SlotId), Overlap> = HashMap::new();

        let mut shared_locs: Vec<(&GridCoord, &SmallVec<[(SlotId, usize); 2]>)> =
            slots_by_loc.iter().filter(|(_, entries)| entries.len() == 2).collect();
        shared_locs.sort_by_key(|&(&loc, _)| loc);

        for (&loc, entries) in shared_locs {
            let (first_id, first_cell) = entries[0];
            let (second_id, second_cell) = entries[1];

            if overlaps.insert((first_id, second_id), (first_cell, second_cell)).is_some() {
                return Err(Error::MalformedStructure {
                    row: loc.0,
                    col: loc.1,
                    reason: "two slots share more than one cell".to_string(),
                });
            }

            crossings[first_id].push(Crossing {
                cell: first_cell,
                other_slot_id: second_id,
                other_slot_cell: second_cell,
            });
            crossings[second_id].push(Crossing {
                cell: second_cell,
                other_slot_id: first_id,
                other_slot_cell: first_cell,
            });
        }

        for slot_crossings in &mut crossings {
            slot_crossings.sort_by_key(|crossing| crossing.cell);
        }

        let words: Vec<Word> = vocabulary
            .into_iter()
            .map(|word| word.as_ref().to_string())
            .collect::<BTreeSet<String>>()
            .iter()
            .map(|word| Word::new(word))
            .collect();

        let mut word_ids_by_length: HashMap<usize, Vec<WordId>> = HashMap::new();
        for (word_id, word) in words.iter().enumerate() {
            word_ids_by_length.entry(word.len()).or_default().push(word_id);
        }

        Ok(PuzzleDefinition {
            grid,
            slots,
            crossings,
            overlaps,
            words,
            word_ids_by_length,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, slot_id: SlotId) -> &Slot {
        &self.slots[slot_id]
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Look up the id of the slot starting at the given cell in the given direction.
    pub fn find_slot(&self, row: usize, col: usize, direction: Direction) -> Option<SlotId> {
        self.slots
            .iter()
            .position(|slot| slot.row == row && slot.col == col && slot.direction == direction)
    }

    /// The overlap between `x` and `y`, as `(index in x, index in y)`.
    pub fn overlap(&self, x: SlotId, y: SlotId) -> Option<Overlap> {
        if x <= y {
            self.overlaps.get(&(x, y)).copied()
        } else {
            self.overlaps.get(&(y, x)).map(|&(iy, ix)| (ix, iy))
        }
    }

    pub fn crossings(&self, slot_id: SlotId) -> &[Crossing] {
        &self.crossings[slot_id]
    }

    /// Every other slot that shares a cell with this one.
    pub fn neighbors(&self, slot_id: SlotId) -> impl Iterator<Item = SlotId> + '_ {
        self.crossings[slot_id].iter().map(|crossing| crossing.other_slot_id)
    }

    pub fn degree(&self, slot_id: SlotId) -> usize {
        self.crossings[slot_id].len()
    }

    pub fn word(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn words_of_length(&self, length: usize) -> &[WordId] {
        self.word_ids_by_length.get(&length).map(Vec::as_slice).unwrap_or(&[])
    }
}
