//! Fixtures shared by the unit tests.

use crate::grid::load_structure;
use crate::puzzle::PuzzleDefinition;
use crate::search::{consistent, Assignment};
use crate::vocabulary::WordId;

/// Two length-3 slots crossing in their middle cells.
pub(crate) const PLUS: &str = "
    #_#
    ___
    #_#
    ";

/// Across, down, across: the down slot crosses the first letter of the top slot and the first
/// letter of the bottom slot.
pub(crate) const CHAIN: &str = "
    ___
    _##
    ___
    ";

/// Three length-3 slots that don't cross at all.
pub(crate) const STRIPES: &str = "
    ___
    ###
    ___
    ###
    ___
    ";

pub(crate) fn puzzle(template: &str, words: &[&str]) -> PuzzleDefinition {
    let grid = load_structure(template).expect("test structure should parse");
    PuzzleDefinition::build(&grid, words).expect("test structure should have valid slots")
}

pub(crate) fn word_id(definition: &PuzzleDefinition, word: &str) -> WordId {
    (0..definition.word_count())
        .find(|&word_id| definition.word(word_id).string == word)
        .unwrap_or_else(|| panic!("{} is not in the vocabulary", word))
}

/// Enumerate every complete, consistent assignment by trying every word of the right length in
/// every slot.
pub(crate) fn brute_force_solutions(definition: &PuzzleDefinition) -> Vec<Assignment> {
    fn extend(
        definition: &PuzzleDefinition,
        slot_id: usize,
        assignment: &mut Assignment,
        solutions: &mut Vec<Assignment>,
    ) {
        if slot_id == definition.slot_count() {
            solutions.push(assignment.clone());
            return;
        }

        for &word_id in definition.words_of_length(definition.slot(slot_id).length) {
            assignment.insert(slot_id, word_id);
            if consistent(definition, assignment) {
                extend(definition, slot_id + 1, assignment, solutions);
            }
            assignment.remove(slot_id);
        }
    }

    let mut solutions = vec![];
    extend(definition, 0, &mut Assignment::new(), &mut solutions);
    solutions
}
