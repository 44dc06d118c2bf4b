use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};

use instant::{Duration, Instant};
use log::{debug, trace};
use thiserror::Error;

use crate::consistency::{ac3, enforce_node_consistency, DirectedArc};
use crate::domains::DomainStore;
use crate::puzzle::{Crossing, PuzzleDefinition, SlotId};
use crate::vocabulary::WordId;

/// A partial or complete mapping from slots to the words chosen for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    choices: BTreeMap<SlotId, WordId>,
}

impl Assignment {
    pub fn new() -> Assignment {
        Assignment::default()
    }

    pub fn get(&self, slot_id: SlotId) -> Option<WordId> {
        self.choices.get(&slot_id).copied()
    }

    pub fn contains(&self, slot_id: SlotId) -> bool {
        self.choices.contains_key(&slot_id)
    }

    pub fn insert(&mut self, slot_id: SlotId, word_id: WordId) -> Option<WordId> {
        self.choices.insert(slot_id, word_id)
    }

    pub fn remove(&mut self, slot_id: SlotId) -> Option<WordId> {
        self.choices.remove(&slot_id)
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Choices in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, WordId)> + '_ {
        self.choices.iter().map(|(&slot_id, &word_id)| (slot_id, word_id))
    }

    /// Does every slot in the puzzle have a word?
    pub fn is_complete(&self, definition: &PuzzleDefinition) -> bool {
        self.choices.len() == definition.slot_count()
    }

    /// The word chosen for a slot, as a string.
    pub fn word<'a>(&self, definition: &'a PuzzleDefinition, slot_id: SlotId) -> Option<&'a str> {
        self.get(slot_id).map(|word_id| definition.word(word_id).string.as_str())
    }
}

/// Is the assignment free of conflicts? That means no word is used twice, every word fits its
/// slot's length, and every pair of assigned crossing slots agrees on their shared letter.
pub fn consistent(definition: &PuzzleDefinition, assignment: &Assignment) -> bool {
    let mut used_words: HashSet<WordId> = HashSet::with_capacity(assignment.len());

    for (slot_id, word_id) in assignment.iter() {
        if !used_words.insert(word_id) {
            return false;
        }

        let word = definition.word(word_id);
        if word.len() != definition.slot(slot_id).length {
            return false;
        }

        for crossing in definition.crossings(slot_id) {
            if let Some(other_word_id) = assignment.get(crossing.other_slot_id) {
                let other_word = definition.word(other_word_id);
                if word.glyph_at(crossing.cell) != other_word.glyph_at(crossing.other_slot_cell) {
                    return false;
                }
            }
        }
    }

    true
}

/// Limits on how much work a search may do before giving up. The default is unlimited.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchConfig {
    pub max_states: Option<u64>,
    pub time_limit: Option<Duration>,
}

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub states: u64,
    pub backtracks: u64,
    pub propagation_failures: u64,
    pub duration: Duration,
}

/// A struct representing the results of a fill operation.
#[derive(Debug)]
pub struct FillSuccess {
    pub statistics: Statistics,
    pub assignment: Assignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FillFailure {
    /// Every possibility was explored; the puzzle can't be filled from this vocabulary.
    #[error("No solution.")]
    NoSolution,

    /// The search gave up before finishing, so a fill may still exist.
    #[error("No solution found within budget.")]
    BudgetExhausted,
}

/// Backtracking search over a puzzle, owning the domain store that every search frame shares.
pub struct Solver<'a> {
    definition: &'a PuzzleDefinition,
    domains: DomainStore,
    config: SearchConfig,
    statistics: Statistics,
    start: Instant,
}

impl<'a> Solver<'a> {
    pub fn new(definition: &'a PuzzleDefinition) -> Solver<'a> {
        Solver::with_domains(definition, DomainStore::initialize(definition))
    }

    /// Start from domains built some other way, e.g. `DomainStore::unfiltered`.
    pub fn with_domains(definition: &'a PuzzleDefinition, domains: DomainStore) -> Solver<'a> {
        assert_eq!(
            domains.slot_count(),
            definition.slot_count(),
            "domain store doesn't match puzzle definition"
        );

        Solver {
            definition,
            domains,
            config: SearchConfig::default(),
            statistics: Statistics::default(),
            start: Instant::now(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Solver<'a> {
        self.config = config;
        self
    }

    pub fn domains(&self) -> &DomainStore {
        &self.domains
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Find any complete, consistent assignment, or `None` if there isn't one (or if the
    /// configured budget ran out first; use `find_fill` to tell those apart).
    pub fn solve(&mut self) -> Option<Assignment> {
        self.find_fill().ok().map(|success| success.assignment)
    }

    /// Enforce node and arc consistency, and then search for a fill.
    pub fn find_fill(&mut self) -> Result<FillSuccess, FillFailure> {
        self.start = Instant::now();
        self.statistics = Statistics::default();

        let result = if self.establish_consistency() {
            self.backtrack(Assignment::new())
        } else {
            debug!(target: "search", "Initial arc consistency failed; no fill is possible");
            Err(FillFailure::NoSolution)
        };

        self.statistics.duration = self.start.elapsed();
        debug!(target: "search", "{:?}", self.statistics);

        result.map(|assignment| FillSuccess {
            statistics: self.statistics.clone(),
            assignment,
        })
    }

    /// Prune every domain by word length and then by arc consistency across the whole grid.
    /// Returns false if some slot is left with no options.
    pub fn establish_consistency(&mut self) -> bool {
        enforce_node_consistency(self.definition, &mut self.domains);
        ac3(self.definition, &mut self.domains, None)
    }

    /// Extend the given assignment into a complete one by depth-first search. Words already in
    /// the assignment are committed into their slots' domains and propagated before searching.
    /// The domain store is left exactly as it was on return, whatever the outcome.
    pub fn backtrack(&mut self, mut assignment: Assignment) -> Result<Assignment, FillFailure> {
        if !consistent(self.definition, &assignment) {
            return Err(FillFailure::NoSolution);
        }

        let snapshot = self.domains.snapshot();

        let mut arcs: Vec<DirectedArc> = Vec::new();
        for (slot_id, word_id) in assignment.iter() {
            self.domains.assign(slot_id, word_id);
            arcs.extend(self.definition.neighbors(slot_id).map(|neighbor| (neighbor, slot_id)));
        }

        let result = if ac3(self.definition, &mut self.domains, Some(arcs)) {
            self.search(&mut assignment)
        } else {
            debug!(target: "search", "Starting assignment can't be extended");
            self.statistics.propagation_failures += 1;
            Ok(false)
        };

        self.domains.restore(snapshot);

        if result? {
            Ok(assignment)
        } else {
            Err(FillFailure::NoSolution)
        }
    }

    /// Choose the unassigned slot with the fewest remaining options, preferring slots that cross
    /// more others and then lower slot ids. Returns `None` once every slot is assigned.
    pub fn select_unassigned_variable(&self, assignment: &Assignment) -> Option<SlotId> {
        (0..self.definition.slot_count())
            .filter(|&slot_id| !assignment.contains(slot_id))
            .min_by_key(|&slot_id| {
                (self.domains.size(slot_id), Reverse(self.definition.degree(slot_id)), slot_id)
            })
    }

    /// Return the slot's remaining options ordered by how many options they would eliminate from
    /// unassigned crossing slots, fewest first. A word eliminates every crossing option with a
    /// different letter in the shared cell, and also itself, since words can't repeat. Ties keep
    /// vocabulary order.
    pub fn order_domain_values(&self, slot_id: SlotId, assignment: &Assignment) -> Vec<WordId> {
        let definition = self.definition;

        // For each unassigned crossing slot, count its options by the letter they put in the
        // shared cell.
        let crossing_glyph_counts: Vec<(&Crossing, HashMap<char, usize>, usize)> = definition
            .crossings(slot_id)
            .iter()
            .filter(|crossing| !assignment.contains(crossing.other_slot_id))
            .map(|crossing| {
                let mut counts: HashMap<char, usize> = HashMap::new();
                for word_id in self.domains.options(crossing.other_slot_id) {
                    let word = definition.word(word_id);
                    if let Some(glyph) = word.glyph_at(crossing.other_slot_cell) {
                        *counts.entry(glyph).or_insert(0) += 1;
                    }
                }
                (crossing, counts, self.domains.size(crossing.other_slot_id))
            })
            .collect();

        let mut options: Vec<WordId> = self.domains.options(slot_id).collect();

        options.sort_by_cached_key(|&word_id| {
            let word = definition.word(word_id);

            let eliminated: usize = crossing_glyph_counts
                .iter()
                .map(|(crossing, counts, option_count)| {
                    let glyph = word.glyph_at(crossing.cell);
                    let compatible =
                        glyph.and_then(|glyph| counts.get(&glyph)).copied().unwrap_or(0);
                    let is_own_dupe = compatible > 0
                        && glyph == word.glyph_at(crossing.other_slot_cell)
                        && self.domains.contains(crossing.other_slot_id, word_id);

                    option_count - compatible + usize::from(is_own_dupe)
                })
                .sum();

            (eliminated, word_id)
        });

        options
    }

    pub fn consistent(&self, assignment: &Assignment) -> bool {
        consistent(self.definition, assignment)
    }

    fn check_budget(&self) -> Result<(), FillFailure> {
        let out_of_states = self
            .config
            .max_states
            .map(|max_states| self.statistics.states > max_states)
            .unwrap_or(false);
        let out_of_time = self
            .config
            .time_limit
            .map(|time_limit| self.start.elapsed() >= time_limit)
            .unwrap_or(false);

        if out_of_states || out_of_time {
            Err(FillFailure::BudgetExhausted)
        } else {
            Ok(())
        }
    }

    /// Recursive step of `backtrack`. Returns `Ok(true)` with `assignment` complete, or
    /// `Ok(false)` with `assignment` unchanged if this branch has no fill.
    fn search(&mut self, assignment: &mut Assignment) -> Result<bool, FillFailure> {
        self.statistics.states += 1;
        self.check_budget()?;

        if assignment.is_complete(self.definition) {
            return Ok(consistent(self.definition, assignment));
        }

        let slot_id = match self.select_unassigned_variable(assignment) {
            Some(slot_id) => slot_id,
            None => return Ok(false),
        };

        for word_id in self.order_domain_values(slot_id, assignment) {
            assignment.insert(slot_id, word_id);

            if !consistent(self.definition, assignment) {
                assignment.remove(slot_id);
                continue;
            }

            trace!(
                target: "search",
                "Trying {} in slot {} at depth {}",
                self.definition.word(word_id).string,
                slot_id,
                assignment.len(),
            );

            let snapshot = self.domains.snapshot();
            self.domains.assign(slot_id, word_id);

            let arcs: Vec<DirectedArc> = self
                .definition
                .neighbors(slot_id)
                .map(|neighbor| (neighbor, slot_id))
                .collect();

            let result = if ac3(self.definition, &mut self.domains, Some(arcs)) {
                self.search(assignment)
            } else {
                self.statistics.propagation_failures += 1;
                Ok(false)
            };

            self.domains.restore(snapshot);

            match result {
                Ok(true) => return Ok(true),
                Ok(false) => {
                    assignment.remove(slot_id);
                    self.statistics.backtracks += 1;
                }
                Err(failure) => {
                    assignment.remove(slot_id);
                    return Err(failure);
                }
            }
        }

        Ok(false)
    }
}

/// Search for a fill for the given puzzle within the given budget.
pub fn find_fill(
    definition: &PuzzleDefinition,
    config: SearchConfig,
) -> Result<FillSuccess, FillFailure> {
    Solver::new(definition).with_config(config).find_fill()
}

/// Search for a fill for the given puzzle with no budget.
pub fn solve(definition: &PuzzleDefinition) -> Option<Assignment> {
    Solver::new(definition).solve()
}
