//! Node consistency and the AC-3 algorithm for establishing arc consistency over a
//! `DomainStore`. For our purposes a set of domains is arc-consistent when every remaining word in
//! every slot has at least one compatible word, letter for letter at the crossing cell, in each
//! slot it crosses.

use std::collections::{HashSet, VecDeque};

use log::{debug, trace};

use crate::domains::DomainStore;
use crate::puzzle::{PuzzleDefinition, SlotId};
use crate::vocabulary::WordId;

/// A directed constraint check: prune the first slot's domain against the second's.
pub type DirectedArc = (SlotId, SlotId);

/// FIFO worklist of arcs still to be revised. An arc that's already waiting isn't queued again.
#[derive(Debug)]
struct ArcQueue {
    queue: VecDeque<DirectedArc>,
    pending: HashSet<DirectedArc>,
}

impl ArcQueue {
    fn with_initial_arcs<Arcs>(arcs: Arcs) -> ArcQueue
    where
        Arcs: IntoIterator<Item = DirectedArc>,
    {
        let mut queue = ArcQueue { queue: VecDeque::new(), pending: HashSet::new() };
        for arc in arcs {
            queue.enqueue(arc);
        }
        queue
    }

    fn pop_front(&mut self) -> Option<DirectedArc> {
        let arc = self.queue.pop_front()?;
        self.pending.remove(&arc);
        Some(arc)
    }

    fn enqueue(&mut self, arc: DirectedArc) {
        if self.pending.insert(arc) {
            self.queue.push_back(arc);
        }
    }
}

/// Remove every word whose length doesn't match its slot. Domains built by
/// `DomainStore::initialize` already satisfy this, so running it again is a no-op.
pub fn enforce_node_consistency(definition: &PuzzleDefinition, domains: &mut DomainStore) {
    for (slot_id, slot) in definition.slots().iter().enumerate() {
        let mismatched: Vec<WordId> = domains
            .options(slot_id)
            .filter(|&word_id| definition.word(word_id).len() != slot.length)
            .collect();

        for word_id in mismatched {
            domains.remove(slot_id, word_id);
        }
    }
}

/// Make `x` arc-consistent with `y` by removing every word in `x`'s domain that has no word in
/// `y`'s domain with the same letter at their crossing. Only `x` is ever pruned. Returns whether
/// anything was removed; slots that don't cross are left alone.
pub fn revise(
    definition: &PuzzleDefinition,
    domains: &mut DomainStore,
    x: SlotId,
    y: SlotId,
) -> bool {
    let (x_cell, y_cell) = match definition.overlap(x, y) {
        Some(overlap) => overlap,
        None => return false,
    };

    // Which letters can `y` still put in the crossing cell?
    let supported: HashSet<char> = domains
        .options(y)
        .filter_map(|word_id| definition.word(word_id).glyph_at(y_cell))
        .collect();

    let unsupported: Vec<WordId> = domains
        .options(x)
        .filter(|&word_id| {
            definition
                .word(word_id)
                .glyph_at(x_cell)
                .map(|glyph| !supported.contains(&glyph))
                .unwrap_or(true)
        })
        .collect();

    for &word_id in &unsupported {
        domains.remove(x, word_id);
    }

    !unsupported.is_empty()
}

/// Run AC-3 starting from the given arcs, or from every ordered pair of distinct slots if `arcs`
/// is `None`. Returns false as soon as any domain is emptied, meaning no assignment can extend the
/// current domains; returns true once no revisable arcs remain.
pub fn ac3(
    definition: &PuzzleDefinition,
    domains: &mut DomainStore,
    arcs: Option<Vec<DirectedArc>>,
) -> bool {
    let slot_count = definition.slot_count();

    let mut queue = match arcs {
        Some(arcs) => ArcQueue::with_initial_arcs(arcs),
        None => ArcQueue::with_initial_arcs((0..slot_count).flat_map(|x| {
            (0..slot_count).filter(move |&y| y != x).map(move |y| (x, y))
        })),
    };

    let mut revisions: usize = 0;

    while let Some((x, y)) = queue.pop_front() {
        if !revise(definition, domains, x, y) {
            continue;
        }
        revisions += 1;

        if domains.size(x) == 0 {
            trace!(target: "ac3", "Domain of slot {} wiped out by slot {}", x, y);
            return false;
        }

        // `x` shrank, so anything constrained by `x` needs another look.
        for z in definition.neighbors(x) {
            if z != y {
                queue.enqueue((z, x));
            }
        }
    }

    debug!(target: "ac3", "Arc consistency reached after {} revisions", revisions);
    true
}

#[cfg(test)]
mod tests {
    use crate::consistency::{ac3, enforce_node_consistency, revise};
    use crate::domains::DomainStore;
    use crate::puzzle::Direction;
    use crate::test_support::{brute_force_solutions, puzzle, word_id, CHAIN, PLUS};

    #[test]
    fn test_node_consistency() {
        let definition = puzzle(
            "
            ____
            _###
            _###
            ",
            &["cat", "tree", "at", "bark", "a", "dig"],
        );
        let mut domains = DomainStore::unfiltered(&definition);

        enforce_node_consistency(&definition, &mut domains);

        for (slot_id, slot) in definition.slots().iter().enumerate() {
            assert!(domains.size(slot_id) > 0);
            for word in domains.words(&definition, slot_id) {
                assert_eq!(word.chars().count(), slot.length, "{} in slot {:?}", word, slot);
            }
        }

        let before = domains.clone();
        enforce_node_consistency(&definition, &mut domains);
        assert_eq!(domains, before, "node consistency is idempotent");
    }

    #[test]
    fn test_revise_is_directed() {
        let definition = puzzle(PLUS, &["cat", "bat", "dog", "cot"]);
        let across = definition.find_slot(1, 0, Direction::Across).unwrap();
        let down = definition.find_slot(0, 1, Direction::Down).unwrap();
        let mut domains = DomainStore::initialize(&definition);

        // Only words with an `a` in the middle are left for the down slot.
        for word_id in domains.options(down).collect::<Vec<_>>() {
            if definition.word(word_id).glyph_at(1) != Some('a') {
                domains.remove(down, word_id);
            }
        }

        assert!(revise(&definition, &mut domains, across, down));
        assert_eq!(domains.words(&definition, across).collect::<Vec<_>>(), vec!["bat", "cat"]);
        assert_eq!(domains.words(&definition, down).collect::<Vec<_>>(), vec!["bat", "cat"]);

        assert!(!revise(&definition, &mut domains, across, down), "already consistent");
        assert!(!revise(&definition, &mut domains, down, across));
    }

    #[test]
    fn test_revise_without_overlap_is_a_noop() {
        let definition = puzzle("___\n###\n___", &["cat", "dog"]);
        let mut domains = DomainStore::initialize(&definition);
        domains.remove(1, 0);

        assert!(!revise(&definition, &mut domains, 0, 1));
        assert_eq!(domains.size(0), 2);
    }

    #[test]
    fn test_ac3_prunes_through_chain() {
        let definition = puzzle(CHAIN, &["cat", "tab", "bat"]);
        let top = definition.find_slot(0, 0, Direction::Across).unwrap();
        let down = definition.find_slot(0, 0, Direction::Down).unwrap();
        let bottom = definition.find_slot(2, 0, Direction::Across).unwrap();
        let mut domains = DomainStore::initialize(&definition);

        assert!(ac3(&definition, &mut domains, None));

        assert_eq!(domains.words(&definition, top).collect::<Vec<_>>(), vec!["bat", "cat", "tab"]);
        assert_eq!(domains.words(&definition, down).collect::<Vec<_>>(), vec!["bat", "cat", "tab"]);
        assert_eq!(domains.words(&definition, bottom).collect::<Vec<_>>(), vec!["bat", "tab"]);
    }

    #[test]
    fn test_ac3_detects_wipeout() {
        let definition = puzzle(PLUS, &["cat", "dot"]);
        let across = definition.find_slot(1, 0, Direction::Across).unwrap();
        let down = definition.find_slot(0, 1, Direction::Down).unwrap();
        let mut domains = DomainStore::initialize(&definition);
        // Across can only be "cat" and down can only be "dot", which disagree in the middle.
        domains.remove(down, 0);
        domains.remove(across, 1);

        assert!(!ac3(&definition, &mut domains, Some(vec![(across, down)])));
        assert_eq!(domains.size(across), 0);
    }

    #[test]
    fn test_ac3_with_restricted_arcs_only_touches_those_slots() {
        let definition = puzzle(CHAIN, &["cat", "tab", "bat", "cab"]);
        let top = definition.find_slot(0, 0, Direction::Across).unwrap();
        let down = definition.find_slot(0, 0, Direction::Down).unwrap();
        let bottom = definition.find_slot(2, 0, Direction::Across).unwrap();
        let mut domains = DomainStore::initialize(&definition);
        domains.assign(top, word_id(&definition, "cat"));

        assert!(ac3(&definition, &mut domains, Some(vec![(down, top)])));

        // The down slot now has to start with `c`, which in turn limits the bottom slot to
        // words starting with `t` or `b`.
        assert_eq!(domains.words(&definition, down).collect::<Vec<_>>(), vec!["cab", "cat"]);
        assert_eq!(domains.words(&definition, bottom).collect::<Vec<_>>(), vec!["bat", "tab"]);
    }

    /// Over every subset of a small word pool, AC-3 only reports failure when there really is no
    /// fill, and never prunes a word that appears in some fill.
    #[test]
    fn test_ac3_is_sound_against_brute_force() {
        let pool = ["cat", "tab", "bat", "act", "tic", "cab", "bit"];

        for template in [CHAIN, PLUS] {
            for mask in 0u32..(1 << pool.len()) {
                let words: Vec<&str> = pool
                    .iter()
                    .enumerate()
                    .filter(|(idx, _)| mask & (1 << idx) != 0)
                    .map(|(_, &word)| word)
                    .collect();
                let definition = puzzle(template, &words);
                let mut domains = DomainStore::initialize(&definition);

                let consistent = ac3(&definition, &mut domains, None);
                let solutions = brute_force_solutions(&definition);

                if !consistent {
                    assert!(solutions.is_empty(), "AC-3 failed on solvable {:?}", words);
                    continue;
                }

                for solution in &solutions {
                    for (slot_id, word_id) in solution.iter() {
                        assert!(
                            domains.contains(slot_id, word_id),
                            "AC-3 pruned {} from slot {} with words {:?}",
                            definition.word(word_id).string,
                            slot_id,
                            words,
                        );
                    }
                }
            }
        }
    }
}
