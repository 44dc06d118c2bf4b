use bit_set::BitSet;

use crate::puzzle::{PuzzleDefinition, SlotId};
use crate::vocabulary::WordId;

/// The live candidate words for every slot, one bit per `WordId`. This is the only mutable state
/// the solver shares between search frames, so every change made while exploring a branch has to
/// be undone through `snapshot` and `restore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainStore {
    domains: Vec<BitSet>,
}

/// A saved copy of every domain in a `DomainStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    domains: Vec<BitSet>,
}

impl DomainStore {
    /// Give each slot every vocabulary word of exactly its length.
    pub fn initialize(definition: &PuzzleDefinition) -> DomainStore {
        DomainStore {
            domains: definition
                .slots()
                .iter()
                .map(|slot| {
                    let mut domain = BitSet::with_capacity(definition.word_count());
                    domain.extend(definition.words_of_length(slot.length).iter().copied());
                    domain
                })
                .collect(),
        }
    }

    /// Give each slot the whole vocabulary, regardless of length. Callers are expected to run
    /// node consistency before searching.
    pub fn unfiltered(definition: &PuzzleDefinition) -> DomainStore {
        DomainStore {
            domains: definition
                .slots()
                .iter()
                .map(|_| (0..definition.word_count()).collect())
                .collect(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot { domains: self.domains.clone() }
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        debug_assert_eq!(snapshot.domains.len(), self.domains.len());
        self.domains = snapshot.domains;
    }

    pub fn get(&self, slot_id: SlotId) -> &BitSet {
        &self.domains[slot_id]
    }

    /// The remaining options for a slot, in ascending `WordId` order.
    pub fn options(&self, slot_id: SlotId) -> impl Iterator<Item = WordId> + '_ {
        self.domains[slot_id].iter()
    }

    /// The remaining options for a slot as strings.
    pub fn words<'a>(
        &'a self,
        definition: &'a PuzzleDefinition,
        slot_id: SlotId,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.options(slot_id).map(move |word_id| definition.word(word_id).string.as_str())
    }

    pub fn contains(&self, slot_id: SlotId, word_id: WordId) -> bool {
        self.domains[slot_id].contains(word_id)
    }

    /// Remove a word from a slot's domain, returning whether it was there.
    pub fn remove(&mut self, slot_id: SlotId, word_id: WordId) -> bool {
        self.domains[slot_id].remove(word_id)
    }

    /// Collapse a slot's domain to the single word it has been assigned.
    pub fn assign(&mut self, slot_id: SlotId, word_id: WordId) {
        let domain = &mut self.domains[slot_id];
        domain.clear();
        domain.insert(word_id);
    }

    pub fn size(&self, slot_id: SlotId) -> usize {
        self.domains[slot_id].len()
    }

    pub fn slot_count(&self) -> usize {
        self.domains.len()
    }
}
