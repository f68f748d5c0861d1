use std::fmt::Debug;
use std::fmt::Formatter;
use std::ops::BitAnd;
use std::ops::BitAndAssign;
use std::ops::BitOr;
use std::ops::BitOrAssign;

use super::Relation;

/// A relation over arbitrarily many base relations, backed by a growable word
/// vector. The slow but always-applicable fallback, and the interchange format
/// between the fixed widths.
///
/// Invariant: the word vector never ends in a zero word, so derived equality
/// and hashing are value equality.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct DynamicRelation {
    words: Vec<u64>,
}

impl DynamicRelation {
    pub(crate) fn from_words(words: &[u64]) -> DynamicRelation {
        let mut relation = DynamicRelation {
            words: words.to_vec(),
        };
        relation.trim();
        relation
    }

    pub(crate) fn words(&self) -> std::slice::Iter<'_, u64> {
        self.words.iter()
    }

    /// One past the position of the highest set bit; 0 for the empty relation.
    pub(crate) fn significant_bits(&self) -> usize {
        match self.words.last() {
            None => 0,
            Some(word) => self.words.len() * 64 - word.leading_zeros() as usize,
        }
    }

    fn trim(&mut self) {
        while self.words.last() == Some(&0) {
            let _ = self.words.pop();
        }
    }
}

impl Relation for DynamicRelation {
    const MAX_SIZE: usize = usize::MAX;

    fn none() -> DynamicRelation {
        DynamicRelation::default()
    }

    fn universal(num_base_relations: usize) -> DynamicRelation {
        let mut words = vec![u64::MAX; num_base_relations / 64];
        let remaining = num_base_relations % 64;
        if remaining > 0 {
            words.push((1u64 << remaining) - 1);
        }
        DynamicRelation { words }
    }

    fn from_bits(bits: u64) -> DynamicRelation {
        DynamicRelation::from_words(&[bits])
    }

    fn lowest_word(&self) -> u64 {
        self.words.first().copied().unwrap_or(0)
    }

    fn set(&mut self, base_relation: usize) {
        let word_index = base_relation / 64;
        if word_index >= self.words.len() {
            self.words.resize(word_index + 1, 0);
        }
        self.words[word_index] |= 1u64 << (base_relation % 64);
    }

    fn unset(&mut self, base_relation: usize) {
        let word_index = base_relation / 64;
        if word_index < self.words.len() {
            self.words[word_index] &= !(1u64 << (base_relation % 64));
            self.trim();
        }
    }

    fn contains(&self, base_relation: usize) -> bool {
        let word_index = base_relation / 64;
        word_index < self.words.len()
            && (self.words[word_index] >> (base_relation % 64)) & 1 == 1
    }

    fn is_none(&self) -> bool {
        self.words.is_empty()
    }

    fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    fn without(&self, other: &DynamicRelation) -> DynamicRelation {
        let words: Vec<u64> = self
            .words
            .iter()
            .enumerate()
            .map(|(index, word)| word & !other.words.get(index).copied().unwrap_or(0))
            .collect();
        DynamicRelation::from_words(&words)
    }

    fn next_set_bit(&self, from: usize) -> Option<usize> {
        let mut word_index = from / 64;
        if word_index >= self.words.len() {
            return None;
        }
        let mut word = self.words[word_index] & (u64::MAX << (from % 64));
        loop {
            if word != 0 {
                return Some(word_index * 64 + word.trailing_zeros() as usize);
            }
            word_index += 1;
            if word_index == self.words.len() {
                return None;
            }
            word = self.words[word_index];
        }
    }

    fn from_dynamic(relation: &DynamicRelation) -> DynamicRelation {
        relation.clone()
    }

    fn to_dynamic(&self) -> DynamicRelation {
        self.clone()
    }
}

impl BitAnd for DynamicRelation {
    type Output = DynamicRelation;

    fn bitand(mut self, rhs: DynamicRelation) -> DynamicRelation {
        self &= rhs;
        self
    }
}

impl BitOr for DynamicRelation {
    type Output = DynamicRelation;

    fn bitor(mut self, rhs: DynamicRelation) -> DynamicRelation {
        self |= rhs;
        self
    }
}

impl BitAndAssign for DynamicRelation {
    fn bitand_assign(&mut self, rhs: DynamicRelation) {
        self.words.truncate(rhs.words.len());
        for (word, other_word) in self.words.iter_mut().zip(rhs.words.iter()) {
            *word &= other_word;
        }
        self.trim();
    }
}

impl BitOrAssign for DynamicRelation {
    fn bitor_assign(&mut self, rhs: DynamicRelation) {
        if rhs.words.len() > self.words.len() {
            self.words.resize(rhs.words.len(), 0);
        }
        for (word, other_word) in self.words.iter_mut().zip(rhs.words.iter()) {
            *word |= other_word;
        }
    }
}

impl Debug for DynamicRelation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("DynamicRelation")?;
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_how_the_value_was_built() {
        let mut grown = DynamicRelation::none();
        grown.set(200);
        grown.unset(200);
        grown.set(3);

        let mut direct = DynamicRelation::none();
        direct.set(3);

        assert_eq!(grown, direct);
    }

    #[test]
    fn set_grows_the_backing_storage_on_demand() {
        let mut relation = DynamicRelation::none();
        relation.set(130);
        assert!(relation.contains(130));
        assert!(!relation.contains(129));
        assert_eq!(relation.count(), 1);
        assert_eq!(relation.significant_bits(), 131);
    }

    #[test]
    fn intersection_with_a_shorter_relation_truncates() {
        let mut wide = DynamicRelation::none();
        wide.set(1);
        wide.set(100);
        let mut narrow = DynamicRelation::none();
        narrow.set(1);

        assert_eq!(wide & narrow.clone(), narrow);
    }

    #[test]
    fn union_with_a_wider_relation_grows() {
        let mut wide = DynamicRelation::none();
        wide.set(100);
        let mut narrow = DynamicRelation::none();
        narrow.set(1);

        let union = narrow | wide;
        assert_eq!(union.iter().collect::<Vec<_>>(), vec![1, 100]);
    }

    #[test]
    fn without_a_wider_relation_is_well_defined() {
        let mut narrow = DynamicRelation::none();
        narrow.set(2);
        let mut wide = DynamicRelation::none();
        wide.set(2);
        wide.set(90);

        assert!(narrow.without(&wide).is_none());
        assert_eq!(wide.without(&narrow).iter().collect::<Vec<_>>(), vec![90]);
    }

    #[test]
    fn universal_has_exactly_the_first_bits() {
        let universal = DynamicRelation::universal(70);
        assert_eq!(universal.count(), 70);
        assert!(universal.contains(69));
        assert!(!universal.contains(70));
    }
}
