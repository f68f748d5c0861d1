use std::fmt::Debug;
use std::fmt::Formatter;
use std::ops::BitAnd;
use std::ops::BitAndAssign;
use std::ops::BitOr;
use std::ops::BitOrAssign;

use super::DynamicRelation;
use super::Relation;
use crate::qcn_assert_moderate;
use crate::qcn_assert_simple;

macro_rules! single_word_relation {
    ($(#[$meta:meta])* $name:ident, $word:ty) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name {
            bits: $word,
        }

        // At the widest word the u64 conversions below are identity casts.
        #[allow(trivial_numeric_casts)]
        impl Relation for $name {
            const MAX_SIZE: usize = <$word>::BITS as usize;

            fn none() -> $name {
                $name { bits: 0 }
            }

            fn universal(num_base_relations: usize) -> $name {
                qcn_assert_simple!(num_base_relations <= Self::MAX_SIZE);
                if num_base_relations == Self::MAX_SIZE {
                    $name { bits: <$word>::MAX }
                } else {
                    $name {
                        bits: ((1 as $word) << num_base_relations) - 1,
                    }
                }
            }

            fn from_bits(bits: u64) -> $name {
                qcn_assert_moderate!(
                    (u64::BITS - bits.leading_zeros()) as usize <= Self::MAX_SIZE
                );
                $name { bits: bits as $word }
            }

            fn lowest_word(&self) -> u64 {
                self.bits as u64
            }

            fn set(&mut self, base_relation: usize) {
                qcn_assert_moderate!(base_relation < Self::MAX_SIZE);
                self.bits |= (1 as $word) << base_relation;
            }

            fn unset(&mut self, base_relation: usize) {
                qcn_assert_moderate!(base_relation < Self::MAX_SIZE);
                self.bits &= !((1 as $word) << base_relation);
            }

            fn contains(&self, base_relation: usize) -> bool {
                base_relation < Self::MAX_SIZE && (self.bits >> base_relation) & 1 == 1
            }

            fn is_none(&self) -> bool {
                self.bits == 0
            }

            fn count(&self) -> usize {
                self.bits.count_ones() as usize
            }

            fn without(&self, other: &$name) -> $name {
                $name {
                    bits: self.bits & !other.bits,
                }
            }

            fn next_set_bit(&self, from: usize) -> Option<usize> {
                if from >= Self::MAX_SIZE {
                    return None;
                }
                let masked = self.bits & (<$word>::MAX << from);
                if masked == 0 {
                    None
                } else {
                    Some(masked.trailing_zeros() as usize)
                }
            }

            fn from_dynamic(relation: &DynamicRelation) -> $name {
                qcn_assert_moderate!(relation.significant_bits() <= Self::MAX_SIZE);
                $name {
                    bits: relation.lowest_word() as $word,
                }
            }

            fn to_dynamic(&self) -> DynamicRelation {
                DynamicRelation::from_words(&[self.bits as u64])
            }
        }

        impl BitAnd for $name {
            type Output = $name;

            fn bitand(self, rhs: $name) -> $name {
                $name {
                    bits: self.bits & rhs.bits,
                }
            }
        }

        impl BitOr for $name {
            type Output = $name;

            fn bitor(self, rhs: $name) -> $name {
                $name {
                    bits: self.bits | rhs.bits,
                }
            }
        }

        impl BitAndAssign for $name {
            fn bitand_assign(&mut self, rhs: $name) {
                self.bits &= rhs.bits;
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: $name) {
                self.bits |= rhs.bits;
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(stringify!($name))?;
                f.debug_set().entries(self.iter()).finish()
            }
        }
    };
}

macro_rules! multi_word_relation {
    ($(#[$meta:meta])* $name:ident, $num_words:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name {
            words: [u64; $num_words],
        }

        impl Relation for $name {
            const MAX_SIZE: usize = 64 * $num_words;

            fn none() -> $name {
                $name {
                    words: [0; $num_words],
                }
            }

            fn universal(num_base_relations: usize) -> $name {
                qcn_assert_simple!(num_base_relations <= Self::MAX_SIZE);
                let mut words = [0u64; $num_words];
                let mut remaining = num_base_relations;
                let mut word_index = 0;
                while remaining >= 64 {
                    words[word_index] = u64::MAX;
                    remaining -= 64;
                    word_index += 1;
                }
                if remaining > 0 {
                    words[word_index] = (1u64 << remaining) - 1;
                }
                $name { words }
            }

            fn from_bits(bits: u64) -> $name {
                let mut words = [0u64; $num_words];
                words[0] = bits;
                $name { words }
            }

            fn lowest_word(&self) -> u64 {
                self.words[0]
            }

            fn set(&mut self, base_relation: usize) {
                qcn_assert_moderate!(base_relation < Self::MAX_SIZE);
                self.words[base_relation / 64] |= 1u64 << (base_relation % 64);
            }

            fn unset(&mut self, base_relation: usize) {
                qcn_assert_moderate!(base_relation < Self::MAX_SIZE);
                self.words[base_relation / 64] &= !(1u64 << (base_relation % 64));
            }

            fn contains(&self, base_relation: usize) -> bool {
                base_relation < Self::MAX_SIZE
                    && (self.words[base_relation / 64] >> (base_relation % 64)) & 1 == 1
            }

            fn is_none(&self) -> bool {
                self.words.iter().all(|word| *word == 0)
            }

            fn count(&self) -> usize {
                self.words
                    .iter()
                    .map(|word| word.count_ones() as usize)
                    .sum()
            }

            fn without(&self, other: &$name) -> $name {
                let mut words = self.words;
                for (word, other_word) in words.iter_mut().zip(other.words.iter()) {
                    *word &= !other_word;
                }
                $name { words }
            }

            fn next_set_bit(&self, from: usize) -> Option<usize> {
                if from >= Self::MAX_SIZE {
                    return None;
                }
                let mut word_index = from / 64;
                let mut word = self.words[word_index] & (u64::MAX << (from % 64));
                loop {
                    if word != 0 {
                        return Some(word_index * 64 + word.trailing_zeros() as usize);
                    }
                    word_index += 1;
                    if word_index == $num_words {
                        return None;
                    }
                    word = self.words[word_index];
                }
            }

            fn from_dynamic(relation: &DynamicRelation) -> $name {
                qcn_assert_moderate!(relation.significant_bits() <= Self::MAX_SIZE);
                let mut words = [0u64; $num_words];
                for (word, source) in words.iter_mut().zip(relation.words()) {
                    *word = *source;
                }
                $name { words }
            }

            fn to_dynamic(&self) -> DynamicRelation {
                DynamicRelation::from_words(&self.words)
            }
        }

        impl BitAnd for $name {
            type Output = $name;

            fn bitand(mut self, rhs: $name) -> $name {
                self &= rhs;
                self
            }
        }

        impl BitOr for $name {
            type Output = $name;

            fn bitor(mut self, rhs: $name) -> $name {
                self |= rhs;
                self
            }
        }

        impl BitAndAssign for $name {
            fn bitand_assign(&mut self, rhs: $name) {
                for (word, other_word) in self.words.iter_mut().zip(rhs.words.iter()) {
                    *word &= other_word;
                }
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: $name) {
                for (word, other_word) in self.words.iter_mut().zip(rhs.words.iter()) {
                    *word |= other_word;
                }
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(stringify!($name))?;
                f.debug_set().entries(self.iter()).finish()
            }
        }
    };
}

single_word_relation!(
    /// A relation over a calculus with at most 8 base relations.
    Relation8,
    u8
);
single_word_relation!(
    /// A relation over a calculus with at most 16 base relations; wide enough
    /// for Allen's interval algebra.
    Relation16,
    u16
);
single_word_relation!(
    /// A relation over a calculus with at most 32 base relations.
    Relation32,
    u32
);
single_word_relation!(
    /// A relation over a calculus with at most 64 base relations.
    Relation64,
    u64
);
multi_word_relation!(
    /// A relation over a calculus with at most 128 base relations.
    Relation128,
    2
);
multi_word_relation!(
    /// A relation over a calculus with at most 256 base relations.
    Relation256,
    4
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn universal_at_full_capacity_sets_every_bit() {
        assert_eq!(Relation8::universal(8).count(), 8);
        assert_eq!(Relation64::universal(64).count(), 64);
        assert_eq!(Relation128::universal(128).count(), 128);
    }

    #[test]
    fn next_set_bit_scans_across_word_boundaries() {
        let mut relation = Relation128::none();
        relation.set(3);
        relation.set(64);
        relation.set(100);

        assert_eq!(relation.next_set_bit(0), Some(3));
        assert_eq!(relation.next_set_bit(4), Some(64));
        assert_eq!(relation.next_set_bit(65), Some(100));
        assert_eq!(relation.next_set_bit(101), None);
    }

    #[test]
    fn without_removes_exactly_the_given_bits() {
        let universal = Relation16::universal(13);
        let mut removed = Relation16::none();
        removed.set(2);
        removed.set(11);

        let difference = universal.without(&removed);
        assert_eq!(difference.count(), 11);
        assert!(!difference.contains(2));
        assert!(!difference.contains(11));
        assert!(difference.contains(0));
    }

    #[test]
    fn lowest_word_round_trips_through_from_bits() {
        let mut relation = Relation32::none();
        relation.set(1);
        relation.set(30);
        assert_eq!(Relation32::from_bits(relation.lowest_word()), relation);
    }

    #[test]
    fn contains_is_false_beyond_capacity() {
        let relation = Relation8::universal(8);
        assert!(!relation.contains(8));
        assert!(!relation.contains(1000));
    }
}
