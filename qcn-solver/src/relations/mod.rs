//! Bitset representations of qualitative relations.
//!
//! A relation is a set of base relations of some calculus, stored as a bitset.
//! The engine is generic over [`Relation`] and is monomorphized per width;
//! [`DynamicRelation`] is the unbounded fallback and the interchange format
//! between widths.

mod dynamic_relation;
mod fixed_bitset;

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::BitAnd;
use std::ops::BitAndAssign;
use std::ops::BitOr;
use std::ops::BitOrAssign;

pub use dynamic_relation::DynamicRelation;
pub use fixed_bitset::Relation128;
pub use fixed_bitset::Relation16;
pub use fixed_bitset::Relation256;
pub use fixed_bitset::Relation32;
pub use fixed_bitset::Relation64;
pub use fixed_bitset::Relation8;

/// The bitset contract shared by all relation representations.
///
/// Base relations are identified by their index in the owning calculus; a bit
/// is set iff the corresponding base relation is a member.
pub trait Relation:
    Clone
    + Eq
    + Hash
    + Debug
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitAndAssign
    + BitOrAssign
    + Send
    + Sync
    + 'static
{
    /// The largest number of base relations this representation can hold.
    const MAX_SIZE: usize;

    /// The empty relation.
    fn none() -> Self;

    /// The relation containing the base relations `0..num_base_relations`.
    fn universal(num_base_relations: usize) -> Self;

    /// A relation from the raw bits of its lowest word.
    fn from_bits(bits: u64) -> Self;

    /// The lowest 64 bits; the full value when fewer than 65 base relations
    /// are in play, which is what the precomputed operation tables index by.
    fn lowest_word(&self) -> u64;

    fn set(&mut self, base_relation: usize);

    fn unset(&mut self, base_relation: usize);

    fn contains(&self, base_relation: usize) -> bool;

    fn is_none(&self) -> bool;

    /// The number of base relations in this relation.
    fn count(&self) -> usize;

    /// Set difference: the base relations of `self` that are not in `other`.
    fn without(&self, other: &Self) -> Self;

    /// The smallest set bit at position `from` or above, if any.
    fn next_set_bit(&self, from: usize) -> Option<usize>;

    fn is_subset_of(&self, other: &Self) -> bool {
        self.without(other).is_none()
    }

    /// Iterates over the member base relations in ascending order.
    fn iter(&self) -> SetBits<'_, Self> {
        SetBits {
            relation: self,
            next: 0,
        }
    }

    fn from_dynamic(relation: &DynamicRelation) -> Self;

    fn to_dynamic(&self) -> DynamicRelation;
}

/// Iterator over the set bits of a relation, ascending. See [`Relation::iter`].
#[derive(Debug)]
pub struct SetBits<'a, R> {
    relation: &'a R,
    next: usize,
}

impl<R: Relation> Iterator for SetBits<'_, R> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let bit = self.relation.next_set_bit(self.next)?;
        self.next = bit + 1;
        Some(bit)
    }
}

/// The smallest fixed relation capacity that can hold `num_base_relations`
/// base relations, or `None` when only [`DynamicRelation`] is wide enough.
pub fn smallest_fixed_capacity(num_base_relations: usize) -> Option<usize> {
    [
        Relation8::MAX_SIZE,
        Relation16::MAX_SIZE,
        Relation32::MAX_SIZE,
        Relation64::MAX_SIZE,
        Relation128::MAX_SIZE,
        Relation256::MAX_SIZE,
    ]
    .into_iter()
    .find(|capacity| *capacity >= num_base_relations)
}
