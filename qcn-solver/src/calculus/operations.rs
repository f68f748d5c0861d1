use std::sync::Arc;

use super::Calculus;
use super::RelationWidthError;
use crate::branching::preferred_base_relation;
use crate::qcn_assert_extreme;
use crate::qcn_assert_simple;
use crate::relations::Relation;

/// Above this many base relations the per-relation lookup tables (converse,
/// weight, first split) are no longer precomputed.
const UNARY_TABLE_MAX_BASE_RELATIONS: usize = 16;

/// Above this many base relations the full composition table (quadratic in
/// the number of relations) is no longer precomputed.
const COMPOSITION_TABLE_MAX_BASE_RELATIONS: usize = 8;

/// A [`Calculus`] grounded to a concrete relation width `R`.
///
/// All engine-facing operations live here. For small calculi the operations
/// are backed by tables precomputed at construction; table-backed and direct
/// computation always agree (cross-checked under `debug-checks`). The tables
/// are owned by the instance, so independently constructed operations never
/// share mutable state.
#[derive(Debug)]
pub struct CalculusOperations<R> {
    calculus: Arc<Calculus>,
    identity: R,
    universal: R,
    /// Row-major `n * n` compositions of base relation pairs, grounded to `R`.
    base_composition: Vec<R>,
    tables: Option<Tables<R>>,
}

#[derive(Debug)]
struct Tables<R> {
    converse: Vec<R>,
    weight: Vec<u64>,
    first_split: Vec<R>,
    /// Indexed by `a * 2^n + b`; only present for very small calculi.
    composition: Option<Vec<R>>,
}

impl<R: Relation> CalculusOperations<R> {
    pub fn new(calculus: Arc<Calculus>) -> Result<CalculusOperations<R>, RelationWidthError> {
        let n = calculus.num_base_relations();
        if n > R::MAX_SIZE {
            return Err(RelationWidthError {
                capacity: R::MAX_SIZE,
                num_base_relations: n,
            });
        }

        let base_composition = (0..n * n)
            .map(|index| R::from_dynamic(calculus.composition_of_bases(index / n, index % n)))
            .collect();

        let mut operations = CalculusOperations {
            identity: R::from_dynamic(&calculus.identity_relation()),
            universal: R::universal(n),
            base_composition,
            calculus,
            tables: None,
        };

        if n <= UNARY_TABLE_MAX_BASE_RELATIONS {
            operations.tables = Some(operations.precompute_tables());
        }
        Ok(operations)
    }

    fn precompute_tables(&self) -> Tables<R> {
        let n = self.num_base_relations();
        let num_relations = 1usize << n;

        let mut converse = Vec::with_capacity(num_relations);
        let mut weight = Vec::with_capacity(num_relations);
        let mut first_split = Vec::with_capacity(num_relations);
        for bits in 0..num_relations {
            let relation = R::from_bits(bits as u64);
            converse.push(self.compute_converse(&relation));
            weight.push(self.compute_weight(&relation));
            first_split.push(self.compute_first_split(&relation));
        }

        let composition = (n <= COMPOSITION_TABLE_MAX_BASE_RELATIONS).then(|| {
            let mut table = Vec::with_capacity(num_relations * num_relations);
            for a in 0..num_relations {
                let left = R::from_bits(a as u64);
                for b in 0..num_relations {
                    let right = R::from_bits(b as u64);
                    table.push(self.compute_composition(&left, &right));
                }
            }
            table
        });

        Tables {
            converse,
            weight,
            first_split,
            composition,
        }
    }

    pub fn calculus(&self) -> &Arc<Calculus> {
        &self.calculus
    }

    pub fn num_base_relations(&self) -> usize {
        self.calculus.num_base_relations()
    }

    /// The relation `{identity}` at this width.
    pub fn identity(&self) -> &R {
        &self.identity
    }

    pub fn universal(&self) -> &R {
        &self.universal
    }

    pub fn converse(&self, relation: &R) -> R {
        if let Some(tables) = &self.tables {
            let result = tables.converse[relation.lowest_word() as usize].clone();
            qcn_assert_extreme!(result == self.compute_converse(relation));
            return result;
        }
        self.compute_converse(relation)
    }

    /// The weak composition of `a` and `b`: the union of base compositions
    /// over all member pairs, saturating at the universal relation.
    pub fn composition(&self, a: &R, b: &R) -> R {
        if let Some(composition) = self.tables.as_ref().and_then(|t| t.composition.as_ref()) {
            let num_relations = 1usize << self.num_base_relations();
            let index = a.lowest_word() as usize * num_relations + b.lowest_word() as usize;
            let result = composition[index].clone();
            qcn_assert_extreme!(result == self.compute_composition(a, b));
            return result;
        }
        self.compute_composition(a, b)
    }

    /// The complement of `relation` within the universal relation.
    pub fn negation(&self, relation: &R) -> R {
        self.universal.without(relation)
    }

    /// The total restrictiveness weight; lower means tighter.
    pub fn weight(&self, relation: &R) -> u64 {
        if let Some(tables) = &self.tables {
            let result = tables.weight[relation.lowest_word() as usize];
            qcn_assert_extreme!(result == self.compute_weight(relation));
            return result;
        }
        self.compute_weight(relation)
    }

    /// The branching value for `relation`: the subset tried on the positive
    /// branch. Empty exactly when `relation` is empty.
    pub fn first_split(&self, relation: &R) -> R {
        if let Some(tables) = &self.tables {
            let result = tables.first_split[relation.lowest_word() as usize].clone();
            qcn_assert_extreme!(result == self.compute_first_split(relation));
            return result;
        }
        self.compute_first_split(relation)
    }

    /// Whether `relation` needs no further branching. The empty relation is
    /// never split.
    pub fn is_split(&self, relation: &R) -> bool {
        if relation.is_none() {
            return false;
        }
        if let Some(tables) = &self.tables {
            let result = tables.first_split[relation.lowest_word() as usize] == *relation;
            qcn_assert_extreme!(result == self.compute_is_split(relation));
            return result;
        }
        self.compute_is_split(relation)
    }

    fn compute_converse(&self, relation: &R) -> R {
        let mut result = R::none();
        for base_relation in relation.iter() {
            result.set(self.calculus.converse_of_base(base_relation));
        }
        result
    }

    fn compute_composition(&self, a: &R, b: &R) -> R {
        let n = self.num_base_relations();
        let mut result = R::none();
        for i in a.iter() {
            for j in b.iter() {
                result |= self.base_composition[i * n + j].clone();
                if result == self.universal {
                    return result;
                }
            }
        }
        result
    }

    fn compute_weight(&self, relation: &R) -> u64 {
        relation
            .iter()
            .fold(0u64, |total, base_relation| {
                total.saturating_add(self.calculus.weight_of_base(base_relation))
            })
    }

    fn compute_first_split(&self, relation: &R) -> R {
        if relation.is_none() {
            return R::none();
        }
        if let Some(splitter) = self.calculus.splitter() {
            let split = R::from_dynamic(&splitter.first_split(&relation.to_dynamic()));
            qcn_assert_simple!(!split.is_none());
            qcn_assert_simple!(split.is_subset_of(relation));
            return split;
        }
        let preferred = relation
            .iter()
            .reduce(|best, candidate| preferred_base_relation(&self.calculus, best, candidate))
            .unwrap_or(0);
        let mut result = R::none();
        result.set(preferred);
        result
    }

    fn compute_is_split(&self, relation: &R) -> bool {
        match self.calculus.splitter() {
            Some(splitter) => splitter.is_split(&relation.to_dynamic()),
            None => relation.count() == 1,
        }
    }
}
