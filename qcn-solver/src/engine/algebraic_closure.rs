use std::sync::Arc;

use itertools::Itertools;

use super::nogoods::NogoodDb;
use crate::basic_types::VariablePair;
use crate::calculus::CalculusOperations;
use crate::containers::KeyValueHeap;
use crate::network::ConstraintStore;
use crate::relations::Relation;

/// Directed edge `(first, second)` as a worklist index.
pub(crate) fn edge_index(pair: VariablePair, num_variables: usize) -> usize {
    pair.first * num_variables + pair.second
}

fn decode_edge_index(index: usize, num_variables: usize) -> (usize, usize) {
    (index / num_variables, index % num_variables)
}

/// Enforces algebraic closure (path consistency) with a weighted worklist:
/// the tightest edge, by total relation weight, is always revised first.
///
/// A run either tightens the store to a fixed point and returns an empty
/// vector, or stops at the first empty relation and returns the edges of the
/// contradicting triangle. The store is left as tightened so far; during
/// search the trail undoes it.
#[derive(Debug, Default)]
pub struct AlgebraicClosure {
    queue: KeyValueHeap,
}

impl AlgebraicClosure {
    /// Closes the whole store, seeding every edge.
    pub fn enforce<R: Relation, S: ConstraintStore<R>>(
        &mut self,
        store: &mut S,
    ) -> Vec<VariablePair> {
        self.run(store, None, None, None)
    }

    /// Re-closes a store that was closed before one edge was tightened;
    /// seeds only that edge.
    pub fn enforce_incremental<R: Relation, S: ConstraintStore<R>>(
        &mut self,
        store: &mut S,
        first: usize,
        second: usize,
    ) -> Vec<VariablePair> {
        self.run(store, Some(VariablePair::new(first, second)), None, None)
    }

    pub(crate) fn worklist_mut(&mut self) -> &mut KeyValueHeap {
        &mut self.queue
    }

    /// `removed` carries the base relations the seeding write removed, so
    /// nogoods watching them fire before the first revision.
    pub(crate) fn run<R: Relation, S: ConstraintStore<R>>(
        &mut self,
        store: &mut S,
        seed: Option<VariablePair>,
        removed: Option<R>,
        mut nogoods: Option<&mut NogoodDb<R>>,
    ) -> Vec<VariablePair> {
        let operations = Arc::clone(store.operations());
        let num_variables = store.num_variables();

        self.queue.clear();
        if let Some(db) = nogoods.as_deref_mut() {
            db.start_propagation();
        }

        match seed {
            Some(pair) => {
                let weight = operations.weight(store.get_constraint(pair.first, pair.second));
                self.queue.insert(edge_index(pair, num_variables), weight);
            }
            None => {
                for (first, second) in (0..num_variables).tuple_combinations() {
                    let weight = operations.weight(store.get_constraint(first, second));
                    self.queue
                        .insert(edge_index(VariablePair::new(first, second), num_variables), weight);
                }
            }
        }

        if let (Some(pair), Some(removed)) = (seed, removed) {
            if let Some(db) = nogoods.as_deref_mut() {
                if !removed.is_none() {
                    if let Err(conflict) = db.notify_removed(pair, removed, store, &mut self.queue)
                    {
                        self.queue.clear();
                        return conflict;
                    }
                }
            }
        }

        while let Some((index, _)) = self.queue.pop_min() {
            let (i, j) = decode_edge_index(index, num_variables);
            for k in 0..num_variables {
                if k == i || k == j {
                    continue;
                }
                // The edge (i, j) participates in the triangle {i, j, k}
                // twice: as the left and as the right composition operand.
                if let Err(conflict) = self.revise(store, &operations, &mut nogoods, i, j, k) {
                    self.queue.clear();
                    return conflict;
                }
                if let Err(conflict) = self.revise(store, &operations, &mut nogoods, k, i, j) {
                    self.queue.clear();
                    return conflict;
                }
            }
        }
        Vec::new()
    }

    /// Tightens `(a, c)` against the composition through `b`.
    fn revise<R: Relation, S: ConstraintStore<R>>(
        &mut self,
        store: &mut S,
        operations: &Arc<CalculusOperations<R>>,
        nogoods: &mut Option<&mut NogoodDb<R>>,
        a: usize,
        b: usize,
        c: usize,
    ) -> Result<(), Vec<VariablePair>> {
        let composed =
            operations.composition(store.get_constraint(a, b), store.get_constraint(b, c));
        let current = store.get_constraint(a, c).clone();
        if current.is_subset_of(&composed) {
            return Ok(());
        }

        let tightened = current.clone() & composed;
        let removed = current.without(&tightened);
        store.set_constraint(a, c, tightened.clone());

        if tightened.is_none() {
            log::trace!("empty relation in triangle ({a}, {b}, {c})");
            return Err(vec![
                VariablePair::new(a, b),
                VariablePair::new(b, c),
                VariablePair::new(a, c),
            ]);
        }

        self.queue.insert(
            edge_index(VariablePair::new(a, c), store.num_variables()),
            operations.weight(&tightened),
        );

        if let Some(db) = nogoods.as_deref_mut() {
            db.notify_removed(VariablePair::new(a, c), removed, store, &mut self.queue)?;
        }
        Ok(())
    }
}
