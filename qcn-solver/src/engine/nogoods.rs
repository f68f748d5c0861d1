use std::sync::Arc;

use fnv::FnvHashMap;
use fnv::FnvHashSet;

use super::algebraic_closure::edge_index;
use crate::basic_types::VariablePair;
use crate::containers::KeyValueHeap;
use crate::network::ConstraintStore;
use crate::qcn_assert_moderate;
use crate::qcn_assert_simple;
use crate::relations::Relation;
use crate::statistics::log_statistic;

/// One conjunct of a nogood: the relation of `pair` (normalized) is a subset
/// of `value`.
#[derive(Debug, Clone)]
pub(crate) struct NogoodFact<R> {
    pub(crate) pair: VariablePair,
    pub(crate) value: R,
}

/// A watched atom: the base relation `bit` on the pair of conjunct `fact`.
/// While the bit is still present in the store, that conjunct does not hold,
/// so the nogood cannot trigger.
#[derive(Debug, Clone, Copy)]
struct WatchedAtom {
    fact: usize,
    bit: usize,
}

#[derive(Debug)]
struct NogoodEntry<R> {
    facts: Vec<NogoodFact<R>>,
    watched: [WatchedAtom; 2],
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct NogoodStatistics {
    pub(crate) num_nogoods: u64,
    pub(crate) num_unit_nogoods: u64,
    pub(crate) num_discarded_nogoods: u64,
    pub(crate) num_forced_reductions: u64,
}

/// Learned nogoods with two-watched-atom propagation.
///
/// Nogoods are installed against the root state between restarts and persist
/// for the remainder of the search. During propagation the database is
/// notified of every removed base relation; when all conjuncts of a nogood
/// but one hold, the remaining conjunct's value is removed from its pair.
/// The watch scheme is backtrack-stable: undoing removals re-establishes the
/// watched bits, so no bookkeeping happens on backtrack.
#[derive(Debug)]
pub(crate) struct NogoodDb<R> {
    num_variables: usize,
    num_base_relations: usize,
    nogoods: Vec<NogoodEntry<R>>,
    /// Atom key to the ids of the nogoods currently watching that atom.
    watches: FnvHashMap<usize, Vec<usize>>,
    /// Atom keys already handled in the current propagation run.
    processed: FnvHashSet<usize>,
    statistics: NogoodStatistics,
}

impl<R: Relation> NogoodDb<R> {
    pub(crate) fn new(num_variables: usize, num_base_relations: usize) -> NogoodDb<R> {
        NogoodDb {
            num_variables,
            num_base_relations,
            nogoods: Vec::new(),
            watches: FnvHashMap::default(),
            processed: FnvHashSet::default(),
            statistics: NogoodStatistics::default(),
        }
    }

    pub(crate) fn log_statistics(&self) {
        log_statistic("learnedNogoods", self.statistics.num_nogoods);
        log_statistic("unitNogoods", self.statistics.num_unit_nogoods);
        log_statistic("discardedNogoods", self.statistics.num_discarded_nogoods);
        log_statistic("nogoodReductions", self.statistics.num_forced_reductions);
    }

    /// Resets the per-run deduplication; call once at the start of every
    /// propagation run.
    pub(crate) fn start_propagation(&mut self) {
        self.processed.clear();
    }

    fn atom_key(&self, pair: VariablePair, bit: usize) -> usize {
        pair.triangular_index(self.num_variables) * self.num_base_relations + bit
    }

    /// Installs a nogood against the current (root) state of `store`.
    ///
    /// Conjuncts that already hold are dropped; if any conjunct can no longer
    /// ever hold the nogood is vacuous and discarded. A single surviving
    /// conjunct is applied immediately and permanently. `Err` means the store
    /// is unsatisfiable.
    pub(crate) fn install<S: ConstraintStore<R>>(
        &mut self,
        facts: Vec<NogoodFact<R>>,
        store: &mut S,
        queue: &mut KeyValueHeap,
    ) -> Result<(), Vec<VariablePair>> {
        self.statistics.num_nogoods += 1;
        let witness: Vec<VariablePair> = facts.iter().map(|fact| fact.pair).collect();

        let mut remaining = Vec::with_capacity(facts.len());
        for fact in facts {
            qcn_assert_moderate!(fact.pair.first <= fact.pair.second);
            let current = store.get_constraint(fact.pair.first, fact.pair.second);
            if current.is_subset_of(&fact.value) {
                continue;
            }
            if (current.clone() & fact.value.clone()).is_none() {
                self.statistics.num_discarded_nogoods += 1;
                return Ok(());
            }
            remaining.push(fact);
        }

        match remaining.len() {
            0 => Err(witness),
            1 => {
                self.statistics.num_unit_nogoods += 1;
                let fact = remaining.swap_remove(0);
                self.force(fact.pair, &fact.value, store, queue)
            }
            _ => {
                let watched = [
                    self.pick_watch(&remaining, 0, store),
                    self.pick_watch(&remaining, 1, store),
                ];
                let nogood_id = self.nogoods.len();
                for atom in watched {
                    let key = self.atom_key(remaining[atom.fact].pair, atom.bit);
                    self.watches.entry(key).or_default().push(nogood_id);
                }
                self.nogoods.push(NogoodEntry {
                    facts: remaining,
                    watched,
                });
                Ok(())
            }
        }
    }

    fn pick_watch<S: ConstraintStore<R>>(
        &self,
        facts: &[NogoodFact<R>],
        fact: usize,
        store: &S,
    ) -> WatchedAtom {
        let current = store.get_constraint(facts[fact].pair.first, facts[fact].pair.second);
        let outside = current.without(&facts[fact].value);
        let bit = outside.next_set_bit(0);
        // A conjunct that survived installation does not hold yet, so it has
        // a present bit outside its value.
        qcn_assert_simple!(bit.is_some());
        WatchedAtom {
            fact,
            bit: bit.unwrap_or(0),
        }
    }

    /// Removes `value` from `pair` and cascades the consequences.
    fn force<S: ConstraintStore<R>>(
        &mut self,
        pair: VariablePair,
        value: &R,
        store: &mut S,
        queue: &mut KeyValueHeap,
    ) -> Result<(), Vec<VariablePair>> {
        let operations = Arc::clone(store.operations());
        let current = store.get_constraint(pair.first, pair.second).clone();
        let reduced = current.without(value);
        if reduced == current {
            return Ok(());
        }
        store.set_constraint(pair.first, pair.second, reduced.clone());
        self.statistics.num_forced_reductions += 1;
        if reduced.is_none() {
            return Err(vec![pair]);
        }
        queue.insert(
            edge_index(pair, self.num_variables),
            operations.weight(&reduced),
        );
        self.notify_removed(pair, current.without(&reduced), store, queue)
    }

    /// Reacts to base relations removed from an edge, in either orientation:
    /// moves watches, and propagates nogoods that are down to one non-holding
    /// conjunct. `Err` carries the pairs of a violated nogood.
    pub(crate) fn notify_removed<S: ConstraintStore<R>>(
        &mut self,
        pair: VariablePair,
        removed: R,
        store: &mut S,
        queue: &mut KeyValueHeap,
    ) -> Result<(), Vec<VariablePair>> {
        let operations = Arc::clone(store.operations());
        let mut worklist = vec![(pair, removed)];

        while let Some((pair, removed)) = worklist.pop() {
            let (pair, removed) = if pair.first <= pair.second {
                (pair, removed)
            } else {
                (pair.normalized(), operations.converse(&removed))
            };

            for bit in removed.iter() {
                let key = self.atom_key(pair, bit);
                if !self.processed.insert(key) {
                    continue;
                }
                let Some(watchers) = self.watches.remove(&key) else {
                    continue;
                };

                let mut keep = Vec::new();
                let mut index = 0;
                while index < watchers.len() {
                    let nogood_id = watchers[index];
                    index += 1;

                    let which = {
                        let entry = &self.nogoods[nogood_id];
                        let matches = |atom: &WatchedAtom| {
                            entry.facts[atom.fact].pair == pair && atom.bit == bit
                        };
                        if matches(&entry.watched[0]) {
                            0
                        } else if matches(&entry.watched[1]) {
                            1
                        } else {
                            continue;
                        }
                    };

                    let replacement = {
                        let entry = &self.nogoods[nogood_id];
                        let other_fact = entry.watched[1 - which].fact;
                        entry.facts.iter().enumerate().find_map(|(fact_index, fact)| {
                            if fact_index == other_fact {
                                return None;
                            }
                            store
                                .get_constraint(fact.pair.first, fact.pair.second)
                                .without(&fact.value)
                                .next_set_bit(0)
                                .map(|new_bit| (fact_index, fact.pair, new_bit))
                        })
                    };

                    match replacement {
                        Some((fact_index, fact_pair, new_bit)) => {
                            self.nogoods[nogood_id].watched[which] = WatchedAtom {
                                fact: fact_index,
                                bit: new_bit,
                            };
                            let new_key = self.atom_key(fact_pair, new_bit);
                            self.watches.entry(new_key).or_default().push(nogood_id);
                        }
                        None => {
                            // Every conjunct except the other watched one
                            // holds; its value must not survive.
                            keep.push(nogood_id);
                            let (other_pair, other_value) = {
                                let entry = &self.nogoods[nogood_id];
                                let other = &entry.facts[entry.watched[1 - which].fact];
                                (other.pair, other.value.clone())
                            };
                            let current = store
                                .get_constraint(other_pair.first, other_pair.second)
                                .clone();
                            let reduced = current.without(&other_value);
                            if reduced == current {
                                continue;
                            }
                            store.set_constraint(other_pair.first, other_pair.second, reduced.clone());
                            self.statistics.num_forced_reductions += 1;
                            if reduced.is_none() {
                                let witness = self.nogoods[nogood_id]
                                    .facts
                                    .iter()
                                    .map(|fact| fact.pair)
                                    .collect();
                                keep.extend_from_slice(&watchers[index..]);
                                let _ = self.watches.insert(key, keep);
                                return Err(witness);
                            }
                            queue.insert(
                                edge_index(other_pair, self.num_variables),
                                operations.weight(&reduced),
                            );
                            worklist.push((other_pair, current.without(&reduced)));
                        }
                    }
                }
                if !keep.is_empty() {
                    let _ = self.watches.insert(key, keep);
                }
            }
        }
        Ok(())
    }
}
