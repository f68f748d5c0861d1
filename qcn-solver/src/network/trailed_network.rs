use std::sync::Arc;

use super::ConstraintNetwork;
use crate::basic_types::Trail;
use crate::basic_types::VariablePair;
use crate::calculus::CalculusOperations;
use crate::qcn_assert_moderate;
use crate::qcn_assert_simple;
use crate::relations::Relation;

/// A [`ConstraintNetwork`] with an undo trail, for backtracking search.
///
/// Each open decision level records, per written edge, the base relations the
/// write removed; popping a level ORs them back through the converse-
/// preserving write, so the converse invariant survives backtracking.
#[derive(Debug, Clone)]
pub struct TrailedNetwork<R> {
    network: ConstraintNetwork<R>,
    trail: Trail<TrailEntry<R>>,
}

#[derive(Debug, Clone)]
struct TrailEntry<R> {
    pair: VariablePair,
    removed: R,
}

impl<R: Relation> TrailedNetwork<R> {
    pub fn new(network: ConstraintNetwork<R>) -> TrailedNetwork<R> {
        TrailedNetwork {
            network,
            trail: Trail::default(),
        }
    }

    pub fn num_variables(&self) -> usize {
        self.network.num_variables()
    }

    pub fn operations(&self) -> &Arc<CalculusOperations<R>> {
        self.network.operations()
    }

    pub fn get_constraint(&self, first: usize, second: usize) -> &R {
        self.network.get_constraint(first, second)
    }

    pub fn decision_level(&self) -> usize {
        self.trail.get_decision_level()
    }

    /// Opens a new decision level; subsequent writes are undone by
    /// [`TrailedNetwork::reset_to_last_state`].
    pub fn backup_state(&mut self) {
        self.trail.increase_decision_level();
    }

    /// Tightens `(first, second)` to `relation`, which must be a subset of
    /// the current relation. With no open decision level this is a plain,
    /// permanent write.
    pub fn set_value(&mut self, first: usize, second: usize, relation: R) {
        if self.trail.get_decision_level() > 0 {
            let current = self.network.get_constraint(first, second);
            qcn_assert_moderate!(relation.is_subset_of(current));
            let removed = current.without(&relation);
            if !removed.is_none() {
                self.trail.push(TrailEntry {
                    pair: VariablePair::new(first, second),
                    removed,
                });
            }
        }
        self.network.set_constraint(first, second, relation);
    }

    /// Pops the innermost decision level, restoring every relation it
    /// tightened.
    pub fn reset_to_last_state(&mut self) {
        let level = self.trail.get_decision_level();
        qcn_assert_simple!(level > 0);
        let TrailedNetwork { network, trail } = self;
        for entry in trail.synchronise(level - 1) {
            let widened =
                network.get_constraint(entry.pair.first, entry.pair.second).clone() | entry.removed;
            network.set_constraint(entry.pair.first, entry.pair.second, widened);
        }
    }

    /// Pops every open decision level.
    pub fn reset_to_initial_state(&mut self) {
        while self.trail.get_decision_level() > 0 {
            self.reset_to_last_state();
        }
    }

    pub fn network(&self) -> &ConstraintNetwork<R> {
        &self.network
    }

    pub fn into_network(self) -> ConstraintNetwork<R> {
        self.network
    }
}
