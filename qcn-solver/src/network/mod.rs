//! Constraint networks over a qualitative calculus.

mod constraint_network;
mod sparse;
mod trailed_network;

use std::sync::Arc;

pub use constraint_network::ConstraintNetwork;
pub use sparse::SparseNetwork;
pub use trailed_network::TrailedNetwork;

use crate::calculus::CalculusOperations;
use crate::relations::Relation;

/// The mutable view the propagation engine works against: a plain network
/// during preprocessing, a trailed network during search.
pub trait ConstraintStore<R: Relation> {
    fn num_variables(&self) -> usize;

    fn operations(&self) -> &Arc<CalculusOperations<R>>;

    fn get_constraint(&self, first: usize, second: usize) -> &R;

    /// Tightens one edge; the implementation maintains the converse invariant
    /// and, where applicable, the undo trail.
    fn set_constraint(&mut self, first: usize, second: usize, relation: R);
}

impl<R: Relation> ConstraintStore<R> for ConstraintNetwork<R> {
    fn num_variables(&self) -> usize {
        ConstraintNetwork::num_variables(self)
    }

    fn operations(&self) -> &Arc<CalculusOperations<R>> {
        ConstraintNetwork::operations(self)
    }

    fn get_constraint(&self, first: usize, second: usize) -> &R {
        ConstraintNetwork::get_constraint(self, first, second)
    }

    fn set_constraint(&mut self, first: usize, second: usize, relation: R) {
        ConstraintNetwork::set_constraint(self, first, second, relation);
    }
}

impl<R: Relation> ConstraintStore<R> for TrailedNetwork<R> {
    fn num_variables(&self) -> usize {
        TrailedNetwork::num_variables(self)
    }

    fn operations(&self) -> &Arc<CalculusOperations<R>> {
        TrailedNetwork::operations(self)
    }

    fn get_constraint(&self, first: usize, second: usize) -> &R {
        TrailedNetwork::get_constraint(self, first, second)
    }

    fn set_constraint(&mut self, first: usize, second: usize, relation: R) {
        self.set_value(first, second, relation);
    }
}
